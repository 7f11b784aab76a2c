// CaaS server endpoints
//
// Power commands share the `{"id": "..."}` body. Shutdown is special: a
// server that is already stopped is answered with `SERVER_STOPPED`,
// either inside a 200 envelope or as an error body, and both count as
// success.

use tracing::debug;

use crate::caas::client::{CaasClient, NO_QUERY};
use crate::caas::models::{ApiResponse, Server};
use crate::caas::requests::{
    DeployServer, ExpandDisk, IdRequest, ReconfigureServer, ServerFilter,
};
use crate::error::Error;

const SERVER_STOPPED: &str = "SERVER_STOPPED";

/// Result of `server/shutdownServer`.
#[derive(Debug, Clone)]
pub enum ShutdownOutcome {
    /// The provider queued the shutdown.
    Initiated(ApiResponse),
    /// The server was not running.
    AlreadyStopped,
}

impl CaasClient {
    /// List servers matching `filter`.
    ///
    /// `GET server/server`
    pub async fn list_servers(&self, filter: &ServerFilter) -> Result<Vec<Server>, Error> {
        let url = self.url("server/server")?;
        debug!(?filter, "listing servers");
        self.get_collection(url, filter, "server").await
    }

    /// `GET server/server/{id}`
    pub async fn get_server(&self, id: &str) -> Result<Server, Error> {
        let url = self.url(&format!("server/server/{id}"))?;
        self.get(url, NO_QUERY).await
    }

    /// Deploy a server.
    ///
    /// `POST server/deployServer`, or `server/deployUncustomizedServer`
    /// when guest OS customization is off.
    pub async fn deploy_server(
        &self,
        body: &DeployServer,
        customize: bool,
    ) -> Result<ApiResponse, Error> {
        let path = if customize {
            "server/deployServer"
        } else {
            "server/deployUncustomizedServer"
        };
        let url = self.url(path)?;
        debug!(name = %body.name, image = %body.image_id, customize, "deploying server");
        self.post_accepted(url, body).await
    }

    /// `POST server/reconfigureServer`
    pub async fn reconfigure_server(
        &self,
        body: &ReconfigureServer,
    ) -> Result<ApiResponse, Error> {
        let url = self.url("server/reconfigureServer")?;
        debug!(id = %body.id, "reconfiguring server");
        self.post_accepted(url, body).await
    }

    /// `POST server/expandDisk` with the disk's id.
    pub async fn expand_disk(&self, body: &ExpandDisk) -> Result<ApiResponse, Error> {
        let url = self.url("server/expandDisk")?;
        debug!(disk = %body.id, size_gb = body.new_size_gb, "expanding disk");
        self.post_accepted(url, body).await
    }

    /// `POST server/deleteServer`
    pub async fn delete_server(&self, id: &str) -> Result<ApiResponse, Error> {
        let url = self.url("server/deleteServer")?;
        debug!(id, "deleting server");
        self.post_accepted(url, &IdRequest { id }).await
    }

    /// `POST server/startServer`
    pub async fn start_server(&self, id: &str) -> Result<ApiResponse, Error> {
        let url = self.url("server/startServer")?;
        debug!(id, "starting server");
        self.post_accepted(url, &IdRequest { id }).await
    }

    /// `POST server/rebootServer`
    pub async fn reboot_server(&self, id: &str) -> Result<ApiResponse, Error> {
        let url = self.url("server/rebootServer")?;
        debug!(id, "rebooting server");
        self.post_accepted(url, &IdRequest { id }).await
    }

    /// `POST server/shutdownServer`
    pub async fn shutdown_server(&self, id: &str) -> Result<ShutdownOutcome, Error> {
        let url = self.url("server/shutdownServer")?;
        debug!(id, "shutting down server");
        match self.post(url, &IdRequest { id }).await {
            Ok(resp) if resp.response_code.as_deref() == Some(SERVER_STOPPED) => {
                Ok(ShutdownOutcome::AlreadyStopped)
            }
            Ok(resp) => resp.into_accepted().map(ShutdownOutcome::Initiated),
            Err(e) if e.response_code() == Some(SERVER_STOPPED) => {
                Ok(ShutdownOutcome::AlreadyStopped)
            }
            Err(e) => Err(e),
        }
    }
}
