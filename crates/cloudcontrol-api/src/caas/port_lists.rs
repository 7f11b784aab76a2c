// CaaS port list endpoints

use tracing::debug;

use crate::caas::client::{CaasClient, NO_QUERY};
use crate::caas::models::{ApiResponse, PortList};
use crate::caas::requests::{CreatePortList, EditPortList, IdRequest};
use crate::error::Error;

impl CaasClient {
    /// `GET network/portList?networkDomainId=...`
    pub async fn list_port_lists(&self, network_domain_id: &str) -> Result<Vec<PortList>, Error> {
        let url = self.url("network/portList")?;
        debug!(network_domain = network_domain_id, "listing port lists");
        self.get_collection(url, &[("networkDomainId", network_domain_id)], "portList")
            .await
    }

    /// `GET network/portList/{id}`
    pub async fn get_port_list(&self, id: &str) -> Result<PortList, Error> {
        let url = self.url(&format!("network/portList/{id}"))?;
        self.get(url, NO_QUERY).await
    }

    /// `POST network/createPortList`
    pub async fn create_port_list(&self, body: &CreatePortList) -> Result<ApiResponse, Error> {
        let url = self.url("network/createPortList")?;
        debug!(name = %body.name, "creating port list");
        self.post_accepted(url, body).await
    }

    /// `POST network/editPortList`
    pub async fn edit_port_list(&self, body: &EditPortList) -> Result<ApiResponse, Error> {
        let url = self.url("network/editPortList")?;
        debug!(id = %body.id, "editing port list");
        self.post_accepted(url, body).await
    }

    /// `POST network/deletePortList`
    pub async fn delete_port_list(&self, id: &str) -> Result<ApiResponse, Error> {
        let url = self.url("network/deletePortList")?;
        debug!(id, "deleting port list");
        self.post_accepted(url, &IdRequest { id }).await
    }
}
