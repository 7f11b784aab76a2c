// CaaS VLAN endpoints

use tracing::debug;

use crate::caas::client::{CaasClient, NO_QUERY};
use crate::caas::models::{ApiResponse, Vlan};
use crate::caas::requests::{DeployVlan, EditVlan, IdRequest, VlanFilter};
use crate::error::Error;

impl CaasClient {
    /// List VLANs matching `filter`.
    ///
    /// `GET network/vlan`
    pub async fn list_vlans(&self, filter: &VlanFilter) -> Result<Vec<Vlan>, Error> {
        let url = self.url("network/vlan")?;
        debug!(?filter, "listing vlans");
        self.get_collection(url, filter, "vlan").await
    }

    /// `GET network/vlan/{id}`
    pub async fn get_vlan(&self, id: &str) -> Result<Vlan, Error> {
        let url = self.url(&format!("network/vlan/{id}"))?;
        self.get(url, NO_QUERY).await
    }

    /// `POST network/deployVlan`
    pub async fn deploy_vlan(&self, body: &DeployVlan) -> Result<ApiResponse, Error> {
        let url = self.url("network/deployVlan")?;
        debug!(
            name = %body.name,
            network_domain = %body.network_domain_id,
            "deploying vlan"
        );
        self.post_accepted(url, body).await
    }

    /// `POST network/editVlan`
    pub async fn edit_vlan(&self, body: &EditVlan) -> Result<ApiResponse, Error> {
        let url = self.url("network/editVlan")?;
        debug!(id = %body.id, "editing vlan");
        self.post_accepted(url, body).await
    }

    /// `POST network/deleteVlan` with `{"id": "..."}`
    pub async fn delete_vlan(&self, id: &str) -> Result<ApiResponse, Error> {
        let url = self.url("network/deleteVlan")?;
        debug!(id, "deleting vlan");
        self.post_accepted(url, &IdRequest { id }).await
    }
}
