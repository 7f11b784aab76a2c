// CaaS network domain endpoints
//
// Network domains are datacenter-scoped; every other network resource
// hangs off one.

use tracing::debug;

use crate::caas::client::{CaasClient, NO_QUERY};
use crate::caas::models::{ApiResponse, NetworkDomain};
use crate::caas::requests::{
    DeployNetworkDomain, EditNetworkDomain, IdRequest, NetworkDomainFilter,
};
use crate::error::Error;

impl CaasClient {
    /// List network domains matching `filter`.
    ///
    /// `GET network/networkDomain`
    pub async fn list_network_domains(
        &self,
        filter: &NetworkDomainFilter,
    ) -> Result<Vec<NetworkDomain>, Error> {
        let url = self.url("network/networkDomain")?;
        debug!(?filter, "listing network domains");
        self.get_collection(url, filter, "networkDomain").await
    }

    /// Get a single network domain.
    ///
    /// `GET network/networkDomain/{id}`
    pub async fn get_network_domain(&self, id: &str) -> Result<NetworkDomain, Error> {
        let url = self.url(&format!("network/networkDomain/{id}"))?;
        self.get(url, NO_QUERY).await
    }

    /// `POST network/deployNetworkDomain`
    pub async fn deploy_network_domain(
        &self,
        body: &DeployNetworkDomain,
    ) -> Result<ApiResponse, Error> {
        let url = self.url("network/deployNetworkDomain")?;
        debug!(name = %body.name, datacenter = %body.datacenter_id, "deploying network domain");
        self.post_accepted(url, body).await
    }

    /// `POST network/editNetworkDomain`
    pub async fn edit_network_domain(
        &self,
        body: &EditNetworkDomain,
    ) -> Result<ApiResponse, Error> {
        let url = self.url("network/editNetworkDomain")?;
        debug!(id = %body.id, "editing network domain");
        self.post_accepted(url, body).await
    }

    /// `POST network/deleteNetworkDomain` with `{"id": "..."}`
    pub async fn delete_network_domain(&self, id: &str) -> Result<ApiResponse, Error> {
        let url = self.url("network/deleteNetworkDomain")?;
        debug!(id, "deleting network domain");
        self.post_accepted(url, &IdRequest { id }).await
    }
}
