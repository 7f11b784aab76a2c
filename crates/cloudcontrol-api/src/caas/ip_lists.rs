// CaaS IP address list endpoints

use tracing::debug;

use crate::caas::client::{CaasClient, NO_QUERY};
use crate::caas::models::{ApiResponse, IpAddressList};
use crate::caas::requests::{CreateIpAddressList, EditIpAddressList, IdRequest};
use crate::error::Error;

impl CaasClient {
    /// `GET network/ipAddressList?networkDomainId=...`
    pub async fn list_ip_address_lists(
        &self,
        network_domain_id: &str,
    ) -> Result<Vec<IpAddressList>, Error> {
        let url = self.url("network/ipAddressList")?;
        debug!(network_domain = network_domain_id, "listing ip address lists");
        self.get_collection(url, &[("networkDomainId", network_domain_id)], "ipAddressList")
            .await
    }

    /// `GET network/ipAddressList/{id}`
    pub async fn get_ip_address_list(&self, id: &str) -> Result<IpAddressList, Error> {
        let url = self.url(&format!("network/ipAddressList/{id}"))?;
        self.get(url, NO_QUERY).await
    }

    /// `POST network/createIpAddressList`
    pub async fn create_ip_address_list(
        &self,
        body: &CreateIpAddressList,
    ) -> Result<ApiResponse, Error> {
        let url = self.url("network/createIpAddressList")?;
        debug!(name = %body.name, "creating ip address list");
        self.post_accepted(url, body).await
    }

    /// `POST network/editIpAddressList`
    pub async fn edit_ip_address_list(
        &self,
        body: &EditIpAddressList,
    ) -> Result<ApiResponse, Error> {
        let url = self.url("network/editIpAddressList")?;
        debug!(id = %body.id, "editing ip address list");
        self.post_accepted(url, body).await
    }

    /// `POST network/deleteIpAddressList`
    pub async fn delete_ip_address_list(&self, id: &str) -> Result<ApiResponse, Error> {
        let url = self.url("network/deleteIpAddressList")?;
        debug!(id, "deleting ip address list");
        self.post_accepted(url, &IdRequest { id }).await
    }
}
