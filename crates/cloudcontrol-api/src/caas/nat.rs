// CaaS NAT rule endpoints

use tracing::debug;

use crate::caas::client::{CaasClient, NO_QUERY};
use crate::caas::models::{ApiResponse, NatRule};
use crate::caas::requests::{CreateNatRule, IdRequest};
use crate::error::Error;

impl CaasClient {
    /// `GET network/natRule?networkDomainId=...`
    pub async fn list_nat_rules(&self, network_domain_id: &str) -> Result<Vec<NatRule>, Error> {
        let url = self.url("network/natRule")?;
        debug!(network_domain = network_domain_id, "listing nat rules");
        self.get_collection(url, &[("networkDomainId", network_domain_id)], "natRule")
            .await
    }

    /// `GET network/natRule/{id}`
    pub async fn get_nat_rule(&self, id: &str) -> Result<NatRule, Error> {
        let url = self.url(&format!("network/natRule/{id}"))?;
        self.get(url, NO_QUERY).await
    }

    /// `POST network/createNatRule`
    pub async fn create_nat_rule(&self, body: &CreateNatRule) -> Result<ApiResponse, Error> {
        let url = self.url("network/createNatRule")?;
        debug!(
            internal = %body.internal_ip,
            external = %body.external_ip,
            "creating nat rule"
        );
        self.post_accepted(url, body).await
    }

    /// `POST network/deleteNatRule`
    pub async fn delete_nat_rule(&self, id: &str) -> Result<ApiResponse, Error> {
        let url = self.url("network/deleteNatRule")?;
        debug!(id, "deleting nat rule");
        self.post_accepted(url, &IdRequest { id }).await
    }
}
