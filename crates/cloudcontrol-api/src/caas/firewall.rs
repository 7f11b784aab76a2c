// CaaS firewall rule endpoints

use tracing::debug;

use crate::caas::client::{CaasClient, NO_QUERY};
use crate::caas::models::{ApiResponse, FirewallRule};
use crate::caas::requests::{CreateFirewallRule, EditFirewallRule, IdRequest};
use crate::error::Error;

impl CaasClient {
    /// `GET network/firewallRule?networkDomainId=...`
    pub async fn list_firewall_rules(
        &self,
        network_domain_id: &str,
    ) -> Result<Vec<FirewallRule>, Error> {
        let url = self.url("network/firewallRule")?;
        debug!(network_domain = network_domain_id, "listing firewall rules");
        self.get_collection(url, &[("networkDomainId", network_domain_id)], "firewallRule")
            .await
    }

    /// `GET network/firewallRule/{id}`
    pub async fn get_firewall_rule(&self, id: &str) -> Result<FirewallRule, Error> {
        let url = self.url(&format!("network/firewallRule/{id}"))?;
        self.get(url, NO_QUERY).await
    }

    /// `POST network/createFirewallRule`
    pub async fn create_firewall_rule(
        &self,
        body: &CreateFirewallRule,
    ) -> Result<ApiResponse, Error> {
        let url = self.url("network/createFirewallRule")?;
        debug!(name = %body.name, action = %body.action, "creating firewall rule");
        self.post_accepted(url, body).await
    }

    /// `POST network/editFirewallRule`
    pub async fn edit_firewall_rule(&self, body: &EditFirewallRule) -> Result<ApiResponse, Error> {
        let url = self.url("network/editFirewallRule")?;
        debug!(id = %body.id, "editing firewall rule");
        self.post_accepted(url, body).await
    }

    /// `POST network/deleteFirewallRule`
    pub async fn delete_firewall_rule(&self, id: &str) -> Result<ApiResponse, Error> {
        let url = self.url("network/deleteFirewallRule")?;
        debug!(id, "deleting firewall rule");
        self.post_accepted(url, &IdRequest { id }).await
    }
}
