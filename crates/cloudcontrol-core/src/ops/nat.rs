// NAT rule operations. A rule is identified by its internal address.

use std::net::IpAddr;

use tracing::{debug, info};

use cloudcontrol_api::caas::models::NatRule;
use cloudcontrol_api::caas::requests::CreateNatRule as CreateNatRuleBody;

use super::{Applied, optional, required};
use crate::error::CoreError;
use crate::requests::CreateNatRule;
use crate::session::Session;

const KIND: &str = "NAT rule";

impl Session {
    pub async fn list_nat_rules(&self, network_domain_id: &str) -> Result<Vec<NatRule>, CoreError> {
        Ok(self.client().list_nat_rules(network_domain_id).await?)
    }

    pub async fn get_nat_rule(&self, id: &str) -> Result<NatRule, CoreError> {
        required(self.client().get_nat_rule(id).await, KIND, id)
    }

    /// The rule translating `internal_ip`, if any.
    pub async fn find_nat_rule(
        &self,
        network_domain_id: &str,
        internal_ip: &str,
    ) -> Result<Option<NatRule>, CoreError> {
        let rules = self.client().list_nat_rules(network_domain_id).await?;
        Ok(rules.into_iter().find(|r| r.internal_ip == internal_ip))
    }

    /// Create a rule unless the internal address is already translated.
    pub async fn create_nat_rule(&self, req: &CreateNatRule) -> Result<Applied<NatRule>, CoreError> {
        check_address("internal", &req.internal_ip)?;
        check_address("external", &req.external_ip)?;

        if let Some(existing) = self
            .find_nat_rule(&req.network_domain_id, &req.internal_ip)
            .await?
        {
            debug!(internal = %req.internal_ip, id = %existing.id, "NAT rule already exists");
            return Ok(Applied::unchanged(existing));
        }

        let body = CreateNatRuleBody {
            network_domain_id: req.network_domain_id.clone(),
            internal_ip: req.internal_ip.clone(),
            external_ip: req.external_ip.clone(),
        };
        let resp = self.client().create_nat_rule(&body).await?;
        let id = resp.created_id()?;
        info!(id = %id, internal = %req.internal_ip, external = %req.external_ip, "NAT rule created");

        let rule = self.get_nat_rule(&id).await?;
        Ok(Applied::submitted(&resp, rule))
    }

    pub async fn delete_nat_rule(&self, id: &str) -> Result<Applied<Option<NatRule>>, CoreError> {
        let Some(current) = optional(self.client().get_nat_rule(id).await)? else {
            debug!(id, "NAT rule already absent");
            return Ok(Applied::unchanged(None));
        };
        let resp = self.client().delete_nat_rule(id).await?;
        info!(id, internal = %current.internal_ip, "NAT rule deleted");
        Ok(Applied::submitted(&resp, Some(current)))
    }
}

fn check_address(side: &str, raw: &str) -> Result<(), CoreError> {
    if raw.trim().is_empty() {
        return Err(CoreError::validation(format!("an {side} IP address is required")));
    }
    raw.parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| CoreError::validation(format!("'{raw}' is not a valid {side} IP address")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_addresses_must_parse() {
        assert!(check_address("internal", "10.0.0.5").is_ok());
        assert!(check_address("external", "").is_err());
        assert!(check_address("external", "203.0.113").is_err());
    }
}
