// Firewall rule operations.
//
// IP address list and port list names are resolved to ids inside the
// rule's network domain before anything is submitted.

use tracing::{debug, info};

use cloudcontrol_api::caas::models::FirewallRule;
use cloudcontrol_api::caas::requests::{
    CreateFirewallRule as CreateRuleBody, EditFirewallRule, IpMatch, Placement, RuleEndpoint,
};

use super::{Applied, optional, required};
use crate::error::CoreError;
use crate::lookup::{Named, require, select_by_name};
use crate::requests::{AddressSpec, CreateFirewallRule, EndpointSpec, PortMatch, UpdateFirewallRule};
use crate::session::Session;
use crate::validate::{self, PortSpec};

impl Session {
    pub async fn list_firewall_rules(
        &self,
        network_domain_id: &str,
    ) -> Result<Vec<FirewallRule>, CoreError> {
        Ok(self.client().list_firewall_rules(network_domain_id).await?)
    }

    pub async fn get_firewall_rule(&self, id: &str) -> Result<FirewallRule, CoreError> {
        required(
            self.client().get_firewall_rule(id).await,
            FirewallRule::KIND,
            id,
        )
    }

    pub async fn find_firewall_rule(
        &self,
        network_domain_id: &str,
        name: &str,
    ) -> Result<Option<FirewallRule>, CoreError> {
        let rules = self.client().list_firewall_rules(network_domain_id).await?;
        select_by_name(rules, name, self.name_policy())
    }

    pub async fn require_firewall_rule(
        &self,
        network_domain_id: &str,
        name: &str,
    ) -> Result<FirewallRule, CoreError> {
        require(self.find_firewall_rule(network_domain_id, name).await?, name)
    }

    /// Create a rule unless one with the same name exists in the domain.
    pub async fn create_firewall_rule(
        &self,
        req: &CreateFirewallRule,
    ) -> Result<Applied<FirewallRule>, CoreError> {
        validate::name(FirewallRule::KIND, &req.name)?;
        if req.position.needs_relative_rule() && req.relative_to.is_none() {
            return Err(CoreError::validation(format!(
                "position {} needs a rule to be placed relative to",
                req.position
            )));
        }
        check_ports("source", &req.source)?;
        check_ports("destination", &req.destination)?;

        let domain = req.network_domain_id.as_str();
        if let Some(existing) = self.find_firewall_rule(domain, &req.name).await? {
            debug!(name = %req.name, id = %existing.id, "firewall rule already exists");
            return Ok(Applied::unchanged(existing));
        }

        let body = CreateRuleBody {
            network_domain_id: req.network_domain_id.clone(),
            name: req.name.clone(),
            action: req.action,
            ip_version: req.ip_version,
            protocol: req.protocol,
            source: self.rule_endpoint(domain, &req.source).await?,
            destination: self.rule_endpoint(domain, &req.destination).await?,
            enabled: req.enabled,
            placement: Placement {
                position: Some(req.position),
                relative_to_rule: self.relative_rule(domain, req.relative_to.as_deref()).await?,
            },
        };
        let resp = self.client().create_firewall_rule(&body).await?;
        let id = resp.created_id()?;
        info!(name = %req.name, id = %id, network_domain = domain, "firewall rule created");

        let rule = self.get_firewall_rule(&id).await?;
        Ok(Applied::submitted(&resp, rule))
    }

    /// Send only the fields the caller supplied.
    pub async fn update_firewall_rule(
        &self,
        id: &str,
        req: &UpdateFirewallRule,
    ) -> Result<Applied<FirewallRule>, CoreError> {
        if let Some(source) = &req.source {
            check_ports("source", source)?;
        }
        if let Some(destination) = &req.destination {
            check_ports("destination", destination)?;
        }
        let current = self.get_firewall_rule(id).await?;
        let domain = current.network_domain_id.clone().unwrap_or_default();

        let placement = match (req.position, req.relative_to.as_deref()) {
            (None, None) => None,
            (Some(position), relative) => {
                if position.needs_relative_rule() && relative.is_none() {
                    return Err(CoreError::validation(format!(
                        "position {position} needs a rule to be placed relative to"
                    )));
                }
                Some(Placement {
                    position: Some(position),
                    relative_to_rule: self.relative_rule(&domain, relative).await?,
                })
            }
            (None, Some(_)) => {
                return Err(CoreError::validation(
                    "a relative rule needs a BEFORE or AFTER position",
                ));
            }
        };

        let mut edit = EditFirewallRule {
            id: id.to_owned(),
            action: req.action,
            protocol: req.protocol,
            enabled: req.enabled,
            placement,
            ..EditFirewallRule::default()
        };
        if let Some(source) = &req.source {
            edit.source = Some(self.rule_endpoint(&domain, source).await?);
        }
        if let Some(destination) = &req.destination {
            edit.destination = Some(self.rule_endpoint(&domain, destination).await?);
        }

        if edit.action.is_none()
            && edit.protocol.is_none()
            && edit.enabled.is_none()
            && edit.placement.is_none()
            && edit.source.is_none()
            && edit.destination.is_none()
        {
            return Ok(Applied::unchanged(current));
        }

        let resp = self.client().edit_firewall_rule(&edit).await?;
        info!(id, name = %current.name, "firewall rule updated");
        let rule = self.get_firewall_rule(id).await?;
        Ok(Applied::submitted(&resp, rule))
    }

    pub async fn delete_firewall_rule(
        &self,
        id: &str,
    ) -> Result<Applied<Option<FirewallRule>>, CoreError> {
        let Some(current) = optional(self.client().get_firewall_rule(id).await)? else {
            debug!(id, "firewall rule already absent");
            return Ok(Applied::unchanged(None));
        };
        let resp = self.client().delete_firewall_rule(id).await?;
        info!(id, name = %current.name, "firewall rule deleted");
        Ok(Applied::submitted(&resp, Some(current)))
    }

    /// Turn a source or destination spec into its wire form. `ANY` as a
    /// port leaves the port clause out entirely.
    async fn rule_endpoint(
        &self,
        network_domain_id: &str,
        spec: &EndpointSpec,
    ) -> Result<RuleEndpoint, CoreError> {
        let mut endpoint = RuleEndpoint::default();
        match &spec.address {
            AddressSpec::Literal {
                address,
                prefix_size,
            } => {
                endpoint.ip = Some(IpMatch {
                    address: address.clone(),
                    prefix_size: *prefix_size,
                });
            }
            AddressSpec::List(name) => {
                let list = self
                    .require_ip_address_list(network_domain_id, name)
                    .await
                    .map_err(|e| e.reference("IP address list", name))?;
                endpoint.ip_address_list_id = Some(list.id);
            }
        }
        match &spec.port {
            PortMatch::Ports(ports) => endpoint.port = ports.to_wire(),
            PortMatch::List(name) => {
                let list = self
                    .require_port_list(network_domain_id, name)
                    .await
                    .map_err(|e| e.reference("port list", name))?;
                endpoint.port_list_id = Some(list.id);
            }
        }
        Ok(endpoint)
    }

    async fn relative_rule(
        &self,
        network_domain_id: &str,
        name: Option<&str>,
    ) -> Result<Option<String>, CoreError> {
        let Some(name) = name else {
            return Ok(None);
        };
        let rule = self
            .require_firewall_rule(network_domain_id, name)
            .await
            .map_err(|e| e.reference("relative firewall rule", name))?;
        Ok(Some(rule.id))
    }
}

/// Literal ranges can be built without going through the parser, so the
/// ordering is checked again before anything is looked up.
fn check_ports(side: &str, spec: &EndpointSpec) -> Result<(), CoreError> {
    if let PortMatch::Ports(PortSpec::Range(range)) = &spec.port {
        validate::port_range(range.begin, range.end).map_err(|e| match e {
            CoreError::Validation { message } => CoreError::validation(format!("{side}: {message}")),
            other => other,
        })?;
    }
    Ok(())
}
