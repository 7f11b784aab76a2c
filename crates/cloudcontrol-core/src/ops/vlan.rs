// VLAN operations.

use std::net::Ipv4Addr;

use tracing::{debug, info, warn};

use cloudcontrol_api::caas::models::{ResourceState, Vlan};
use cloudcontrol_api::caas::requests::{AttachedVlan, DeployVlan, DetachedVlan, EditVlan, VlanFilter};

use super::{Applied, differs, optional, required};
use crate::converge::{WaitPolicy, WaitTarget};
use crate::error::CoreError;
use crate::lookup::{Named, require, select_by_id, select_by_name};
use crate::requests::{CreateVlan, UpdateVlan, VlanMode};
use crate::session::Session;
use crate::validate;

impl Session {
    pub async fn list_vlans(&self, filter: &VlanFilter) -> Result<Vec<Vlan>, CoreError> {
        Ok(self.client().list_vlans(filter).await?)
    }

    pub async fn get_vlan(&self, id: &str) -> Result<Vlan, CoreError> {
        required(self.client().get_vlan(id).await, Vlan::KIND, id)
    }

    /// The VLAN called `name` in a network domain, if any.
    pub async fn find_vlan(
        &self,
        network_domain_id: &str,
        name: &str,
    ) -> Result<Option<Vlan>, CoreError> {
        let vlans = self
            .client()
            .list_vlans(&scoped(network_domain_id))
            .await?;
        select_by_name(vlans, name, self.name_policy())
    }

    pub async fn require_vlan(&self, network_domain_id: &str, name: &str) -> Result<Vlan, CoreError> {
        require(self.find_vlan(network_domain_id, name).await?, name)
    }

    /// Deploy a VLAN unless one with the same name exists in the domain.
    pub async fn create_vlan(
        &self,
        req: &CreateVlan,
        wait: Option<&WaitPolicy>,
    ) -> Result<Applied<Vlan>, CoreError> {
        validate::name(Vlan::KIND, &req.name)?;
        validate_network(&req.private_ipv4_network, req.private_ipv4_prefix_size)?;
        if let VlanMode::Detached { ipv4_gateway } = &req.mode {
            ipv4_gateway.parse::<Ipv4Addr>().map_err(|_| {
                CoreError::validation(format!("'{ipv4_gateway}' is not an IPv4 gateway address"))
            })?;
        }

        if let Some(existing) = self.find_vlan(&req.network_domain_id, &req.name).await? {
            debug!(name = %req.name, id = %existing.id, "VLAN already exists");
            return Ok(Applied::unchanged(existing));
        }

        let (attached_vlan, detached_vlan) = match &req.mode {
            VlanMode::Attached(side) => (
                Some(AttachedVlan {
                    gateway_addressing: *side,
                }),
                None,
            ),
            VlanMode::Detached { ipv4_gateway } => (
                None,
                Some(DetachedVlan {
                    ipv4_gateway_address: ipv4_gateway.clone(),
                }),
            ),
        };
        let body = DeployVlan {
            network_domain_id: req.network_domain_id.clone(),
            name: req.name.clone(),
            description: req.description.clone(),
            private_ipv4_network_address: req.private_ipv4_network.clone(),
            private_ipv4_prefix_size: req.private_ipv4_prefix_size,
            attached_vlan,
            detached_vlan,
        };
        let resp = self.client().deploy_vlan(&body).await?;
        let id = resp.created_id()?;
        info!(name = %req.name, id = %id, network_domain = %req.network_domain_id, "VLAN deploy accepted");

        let vlan = match wait {
            Some(policy) => self.wait_for_vlan(&req.network_domain_id, &id, policy).await?,
            None => self.get_vlan(&id).await?,
        };
        Ok(Applied::submitted(&resp, vlan))
    }

    /// Send only changed fields. Gateway addresses apply to detached VLANs
    /// only and are dropped with a warning otherwise.
    pub async fn update_vlan(
        &self,
        id: &str,
        req: &UpdateVlan,
        wait: Option<&WaitPolicy>,
    ) -> Result<Applied<Vlan>, CoreError> {
        let current = self.get_vlan(id).await?;
        if let Some(name) = &req.name {
            validate::name(Vlan::KIND, name)?;
        }

        let gateways_allowed = current.is_detached();
        if !gateways_allowed && (req.ipv4_gateway.is_some() || req.ipv6_gateway.is_some()) {
            warn!(id, "gateway addresses can only be changed on detached VLANs, ignoring");
        }

        let edit = EditVlan {
            id: id.to_owned(),
            name: differs(req.name.clone(), Some(&current.name)),
            description: differs(req.description.clone(), current.description.as_ref()),
            ipv4_gateway_address: req
                .ipv4_gateway
                .clone()
                .filter(|_| gateways_allowed)
                .filter(|gw| current.ipv4_gateway_address.as_ref() != Some(gw)),
            ipv6_gateway_address: req
                .ipv6_gateway
                .clone()
                .filter(|_| gateways_allowed)
                .filter(|gw| current.ipv6_gateway_address.as_ref() != Some(gw)),
        };
        if edit.name.is_none()
            && edit.description.is_none()
            && edit.ipv4_gateway_address.is_none()
            && edit.ipv6_gateway_address.is_none()
        {
            debug!(id, "VLAN already up to date");
            return Ok(Applied::unchanged(current));
        }

        let resp = self.client().edit_vlan(&edit).await?;
        let vlan = match (wait, current.network_domain_id()) {
            (Some(policy), Some(domain)) => self.wait_for_vlan(domain, id, policy).await?,
            _ => self.get_vlan(id).await?,
        };
        Ok(Applied::submitted(&resp, vlan))
    }

    /// Delete by id and, when asked, poll the domain's VLAN list until the
    /// entry is gone.
    pub async fn delete_vlan(
        &self,
        id: &str,
        wait: Option<&WaitPolicy>,
    ) -> Result<Applied<Option<Vlan>>, CoreError> {
        let Some(current) = optional(self.client().get_vlan(id).await)? else {
            debug!(id, "VLAN already absent");
            return Ok(Applied::unchanged(None));
        };

        let resp = self.client().delete_vlan(id).await?;
        info!(id, name = %current.name, "VLAN delete accepted");

        if let Some(policy) = wait {
            let domain = current.network_domain_id().unwrap_or_default();
            self.poller()
                .wait_until_absent(&WaitTarget::new(Vlan::KIND, id), policy, move || {
                    self.locate_vlan(domain, id)
                })
                .await?;
        }
        Ok(Applied::submitted(&resp, Some(current)))
    }

    /// Poll until the VLAN reports `NORMAL`.
    pub async fn wait_for_vlan(
        &self,
        network_domain_id: &str,
        id: &str,
        policy: &WaitPolicy,
    ) -> Result<Vlan, CoreError> {
        self.poller()
            .wait_until(
                &WaitTarget::new(Vlan::KIND, id),
                policy,
                move || self.locate_vlan(network_domain_id, id),
                |v: &Vlan| v.state == ResourceState::Normal,
            )
            .await
    }

    async fn locate_vlan(&self, network_domain_id: &str, id: &str) -> Result<Option<Vlan>, CoreError> {
        let vlans = self
            .client()
            .list_vlans(&scoped(network_domain_id))
            .await?;
        Ok(select_by_id(vlans, id))
    }
}

fn scoped(network_domain_id: &str) -> VlanFilter {
    let mut filter = VlanFilter::default();
    if !network_domain_id.is_empty() {
        filter.network_domain_id = Some(network_domain_id.to_owned());
    }
    filter
}

fn validate_network(address: &str, prefix_size: u8) -> Result<(), CoreError> {
    address.parse::<Ipv4Addr>().map_err(|_| {
        CoreError::validation(format!("'{address}' is not an IPv4 network address"))
    })?;
    if prefix_size > 32 {
        return Err(CoreError::validation(format!(
            "VLAN prefix size {prefix_size} is out of range"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vlan_network_bounds() {
        assert!(validate_network("10.0.0.0", 24).is_ok());
        assert!(validate_network("10.0.0.0", 33).is_err());
        assert!(validate_network("not-an-ip", 24).is_err());
    }

    #[test]
    fn empty_scope_sends_no_filter() {
        assert!(scoped("").network_domain_id.is_none());
        assert_eq!(scoped("nd-1").network_domain_id.as_deref(), Some("nd-1"));
    }
}
