// Network domain operations.

use tracing::{debug, info};

use cloudcontrol_api::caas::models::{NetworkDomain, ResourceState};
use cloudcontrol_api::caas::requests::{DeployNetworkDomain, EditNetworkDomain, NetworkDomainFilter};

use super::{Applied, differs, optional, required};
use crate::converge::{WaitPolicy, WaitTarget};
use crate::error::CoreError;
use crate::lookup::{Named, require, select_by_id, select_by_name};
use crate::requests::{CreateNetworkDomain, UpdateNetworkDomain};
use crate::session::Session;
use crate::validate;

impl Session {
    pub async fn list_network_domains(
        &self,
        filter: &NetworkDomainFilter,
    ) -> Result<Vec<NetworkDomain>, CoreError> {
        Ok(self.client().list_network_domains(filter).await?)
    }

    pub async fn get_network_domain(&self, id: &str) -> Result<NetworkDomain, CoreError> {
        required(
            self.client().get_network_domain(id).await,
            NetworkDomain::KIND,
            id,
        )
    }

    /// The network domain called `name` in `datacenter_id`, if any.
    pub async fn find_network_domain(
        &self,
        datacenter_id: &str,
        name: &str,
    ) -> Result<Option<NetworkDomain>, CoreError> {
        let filter = NetworkDomainFilter {
            datacenter_id: Some(datacenter_id.to_owned()),
            ..NetworkDomainFilter::default()
        };
        let domains = self.client().list_network_domains(&filter).await?;
        select_by_name(domains, name, self.name_policy())
    }

    pub async fn require_network_domain(
        &self,
        datacenter_id: &str,
        name: &str,
    ) -> Result<NetworkDomain, CoreError> {
        require(self.find_network_domain(datacenter_id, name).await?, name)
    }

    /// Deploy a network domain unless one with the same name exists in the
    /// datacenter; the existing one is returned unchanged.
    pub async fn create_network_domain(
        &self,
        req: &CreateNetworkDomain,
        wait: Option<&WaitPolicy>,
    ) -> Result<Applied<NetworkDomain>, CoreError> {
        validate::name(NetworkDomain::KIND, &req.name)?;
        if let Some(existing) = self
            .find_network_domain(&req.datacenter_id, &req.name)
            .await?
        {
            debug!(name = %req.name, id = %existing.id, "network domain already exists");
            return Ok(Applied::unchanged(existing));
        }

        let body = DeployNetworkDomain {
            datacenter_id: req.datacenter_id.clone(),
            name: req.name.clone(),
            description: req.description.clone(),
            domain_type: req.domain_type,
        };
        let resp = self.client().deploy_network_domain(&body).await?;
        let id = resp.created_id()?;
        info!(
            name = %req.name,
            id = %id,
            datacenter = %req.datacenter_id,
            "network domain deploy accepted"
        );

        let domain = match wait {
            Some(policy) => {
                self.wait_for_network_domain(Some(&req.datacenter_id), &id, policy)
                    .await?
            }
            None => self.get_network_domain(&id).await?,
        };
        Ok(Applied::submitted(&resp, domain))
    }

    /// Send only the fields that differ from the live domain.
    pub async fn update_network_domain(
        &self,
        id: &str,
        req: &UpdateNetworkDomain,
        wait: Option<&WaitPolicy>,
    ) -> Result<Applied<NetworkDomain>, CoreError> {
        let current = self.get_network_domain(id).await?;
        if let Some(name) = &req.name {
            validate::name(NetworkDomain::KIND, name)?;
        }

        let edit = EditNetworkDomain {
            id: id.to_owned(),
            name: differs(req.name.clone(), Some(&current.name)),
            description: differs(req.description.clone(), current.description.as_ref()),
            domain_type: req.domain_type.filter(|t| {
                let wanted: &'static str = (*t).into();
                current.domain_type.as_deref() != Some(wanted)
            }),
        };
        if edit.name.is_none() && edit.description.is_none() && edit.domain_type.is_none() {
            debug!(id, "network domain already up to date");
            return Ok(Applied::unchanged(current));
        }

        let resp = self.client().edit_network_domain(&edit).await?;
        let domain = match wait {
            Some(policy) => {
                self.wait_for_network_domain(current.datacenter_id.as_deref(), id, policy)
                    .await?
            }
            None => self.get_network_domain(id).await?,
        };
        Ok(Applied::submitted(&resp, domain))
    }

    /// Delete by id. An already-absent domain is reported unchanged.
    pub async fn delete_network_domain(
        &self,
        id: &str,
        wait: Option<&WaitPolicy>,
    ) -> Result<Applied<Option<NetworkDomain>>, CoreError> {
        let Some(current) = optional(self.client().get_network_domain(id).await)? else {
            debug!(id, "network domain already absent");
            return Ok(Applied::unchanged(None));
        };

        let resp = self.client().delete_network_domain(id).await?;
        info!(id, name = %current.name, "network domain delete accepted");

        if let Some(policy) = wait {
            let datacenter = current.datacenter_id.as_deref();
            self.poller()
                .wait_until_absent(
                    &WaitTarget::new(NetworkDomain::KIND, id),
                    policy,
                    move || self.locate_network_domain(datacenter, id),
                )
                .await?;
        }
        Ok(Applied::submitted(&resp, Some(current)))
    }

    /// Poll until the domain reports `NORMAL`.
    pub async fn wait_for_network_domain(
        &self,
        datacenter_id: Option<&str>,
        id: &str,
        policy: &WaitPolicy,
    ) -> Result<NetworkDomain, CoreError> {
        self.poller()
            .wait_until(
                &WaitTarget::new(NetworkDomain::KIND, id),
                policy,
                move || self.locate_network_domain(datacenter_id, id),
                |d: &NetworkDomain| d.state == ResourceState::Normal,
            )
            .await
    }

    async fn locate_network_domain(
        &self,
        datacenter_id: Option<&str>,
        id: &str,
    ) -> Result<Option<NetworkDomain>, CoreError> {
        let filter = NetworkDomainFilter {
            datacenter_id: datacenter_id.map(str::to_owned),
            ..NetworkDomainFilter::default()
        };
        let domains = self.client().list_network_domains(&filter).await?;
        Ok(select_by_id(domains, id))
    }
}
