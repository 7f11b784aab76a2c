// Server operations.
//
// Servers are looked up inside their network domain. Reconfiguration and
// disk expansion are refused while a server is running, and a delete
// stops a running server first.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use cloudcontrol_api::caas::models::{ResourceState, Server};
use cloudcontrol_api::caas::requests::{
    CpuSpec, DeployServer, DiskSpec, ExpandDisk, NetworkInfoSpec, NicSpec, ReconfigureServer,
    ServerFilter,
};
use cloudcontrol_api::ShutdownOutcome;

use super::{Applied, optional, required};
use crate::converge::{POWER_POLL_CAP, PRE_DELETE_POLL_CAP, WaitPolicy, WaitTarget};
use crate::error::CoreError;
use crate::lookup::{Named, require, select_by_id, select_by_name};
use crate::password::generate_password;
use crate::requests::{CreateServer, NicPlacement, NicRequest, PowerAction, UpdateServer};
use crate::session::Session;

/// A deployed server and, for customized deploys, its administrator
/// password.
#[derive(Debug, Clone)]
pub struct Deployed {
    pub server: Server,
    pub administrator_password: Option<SecretString>,
}

impl Session {
    pub async fn list_servers(&self, filter: &ServerFilter) -> Result<Vec<Server>, CoreError> {
        Ok(self.client().list_servers(filter).await?)
    }

    pub async fn get_server(&self, id: &str) -> Result<Server, CoreError> {
        required(self.client().get_server(id).await, Server::KIND, id)
    }

    /// The server called `name` in a network domain, if any.
    pub async fn find_server(
        &self,
        network_domain_id: &str,
        name: &str,
    ) -> Result<Option<Server>, CoreError> {
        let servers = self
            .client()
            .list_servers(&scoped(network_domain_id))
            .await?;
        select_by_name(servers, name, self.name_policy())
    }

    pub async fn require_server(
        &self,
        network_domain_id: &str,
        name: &str,
    ) -> Result<Server, CoreError> {
        require(self.find_server(network_domain_id, name).await?, name)
    }

    /// Deploy a server unless one with the same name exists in the domain.
    ///
    /// VLAN names on every NIC are resolved first. A customized deploy
    /// without a password gets a generated one, returned in [`Deployed`].
    pub async fn create_server(
        &self,
        req: &CreateServer,
        wait: Option<&WaitPolicy>,
    ) -> Result<Applied<Deployed>, CoreError> {
        req.validate()?;
        if let Some(existing) = self.find_server(&req.network_domain_id, &req.name).await? {
            debug!(name = %req.name, id = %existing.id, "server already exists");
            return Ok(Applied::unchanged(Deployed {
                server: existing,
                administrator_password: None,
            }));
        }

        let primary_nic = self.nic_spec(&req.network_domain_id, &req.primary_nic).await?;
        let mut additional_nic = Vec::with_capacity(req.additional_nics.len());
        for nic in &req.additional_nics {
            additional_nic.push(self.nic_spec(&req.network_domain_id, nic).await?);
        }

        let password = if req.customize {
            Some(
                req.administrator_password
                    .clone()
                    .unwrap_or_else(|| SecretString::from(generate_password())),
            )
        } else {
            if req.administrator_password.is_some() {
                warn!(name = %req.name, "administrator password ignored without guest OS customization");
            }
            None
        };

        let cpu = (req.cpu_count.is_some() || req.cores_per_socket.is_some() || req.cpu_speed.is_some())
            .then(|| CpuSpec {
                count: req.cpu_count,
                speed: req.cpu_speed.clone(),
                cores_per_socket: req.cores_per_socket,
            });
        let body = DeployServer {
            name: req.name.clone(),
            description: req.description.clone(),
            image_id: req.image_id.clone(),
            start: req.start,
            administrator_password: password.as_ref().map(|p| p.expose_secret().to_owned()),
            cpu,
            memory_gb: req.memory_gb,
            primary_dns: req.primary_dns.clone(),
            secondary_dns: req.secondary_dns.clone(),
            ipv4_gateway: req.ipv4_gateway.clone(),
            ipv6_gateway: req.ipv6_gateway.clone(),
            network_info: NetworkInfoSpec {
                network_domain_id: req.network_domain_id.clone(),
                primary_nic,
                additional_nic,
            },
            disk: req
                .disks
                .iter()
                .map(|d| DiskSpec {
                    id: d.id.clone(),
                    speed: d.speed,
                    iops: d.iops,
                })
                .collect(),
        };

        let resp = self.client().deploy_server(&body, req.customize).await?;
        let id = resp.created_id()?;
        info!(name = %req.name, id = %id, image = %req.image_id, "server deploy accepted");

        let server = match wait {
            Some(policy) => {
                self.wait_for_server(&req.network_domain_id, &id, policy, Some(req.start))
                    .await?
            }
            None => self.get_server(&id).await?,
        };
        Ok(Applied::submitted(
            &resp,
            Deployed {
                server,
                administrator_password: password,
            },
        ))
    }

    /// Change CPU and memory on a stopped server.
    pub async fn update_server(
        &self,
        id: &str,
        req: &UpdateServer,
        wait: Option<&WaitPolicy>,
    ) -> Result<Applied<Server>, CoreError> {
        let current = self.get_server(id).await?;
        if req.is_empty() {
            return Ok(Applied::unchanged(current));
        }
        if current.started {
            return Err(CoreError::validation(format!(
                "server {} cannot be reconfigured while it is running",
                current.name
            )));
        }

        let body = ReconfigureServer {
            id: id.to_owned(),
            cpu_count: req.cpu_count,
            cores_per_socket: req.cores_per_socket,
            cpu_speed: req.cpu_speed.clone(),
            memory_gb: req.memory_gb,
        };
        let resp = self.client().reconfigure_server(&body).await?;
        info!(id, name = %current.name, "server reconfigure accepted");

        let server = self.settle(&current, wait, Some(false)).await?;
        Ok(Applied::submitted(&resp, server))
    }

    /// Grow one of a stopped server's disks. The new size must exceed the
    /// current one.
    pub async fn expand_disk(
        &self,
        server_id: &str,
        disk_id: &str,
        new_size_gb: u32,
        wait: Option<&WaitPolicy>,
    ) -> Result<Applied<Server>, CoreError> {
        let current = self.get_server(server_id).await?;
        if current.started {
            return Err(CoreError::validation(format!(
                "disks on server {} cannot be expanded while it is running",
                current.name
            )));
        }
        let disk = current
            .disk
            .iter()
            .find(|d| d.id == disk_id)
            .ok_or_else(|| CoreError::not_found("disk", disk_id))?;
        if new_size_gb <= disk.size_gb {
            return Err(CoreError::validation(format!(
                "new size {new_size_gb}GB must be larger than the current {}GB",
                disk.size_gb
            )));
        }

        let resp = self
            .client()
            .expand_disk(&ExpandDisk {
                id: disk_id.to_owned(),
                new_size_gb,
            })
            .await?;
        info!(server = server_id, disk = disk_id, new_size_gb, "disk expansion accepted");

        let server = self.settle(&current, wait, None).await?;
        Ok(Applied::submitted(&resp, server))
    }

    /// Start, stop or reboot. Starting a running server or stopping a
    /// stopped one changes nothing.
    pub async fn power(
        &self,
        id: &str,
        action: PowerAction,
        wait: Option<&WaitPolicy>,
    ) -> Result<Applied<Server>, CoreError> {
        let current = self.get_server(id).await?;
        let resp = match action {
            PowerAction::Start if current.started => {
                debug!(id, "server already running");
                return Ok(Applied::unchanged(current));
            }
            PowerAction::Stop if !current.started => {
                debug!(id, "server already stopped");
                return Ok(Applied::unchanged(current));
            }
            PowerAction::Start => self.client().start_server(id).await?,
            PowerAction::Reboot => self.client().reboot_server(id).await?,
            PowerAction::Stop => match self.client().shutdown_server(id).await? {
                ShutdownOutcome::Initiated(resp) => resp,
                ShutdownOutcome::AlreadyStopped => {
                    debug!(id, "provider reports the server already stopped");
                    return Ok(Applied::unchanged(current));
                }
            },
        };
        info!(id, name = %current.name, %action, "power command accepted");

        let expect_started = !matches!(action, PowerAction::Stop);
        let policy = wait.map(|p| p.with_interval_cap(POWER_POLL_CAP));
        let server = self
            .settle(&current, policy.as_ref(), Some(expect_started))
            .await?;
        Ok(Applied::submitted(&resp, server))
    }

    /// Delete by id. A running server is shut down and waited on first.
    pub async fn delete_server(
        &self,
        id: &str,
        wait: Option<&WaitPolicy>,
    ) -> Result<Applied<Option<Server>>, CoreError> {
        let Some(current) = optional(self.client().get_server(id).await)? else {
            debug!(id, "server already absent");
            return Ok(Applied::unchanged(None));
        };
        let domain = current.network_domain_id().unwrap_or_default();

        if current.started {
            info!(id, name = %current.name, "stopping server before delete");
            if let ShutdownOutcome::Initiated(_) = self.client().shutdown_server(id).await? {
                let policy = wait
                    .copied()
                    .unwrap_or_else(WaitPolicy::server)
                    .with_interval_cap(PRE_DELETE_POLL_CAP);
                self.wait_for_server(domain, id, &policy, Some(false)).await?;
            }
        }

        let resp = self.client().delete_server(id).await?;
        info!(id, name = %current.name, "server delete accepted");

        if let Some(policy) = wait {
            self.poller()
                .wait_until_absent(&WaitTarget::new(Server::KIND, id), policy, move || {
                    self.locate_server(domain, id)
                })
                .await?;
        }
        Ok(Applied::submitted(&resp, Some(current)))
    }

    /// Poll until the server is `NORMAL` and, when given, its `started`
    /// flag matches.
    pub async fn wait_for_server(
        &self,
        network_domain_id: &str,
        id: &str,
        policy: &WaitPolicy,
        started: Option<bool>,
    ) -> Result<Server, CoreError> {
        self.poller()
            .wait_until(
                &WaitTarget::new(Server::KIND, id),
                policy,
                move || self.locate_server(network_domain_id, id),
                |s: &Server| {
                    s.state == ResourceState::Normal && started.is_none_or(|want| s.started == want)
                },
            )
            .await
    }

    /// Wait after a command when asked, otherwise re-read once.
    async fn settle(
        &self,
        current: &Server,
        wait: Option<&WaitPolicy>,
        started: Option<bool>,
    ) -> Result<Server, CoreError> {
        match wait {
            Some(policy) => {
                let domain = current.network_domain_id().unwrap_or_default();
                self.wait_for_server(domain, &current.id, policy, started)
                    .await
            }
            None => self.get_server(&current.id).await,
        }
    }

    async fn locate_server(
        &self,
        network_domain_id: &str,
        id: &str,
    ) -> Result<Option<Server>, CoreError> {
        let servers = self
            .client()
            .list_servers(&scoped(network_domain_id))
            .await?;
        Ok(select_by_id(servers, id))
    }

    async fn nic_spec(&self, network_domain_id: &str, nic: &NicRequest) -> Result<NicSpec, CoreError> {
        let mut spec = NicSpec {
            network_adapter: nic.network_adapter.clone(),
            ..NicSpec::default()
        };
        match &nic.placement {
            NicPlacement::VlanName(name) => {
                let vlan = self
                    .require_vlan(network_domain_id, name)
                    .await
                    .map_err(|e| e.reference("NIC VLAN", name))?;
                spec.vlan_id = Some(vlan.id);
            }
            NicPlacement::VlanId(id) => spec.vlan_id = Some(id.clone()),
            NicPlacement::PrivateIpv4(ip) => spec.private_ipv4 = Some(ip.clone()),
        }
        Ok(spec)
    }
}

fn scoped(network_domain_id: &str) -> ServerFilter {
    let mut filter = ServerFilter::default();
    if !network_domain_id.is_empty() {
        filter.network_domain_id = Some(network_domain_id.to_owned());
    }
    filter
}
