// Port list operations.

use tracing::{debug, info};

use cloudcontrol_api::caas::models::{PortList, PortRange};
use cloudcontrol_api::caas::requests::{
    CreatePortList as CreatePortListBody, EditPortList, ListUpdate,
};

use super::{Applied, optional, required};
use crate::error::CoreError;
use crate::lookup::{Named, require, resolve_child_lists, select_by_name};
use crate::requests::{CreatePortList, ListChange, UpdatePortList};
use crate::session::Session;
use crate::validate;

const CHILD_KIND: &str = "child port list";

impl Session {
    pub async fn list_port_lists(&self, network_domain_id: &str) -> Result<Vec<PortList>, CoreError> {
        Ok(self.client().list_port_lists(network_domain_id).await?)
    }

    pub async fn get_port_list(&self, id: &str) -> Result<PortList, CoreError> {
        required(self.client().get_port_list(id).await, PortList::KIND, id)
    }

    pub async fn find_port_list(
        &self,
        network_domain_id: &str,
        name: &str,
    ) -> Result<Option<PortList>, CoreError> {
        let lists = self.client().list_port_lists(network_domain_id).await?;
        select_by_name(lists, name, self.name_policy())
    }

    pub async fn require_port_list(
        &self,
        network_domain_id: &str,
        name: &str,
    ) -> Result<PortList, CoreError> {
        require(self.find_port_list(network_domain_id, name).await?, name)
    }

    /// Create a port list unless one with the same name exists. Every child
    /// list is fetched by id before submission.
    pub async fn create_port_list(
        &self,
        req: &CreatePortList,
    ) -> Result<Applied<PortList>, CoreError> {
        validate::name(PortList::KIND, &req.name)?;
        if req.ports.is_empty() && req.children.is_empty() {
            return Err(CoreError::validation(
                "a port list needs at least one port or child port list",
            ));
        }
        check_ports(&req.ports)?;

        if let Some(existing) = self.find_port_list(&req.network_domain_id, &req.name).await? {
            debug!(name = %req.name, id = %existing.id, "port list already exists");
            return Ok(Applied::unchanged(existing));
        }

        let children = self.resolve_port_list_children(None, &req.children).await?;
        let body = CreatePortListBody {
            network_domain_id: req.network_domain_id.clone(),
            name: req.name.clone(),
            description: req.description.clone(),
            port: req.ports.clone(),
            child_port_list_id: children,
        };
        let resp = self.client().create_port_list(&body).await?;
        let id = resp.created_id()?;
        info!(name = %req.name, id = %id, "port list created");

        let list = self.get_port_list(&id).await?;
        Ok(Applied::submitted(&resp, list))
    }

    /// The provider always wants the port set on edit, so unchanged ports
    /// are resent as they are.
    pub async fn update_port_list(
        &self,
        id: &str,
        req: &UpdatePortList,
    ) -> Result<Applied<PortList>, CoreError> {
        let current = self.get_port_list(id).await?;
        if req.description.is_none() && req.ports.is_none() && req.children.is_none() {
            return Ok(Applied::unchanged(current));
        }

        let port = match &req.ports {
            Some(ListChange::Replace(ports)) => {
                check_ports(ports)?;
                ListUpdate::Replace(ports.clone())
            }
            Some(ListChange::Clear) => ListUpdate::Clear,
            None => ListUpdate::Replace(current.port.clone()),
        };
        let child_port_list_id = match &req.children {
            Some(ListChange::Replace(ids)) => Some(ListUpdate::Replace(
                self.resolve_port_list_children(Some(id), ids).await?,
            )),
            Some(ListChange::Clear) => Some(ListUpdate::Clear),
            None => None,
        };

        let edit = EditPortList {
            id: id.to_owned(),
            description: req.description.clone(),
            port,
            child_port_list_id,
        };
        let resp = self.client().edit_port_list(&edit).await?;
        info!(id, name = %current.name, "port list updated");

        let list = self.get_port_list(id).await?;
        Ok(Applied::submitted(&resp, list))
    }

    pub async fn delete_port_list(&self, id: &str) -> Result<Applied<Option<PortList>>, CoreError> {
        let Some(current) = optional(self.client().get_port_list(id).await)? else {
            debug!(id, "port list already absent");
            return Ok(Applied::unchanged(None));
        };
        let resp = self.client().delete_port_list(id).await?;
        info!(id, name = %current.name, "port list deleted");
        Ok(Applied::submitted(&resp, Some(current)))
    }

    async fn resolve_port_list_children(
        &self,
        editing: Option<&str>,
        children: &[String],
    ) -> Result<Vec<String>, CoreError> {
        resolve_child_lists(CHILD_KIND, editing, children, move |id: String| async move {
            self.get_port_list(&id).await
        })
        .await
    }
}

fn check_ports(ports: &[PortRange]) -> Result<(), CoreError> {
    for range in ports {
        validate::port_range(range.begin, range.end)?;
    }
    Ok(())
}
