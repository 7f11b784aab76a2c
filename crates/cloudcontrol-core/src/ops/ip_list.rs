// IP address list operations.
//
// Entries are checked against the list's IP version before submission.

use tracing::{debug, info};

use cloudcontrol_api::caas::models::{IpAddressList, IpRange, IpVersion};
use cloudcontrol_api::caas::requests::{
    CreateIpAddressList, EditIpAddressList, ListUpdate,
};

use super::{Applied, optional, required};
use crate::error::CoreError;
use crate::lookup::{Named, require, resolve_child_lists, select_by_name};
use crate::requests::{CreateIpList, ListChange, UpdateIpList};
use crate::session::Session;
use crate::validate;

const CHILD_KIND: &str = "child IP address list";

impl Session {
    pub async fn list_ip_address_lists(
        &self,
        network_domain_id: &str,
    ) -> Result<Vec<IpAddressList>, CoreError> {
        Ok(self.client().list_ip_address_lists(network_domain_id).await?)
    }

    pub async fn get_ip_address_list(&self, id: &str) -> Result<IpAddressList, CoreError> {
        required(
            self.client().get_ip_address_list(id).await,
            IpAddressList::KIND,
            id,
        )
    }

    pub async fn find_ip_address_list(
        &self,
        network_domain_id: &str,
        name: &str,
    ) -> Result<Option<IpAddressList>, CoreError> {
        let lists = self.client().list_ip_address_lists(network_domain_id).await?;
        select_by_name(lists, name, self.name_policy())
    }

    pub async fn require_ip_address_list(
        &self,
        network_domain_id: &str,
        name: &str,
    ) -> Result<IpAddressList, CoreError> {
        require(self.find_ip_address_list(network_domain_id, name).await?, name)
    }

    /// Create an IP address list unless one with the same name exists.
    pub async fn create_ip_address_list(
        &self,
        req: &CreateIpList,
    ) -> Result<Applied<IpAddressList>, CoreError> {
        validate::name(IpAddressList::KIND, &req.name)?;
        if req.entries.is_empty() && req.children.is_empty() {
            return Err(CoreError::validation(
                "an IP address list needs at least one address or child list",
            ));
        }
        check_entries(req.version, &req.entries)?;

        if let Some(existing) = self
            .find_ip_address_list(&req.network_domain_id, &req.name)
            .await?
        {
            debug!(name = %req.name, id = %existing.id, "IP address list already exists");
            return Ok(Applied::unchanged(existing));
        }

        let children = self.resolve_ip_list_children(None, &req.children).await?;
        let body = CreateIpAddressList {
            network_domain_id: req.network_domain_id.clone(),
            name: req.name.clone(),
            description: req.description.clone(),
            ip_version: req.version,
            ip_address: req.entries.clone(),
            child_ip_address_list_id: children,
        };
        let resp = self.client().create_ip_address_list(&body).await?;
        let id = resp.created_id()?;
        info!(name = %req.name, id = %id, version = %req.version, "IP address list created");

        let list = self.get_ip_address_list(&id).await?;
        Ok(Applied::submitted(&resp, list))
    }

    /// Entries are always resent; unchanged entries go back as they are.
    pub async fn update_ip_address_list(
        &self,
        id: &str,
        req: &UpdateIpList,
    ) -> Result<Applied<IpAddressList>, CoreError> {
        let current = self.get_ip_address_list(id).await?;
        if req.description.is_none() && req.entries.is_none() && req.children.is_none() {
            return Ok(Applied::unchanged(current));
        }

        let version = current
            .ip_version
            .as_deref()
            .and_then(|v| v.parse::<IpVersion>().ok())
            .unwrap_or_default();
        let ip_address = match &req.entries {
            Some(ListChange::Replace(entries)) => {
                check_entries(version, entries)?;
                ListUpdate::Replace(entries.clone())
            }
            Some(ListChange::Clear) => ListUpdate::Clear,
            None => ListUpdate::Replace(current.ip_address.clone()),
        };
        let child_ip_address_list_id = match &req.children {
            Some(ListChange::Replace(ids)) => Some(ListUpdate::Replace(
                self.resolve_ip_list_children(Some(id), ids).await?,
            )),
            Some(ListChange::Clear) => Some(ListUpdate::Clear),
            None => None,
        };

        let edit = EditIpAddressList {
            id: id.to_owned(),
            description: req.description.clone(),
            ip_address,
            child_ip_address_list_id,
        };
        let resp = self.client().edit_ip_address_list(&edit).await?;
        info!(id, name = %current.name, "IP address list updated");

        let list = self.get_ip_address_list(id).await?;
        Ok(Applied::submitted(&resp, list))
    }

    pub async fn delete_ip_address_list(
        &self,
        id: &str,
    ) -> Result<Applied<Option<IpAddressList>>, CoreError> {
        let Some(current) = optional(self.client().get_ip_address_list(id).await)? else {
            debug!(id, "IP address list already absent");
            return Ok(Applied::unchanged(None));
        };
        let resp = self.client().delete_ip_address_list(id).await?;
        info!(id, name = %current.name, "IP address list deleted");
        Ok(Applied::submitted(&resp, Some(current)))
    }

    async fn resolve_ip_list_children(
        &self,
        editing: Option<&str>,
        children: &[String],
    ) -> Result<Vec<String>, CoreError> {
        resolve_child_lists(CHILD_KIND, editing, children, move |id: String| async move {
            self.get_ip_address_list(&id).await
        })
        .await
    }
}

fn check_entries(version: IpVersion, entries: &[IpRange]) -> Result<(), CoreError> {
    for entry in entries {
        validate::ip_range(version, &entry.begin, entry.end.as_deref(), entry.prefix_size)?;
    }
    Ok(())
}
