// ── Resource operations ──
//
// One `impl Session` block per resource kind. Every operation performs a
// single intent: validate, resolve references, submit, and optionally
// block in the poll engine. Nothing here retries a mutation.

mod firewall;
mod infrastructure;
mod ip_list;
mod ipam;
mod nat;
mod network_domain;
mod port_list;
mod server;
mod vlan;

pub use server::Deployed;

use cloudcontrol_api::caas::models::ApiResponse;

use crate::error::CoreError;

/// Outcome of a mutating operation.
#[derive(Debug, Clone)]
pub struct Applied<T> {
    /// `false` when the resource already matched and nothing was sent.
    pub changed: bool,
    /// Provider tracking id of the submitted request.
    pub request_id: Option<String>,
    pub resource: T,
}

impl<T> Applied<T> {
    pub(crate) fn unchanged(resource: T) -> Self {
        Self {
            changed: false,
            request_id: None,
            resource,
        }
    }

    pub(crate) fn submitted(response: &ApiResponse, resource: T) -> Self {
        Self {
            changed: true,
            request_id: response.request_id.clone(),
            resource,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Applied<U> {
        Applied {
            changed: self.changed,
            request_id: self.request_id,
            resource: f(self.resource),
        }
    }
}

/// A get-by-id whose "not found" answer means absence, not failure.
pub(crate) fn optional<T>(result: Result<T, cloudcontrol_api::Error>) -> Result<Option<T>, CoreError> {
    match result {
        Ok(found) => Ok(Some(found)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// A get-by-id that must find its entity.
pub(crate) fn required<T>(
    result: Result<T, cloudcontrol_api::Error>,
    entity_type: &str,
    id: &str,
) -> Result<T, CoreError> {
    optional(result)?.ok_or_else(|| CoreError::not_found(entity_type, id))
}

/// Set `field` to `wanted` when it differs from `current`.
pub(crate) fn differs<T: PartialEq>(wanted: Option<T>, current: Option<&T>) -> Option<T> {
    wanted.filter(|w| current != Some(w))
}
