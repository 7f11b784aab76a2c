// ── Core error types ──
//
// User-facing errors from cloudcontrol-core. Callers match on a closed set
// of outcomes instead of HTTP status codes or JSON parse failures. The
// `From<cloudcontrol_api::Error>` impl folds transport-layer errors into
// `Transport` or `ProviderRejected`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Provider interaction ─────────────────────────────────────────
    /// No response, a non-200 status, or a body that could not be used.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        /// HTTP status code, when the provider answered at all.
        status: Option<u16>,
    },

    /// A 200 envelope with a non-OK `responseCode` or an `error` field.
    #[error("{operation} rejected by the provider ({response_code}): {message}")]
    ProviderRejected {
        operation: String,
        response_code: String,
        message: String,
    },

    /// The identity lookup failed; nothing else can run without it.
    #[error("Could not start a session for '{user}': {reason}")]
    SessionBootstrap { user: String, reason: String },

    // ── Caller input ─────────────────────────────────────────────────
    /// Inconsistent or malformed parameters, raised before any request.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Lookup ───────────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    /// More than one entity carries the requested name.
    #[error("{count} {entity_type} entries are named '{name}'")]
    AmbiguousReference {
        entity_type: String,
        name: String,
        count: usize,
    },

    /// A referenced child (IP list, port list, ...) could not be resolved.
    #[error("Could not resolve {kind} '{reference}': {source}")]
    ReferenceResolution {
        kind: String,
        reference: String,
        #[source]
        source: Box<CoreError>,
    },

    // ── Convergence ──────────────────────────────────────────────────
    #[error(
        "Timed out after {waited_secs}s waiting for {entity_type} {identifier} (last state: {last_state})"
    )]
    ConvergenceTimeout {
        entity_type: String,
        identifier: String,
        waited_secs: u64,
        last_state: String,
    },

    /// A failure state was observed while the fail-fast policy was active.
    #[error("{entity_type} {identifier} entered failure state {state}")]
    ConvergenceFailed {
        entity_type: String,
        identifier: String,
        state: String,
    },

    #[error("Operation cancelled")]
    Cancelled,

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity_type: &str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Wrap a child-resolution failure with the reference kind that failed.
    pub(crate) fn reference(self, kind: &str, reference: &str) -> Self {
        Self::ReferenceResolution {
            kind: kind.into(),
            reference: reference.into(),
            source: Box::new(self),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<cloudcontrol_api::Error> for CoreError {
    fn from(err: cloudcontrol_api::Error) -> Self {
        match err {
            cloudcontrol_api::Error::Transport(ref e) => CoreError::Transport {
                message: format!("No response from the API: {e}"),
                status: e.status().map(|s| s.as_u16()),
            },
            cloudcontrol_api::Error::Http {
                status, message, ..
            } => CoreError::Transport {
                message,
                status: Some(status),
            },
            cloudcontrol_api::Error::Deserialization { message, body: _ } => {
                CoreError::Transport {
                    message,
                    status: None,
                }
            }
            cloudcontrol_api::Error::UnexpectedResponse { message } => CoreError::Transport {
                message,
                status: None,
            },
            cloudcontrol_api::Error::Rejected {
                operation,
                response_code,
                message,
            } => CoreError::ProviderRejected {
                operation,
                response_code,
                message,
            },
            cloudcontrol_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            cloudcontrol_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            cloudcontrol_api::Error::UnknownRegion(key) => CoreError::Validation {
                message: format!("unknown region '{key}'"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_keeps_status() {
        let err: CoreError = cloudcontrol_api::Error::Http {
            status: 500,
            message: "boom".into(),
            response_code: None,
        }
        .into();
        assert!(matches!(err, CoreError::Transport { status: Some(500), .. }));
    }

    #[test]
    fn rejected_envelope_is_provider_rejected() {
        let err: CoreError = cloudcontrol_api::Error::Rejected {
            operation: "DEPLOY_VLAN".into(),
            response_code: "NAME_NOT_UNIQUE".into(),
            message: "VLAN name must be unique".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "DEPLOY_VLAN rejected by the provider (NAME_NOT_UNIQUE): VLAN name must be unique"
        );
    }

    #[test]
    fn reference_failure_names_the_kind() {
        let err = CoreError::not_found("port list", "pl-9").reference("child port list", "pl-9");
        assert_eq!(
            err.to_string(),
            "Could not resolve child port list 'pl-9': port list not found: pl-9"
        );
    }
}
