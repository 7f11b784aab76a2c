//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use cloudcontrol_config::ConfigError;
use cloudcontrol_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const REJECTED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("CloudControl request failed: {message}")]
    #[diagnostic(
        code(cloudcontrol::connection_failed),
        help("Check network access to the region's API host, or try a larger --timeout.")
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Could not start a session for '{user}'")]
    #[diagnostic(
        code(cloudcontrol::session_failed),
        help(
            "The identity lookup failed: {reason}\n\
             Verify the user id and password for this profile."
        )
    )]
    SessionFailed { user: String, reason: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(cloudcontrol::no_credentials),
        help(
            "Set NTTCIS_USER and NTTCIS_PASSWORD, add an [nttcis] section to ~/.nttcis,\n\
             or configure user_id and password_env in the profile."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(cloudcontrol::not_found),
        help("Run: cloudcontrol {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{count} {resource_type} entries are named '{name}'")]
    #[diagnostic(
        code(cloudcontrol::ambiguous),
        help("Refer to the {resource_type} by id instead of by name.")
    )]
    Ambiguous {
        resource_type: String,
        name: String,
        count: usize,
    },

    #[error("Could not resolve {kind} '{reference}'")]
    #[diagnostic(code(cloudcontrol::unresolved_reference), help("{reason}"))]
    Unresolved {
        kind: String,
        reference: String,
        reason: String,
    },

    // ── Provider ─────────────────────────────────────────────────────

    #[error("{operation} rejected ({code}): {message}")]
    #[diagnostic(code(cloudcontrol::rejected))]
    Rejected {
        operation: String,
        code: String,
        message: String,
    },

    #[error("{resource_type} {identifier} entered failure state {state}")]
    #[diagnostic(
        code(cloudcontrol::failed_state),
        help("The provider needs attention on this resource; check it in the CloudControl UI.")
    )]
    FailedState {
        resource_type: String,
        identifier: String,
        state: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cloudcontrol::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(cloudcontrol::profile_not_found),
        help("Available profiles: {available}\nConfig file: {path}")
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(cloudcontrol::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(cloudcontrol::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Timed out after {seconds}s waiting for {resource_type} {identifier}")]
    #[diagnostic(
        code(cloudcontrol::timeout),
        help("Last observed state: {last_state}. Raise --wait-time, or check the resource later.")
    )]
    Timeout {
        resource_type: String,
        identifier: String,
        seconds: u64,
        last_state: String,
    },

    #[error("Operation cancelled")]
    #[diagnostic(code(cloudcontrol::cancelled))]
    Cancelled,

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(cloudcontrol::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(cloudcontrol::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::SessionFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::Unresolved { .. } => exit_code::NOT_FOUND,
            Self::Ambiguous { .. } => exit_code::CONFLICT,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// `network domain` → `network-domain list`
fn list_command(entity_type: &str) -> String {
    let command = match entity_type {
        "IP address list" | "child IP address list" => "ip-list list",
        "port list" | "child port list" => "port-list list",
        "firewall rule" | "relative firewall rule" => "firewall list",
        "NAT rule" => "nat list",
        "public IP block" => "ipam public-blocks list",
        "customer image" | "image" => "infra images --customer",
        other => return format!("{} list", other.replace(' ', "-").to_lowercase()),
    };
    command.to_owned()
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { message, .. } => CliError::ConnectionFailed { message },

            CoreError::ProviderRejected {
                operation,
                response_code,
                message,
            } => CliError::Rejected {
                operation,
                code: response_code,
                message,
            },

            CoreError::SessionBootstrap { user, reason } => CliError::SessionFailed { user, reason },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command(&entity_type),
                resource_type: entity_type,
                identifier,
            },

            CoreError::AmbiguousReference {
                entity_type,
                name,
                count,
            } => CliError::Ambiguous {
                resource_type: entity_type,
                name,
                count,
            },

            CoreError::ReferenceResolution {
                kind,
                reference,
                source,
            } => match *source {
                CoreError::AmbiguousReference {
                    entity_type,
                    name,
                    count,
                } => CliError::Ambiguous {
                    resource_type: entity_type,
                    name,
                    count,
                },
                other => CliError::Unresolved {
                    kind,
                    reference,
                    reason: other.to_string(),
                },
            },

            CoreError::ConvergenceTimeout {
                entity_type,
                identifier,
                waited_secs,
                last_state,
            } => CliError::Timeout {
                resource_type: entity_type,
                identifier,
                seconds: waited_secs,
                last_state,
            },

            CoreError::ConvergenceFailed {
                entity_type,
                identifier,
                state,
            } => CliError::FailedState {
                resource_type: entity_type,
                identifier,
                state,
            },

            CoreError::Cancelled => CliError::Cancelled,

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_table() {
        let cases: Vec<(CoreError, i32)> = vec![
            (
                CoreError::Validation {
                    message: "bad".into(),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::NotFound {
                    entity_type: "VLAN".into(),
                    identifier: "v-1".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::AmbiguousReference {
                    entity_type: "VLAN".into(),
                    name: "web".into(),
                    count: 2,
                },
                exit_code::CONFLICT,
            ),
            (
                CoreError::Transport {
                    message: "no response".into(),
                    status: None,
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::ConvergenceTimeout {
                    entity_type: "server".into(),
                    identifier: "s-1".into(),
                    waited_secs: 600,
                    last_state: "PENDING_ADD".into(),
                },
                exit_code::TIMEOUT,
            ),
            (
                CoreError::ProviderRejected {
                    operation: "DEPLOY_VLAN".into(),
                    response_code: "RESOURCE_BUSY".into(),
                    message: "busy".into(),
                },
                exit_code::REJECTED,
            ),
            (CoreError::Cancelled, exit_code::GENERAL),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn ambiguous_child_reference_is_a_conflict() {
        let err = CoreError::ReferenceResolution {
            kind: "port list".into(),
            reference: "web".into(),
            source: Box::new(CoreError::AmbiguousReference {
                entity_type: "port list".into(),
                name: "web".into(),
                count: 2,
            }),
        };
        assert_eq!(CliError::from(err).exit_code(), exit_code::CONFLICT);
    }

    #[test]
    fn list_commands_point_at_subcommands() {
        assert_eq!(list_command("network domain"), "network-domain list");
        assert_eq!(list_command("VLAN"), "vlan list");
        assert_eq!(list_command("child port list"), "port-list list");
    }
}
