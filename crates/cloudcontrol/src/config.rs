//! CLI configuration: thin wrapper around `cloudcontrol_config` shared types.
//!
//! Adds the resolution steps that respect `GlobalOpts` flag overrides
//! (--profile, --region, --insecure, --timeout, --output).

use std::time::Duration;

use clap::ValueEnum;

use cloudcontrol_config::{Config, Defaults};
use cloudcontrol_core::{Region, SessionConfig, TlsVerification, WaitPolicy};

use crate::cli::{GlobalOpts, OutputFormat, WaitArgs};
use crate::error::CliError;

pub use cloudcontrol_config::{config_path, load_config_or_default};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `SessionConfig` for this invocation.
///
/// A profile named with `--profile` must exist; the implicit default
/// profile may be absent when credentials come from the environment or
/// `~/.nttcis`. CLI flags take priority over profile values.
pub fn resolve_session_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<SessionConfig, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = config.profiles.get(&profile_name);
    if profile.is_none() && global.profile.is_some() {
        let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
            path: config_path().display().to_string(),
        });
    }

    let credentials = cloudcontrol_config::resolve_credentials(profile, &profile_name)?;
    let mut session =
        cloudcontrol_config::profile_to_session_config(profile, &profile_name, &config.defaults, credentials)?;

    if let Some(region) = &global.region {
        if Region::find(region).is_none() {
            return Err(CliError::validation(
                "region",
                format!(
                    "unknown region '{region}' (run `cloudcontrol regions` for the list)"
                ),
            ));
        }
        session.region.clone_from(region);
    }
    if global.insecure {
        session.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        session.timeout = Duration::from_secs(secs);
    }
    Ok(session)
}

/// `--output`, else the configured default, else table.
pub fn output_format(global: &GlobalOpts, defaults: &Defaults) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

// ── Wait policies ───────────────────────────────────────────────────

/// Configured wait budgets, before per-command flags.
#[derive(Debug, Clone, Copy)]
pub struct WaitDefaults {
    pub general: WaitPolicy,
    pub server: WaitPolicy,
}

impl WaitDefaults {
    pub fn from_config(defaults: &Defaults) -> Self {
        Self {
            general: WaitPolicy::new(
                Duration::from_secs(defaults.wait_time),
                Duration::from_secs(defaults.poll_interval),
            ),
            server: WaitPolicy::server(),
        }
    }
}

impl WaitArgs {
    /// `None` unless `--wait` was given; flags override `base`.
    pub fn policy(&self, base: WaitPolicy) -> Option<WaitPolicy> {
        if !self.wait {
            return None;
        }
        let mut policy = base;
        if let Some(secs) = self.wait_time {
            policy.max_wait = Duration::from_secs(secs);
        }
        if let Some(secs) = self.wait_poll_interval {
            policy.poll_interval = Duration::from_secs(secs);
        }
        if self.fail_fast {
            policy = policy.fail_fast();
        }
        Some(policy)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cloudcontrol_core::FailureStatePolicy;

    use super::*;

    #[test]
    fn no_wait_flag_means_no_policy() {
        assert!(WaitArgs::default().policy(WaitPolicy::default()).is_none());
    }

    #[test]
    fn flags_override_the_base_policy() {
        let args = WaitArgs {
            wait: true,
            wait_time: Some(120),
            wait_poll_interval: None,
            fail_fast: true,
        };
        let policy = args.policy(WaitPolicy::server()).unwrap();
        assert_eq!(policy.max_wait, Duration::from_secs(120));
        assert_eq!(policy.poll_interval, Duration::from_secs(60));
        assert_eq!(policy.on_failure_state, FailureStatePolicy::FailFast);
    }

    #[test]
    fn configured_output_is_the_fallback() {
        let defaults = Defaults {
            output: "yaml".into(),
            ..Defaults::default()
        };
        let global = GlobalOpts {
            profile: None,
            region: None,
            output: None,
            verbose: 0,
            quiet: false,
            yes: false,
            insecure: false,
            timeout: None,
        };
        assert_eq!(output_format(&global, &defaults), OutputFormat::Yaml);
    }
}
