//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use cloudcontrol_core::validate::{parse_ip_range, parse_port_range};
use cloudcontrol_core::{
    IpRange, IpVersion, ListChange, PortRange, ResourceState, Session, WaitPolicy,
};

use crate::cli::DomainArgs;
use crate::error::CliError;

/// Resolve `--network-domain`: an id as given, or a name looked up in
/// `--datacenter`.
pub async fn resolve_domain(
    session: &Session,
    domain: &str,
    datacenter: Option<&str>,
) -> Result<String, CliError> {
    match datacenter {
        Some(dc) => Ok(session.require_network_domain(dc, domain).await?.id),
        None => Ok(domain.to_owned()),
    }
}

pub async fn domain_id(session: &Session, args: &DomainArgs) -> Result<String, CliError> {
    resolve_domain(session, &args.network_domain, args.datacenter.as_deref()).await
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').to_owned(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

/// Run `op`, showing a spinner on stderr while it polls for a terminal
/// state. No spinner without a wait policy or when stderr is not a tty.
pub async fn waiting<F: Future>(
    policy: Option<&WaitPolicy>,
    what: &str,
    quiet: bool,
    op: F,
) -> F::Output {
    let spinner = (policy.is_some() && !quiet && io::stderr().is_terminal()).then(|| {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
            bar.set_style(style);
        }
        bar.set_message(format!("waiting for {what}"));
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    });
    let out = op.await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    out
}

/// `443`, `8000-8080`
pub fn parse_ports(raw: &[String]) -> Result<Vec<PortRange>, CliError> {
    raw.iter()
        .map(|p| parse_port_range(p).map_err(CliError::from))
        .collect()
}

/// `10.0.0.1`, `10.0.0.1-10.0.0.9`, `10.0.0.0/24`
pub fn parse_entries(version: IpVersion, raw: &[String]) -> Result<Vec<IpRange>, CliError> {
    raw.iter()
        .map(|e| parse_ip_range(version, e).map_err(CliError::from))
        .collect()
}

/// Replace when values were given, clear when asked, otherwise leave alone.
pub fn list_change<T>(values: Vec<T>, clear: bool) -> Option<ListChange<T>> {
    if clear {
        Some(ListChange::Clear)
    } else if values.is_empty() {
        None
    } else {
        Some(ListChange::Replace(values))
    }
}

pub fn state(state: &ResourceState) -> String {
    state.as_str().to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn list_change_prefers_clear() {
        assert_eq!(list_change(vec![1], true), Some(ListChange::Clear));
        assert_eq!(list_change(Vec::<u8>::new(), false), None);
        assert_eq!(
            list_change(vec![80], false),
            Some(ListChange::Replace(vec![80]))
        );
    }

    #[test]
    fn ports_and_entries_parse() {
        let ports = parse_ports(&["443".into(), "8000-8080".into()]).unwrap();
        assert_eq!(ports[1].end, Some(8080));
        assert!(parse_ports(&["90-80".into()]).is_err());

        let entries = parse_entries(IpVersion::Ipv4, &["10.0.0.0/24".into()]).unwrap();
        assert_eq!(entries[0].prefix_size, Some(24));
    }
}
