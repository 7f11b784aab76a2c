//! Command dispatch: bridges CLI args -> session operations -> output formatting.

pub mod firewall;
pub mod infra;
pub mod ip_list;
pub mod ipam;
pub mod nat;
pub mod network_domain;
pub mod port_list;
pub mod regions;
pub mod server;
pub mod util;
pub mod vlan;

use cloudcontrol_core::Session;

use crate::cli::{Command, OutputFormat};
use crate::config::WaitDefaults;
use crate::error::CliError;

/// Per-invocation settings every handler needs.
#[derive(Debug, Clone, Copy)]
pub struct Ctx {
    pub output: OutputFormat,
    pub quiet: bool,
    pub yes: bool,
    pub waits: WaitDefaults,
}

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, ctx: &Ctx) -> Result<(), CliError> {
    match cmd {
        Command::NetworkDomain(args) => network_domain::handle(session, args, ctx).await,
        Command::Vlan(args) => vlan::handle(session, args, ctx).await,
        Command::Server(args) => server::handle(session, args, ctx).await,
        Command::Firewall(args) => firewall::handle(session, args, ctx).await,
        Command::Nat(args) => nat::handle(session, args, ctx).await,
        Command::PortList(args) => port_list::handle(session, args, ctx).await,
        Command::IpList(args) => ip_list::handle(session, args, ctx).await,
        Command::Ipam(args) => ipam::handle(session, args, ctx).await,
        Command::Infra(args) => infra::handle(session, args, ctx).await,
        // Regions and Completions are handled before a session exists
        Command::Regions | Command::Completions(_) => Ok(()),
    }
}
