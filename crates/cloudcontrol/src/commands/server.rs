//! Server command handlers.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tabled::Tabled;

use cloudcontrol_core::{
    CreateServer, NicPlacement, NicRequest, PowerAction, Server, ServerFilter, Session,
    UpdateServer,
};

use crate::cli::{ServerArgs, ServerCommand, ServerCreateArgs, WaitArgs};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IPv4")]
    ipv4: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "RAM (GB)")]
    memory: String,
    #[tabled(rename = "Running")]
    started: String,
    #[tabled(rename = "State")]
    state: String,
}

fn primary_ipv4(s: &Server) -> Option<&str> {
    s.network_info
        .as_ref()
        .and_then(|n| n.primary_nic.as_ref())
        .and_then(|nic| nic.private_ipv4.as_deref())
}

fn cpu_count(s: &Server) -> String {
    s.cpu
        .as_ref()
        .and_then(|c| c.count)
        .map_or_else(|| "-".into(), |c| c.to_string())
}

impl ServerRow {
    fn new(s: &Server) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            ipv4: output::or_dash(primary_ipv4(s)),
            cpu: cpu_count(s),
            memory: s.memory_gb.map_or_else(|| "-".into(), |m| m.to_string()),
            started: output::yes_no(s.started),
            state: util::state(&s.state),
        }
    }
}

fn detail(s: &Server) -> String {
    let disks = s
        .disk
        .iter()
        .map(|d| {
            format!(
                "{} ({} GB, {})",
                d.id,
                d.size_gb,
                d.speed.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    output::detail(&[
        ("ID", s.id.clone()),
        ("Name", s.name.clone()),
        ("Description", output::or_dash(s.description.as_deref())),
        ("Datacenter", output::or_dash(s.datacenter_id.as_deref())),
        ("Network Domain", output::or_dash(s.network_domain_id())),
        ("Primary IPv4", output::or_dash(primary_ipv4(s))),
        ("Image", output::or_dash(s.source_image_id.as_deref())),
        ("CPU", cpu_count(s)),
        (
            "Memory (GB)",
            s.memory_gb.map_or_else(|| "-".into(), |m| m.to_string()),
        ),
        ("Disks", if disks.is_empty() { "-".into() } else { disks }),
        ("Running", output::yes_no(s.started)),
        ("State", util::state(&s.state)),
    ])
}

fn show(ctx: &Ctx, server: &Server) -> Result<(), CliError> {
    let out = output::render_single(ctx.output, server, detail, |s| s.id.clone())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

/// A deployed server plus the password that was generated for it.
#[derive(Serialize)]
struct DeployedView<'a> {
    #[serde(flatten)]
    server: &'a Server,
    #[serde(skip_serializing_if = "Option::is_none")]
    administrator_password: Option<&'a str>,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: ServerArgs, ctx: &Ctx) -> Result<(), CliError> {
    match args.command {
        ServerCommand::List {
            network_domain,
            datacenter,
            name,
        } => {
            let filter = ServerFilter {
                network_domain_id: network_domain,
                datacenter_id: datacenter,
                name,
                ..ServerFilter::default()
            };
            let servers = session.list_servers(&filter).await?;
            let out =
                output::render_list(ctx.output, &servers, ServerRow::new, |s| s.id.clone())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ServerCommand::Get { server } => {
            let found = session.get_server(&server).await?;
            show(ctx, &found)
        }

        ServerCommand::Create(create) => create_server(session, *create, ctx).await,

        ServerCommand::Update {
            server,
            cpu_count,
            cores_per_socket,
            cpu_speed,
            memory_gb,
            wait,
        } => {
            let req = UpdateServer {
                cpu_count,
                cores_per_socket,
                cpu_speed,
                memory_gb,
            };
            let policy = wait.policy(ctx.waits.server);
            let applied = util::waiting(
                policy.as_ref(),
                "server",
                ctx.quiet,
                session.update_server(&server, &req, policy.as_ref()),
            )
            .await?;
            output::report(&applied, &format!("Server {server}"), "reconfigured", ctx.quiet);
            show(ctx, &applied.resource)
        }

        ServerCommand::ExpandDisk {
            server,
            disk,
            size_gb,
            wait,
        } => {
            let policy = wait.policy(ctx.waits.server);
            let applied = util::waiting(
                policy.as_ref(),
                "disk",
                ctx.quiet,
                session.expand_disk(&server, &disk, size_gb, policy.as_ref()),
            )
            .await?;
            output::report(
                &applied,
                &format!("Disk {disk} on server {server}"),
                "expanded",
                ctx.quiet,
            );
            show(ctx, &applied.resource)
        }

        ServerCommand::Start { server, wait } => {
            power(session, ctx, &server, PowerAction::Start, &wait).await
        }
        ServerCommand::Stop { server, wait } => {
            power(session, ctx, &server, PowerAction::Stop, &wait).await
        }
        ServerCommand::Reboot { server, wait } => {
            power(session, ctx, &server, PowerAction::Reboot, &wait).await
        }

        ServerCommand::Delete { server, wait } => {
            if !util::confirm(&format!("Delete server {server}?"), ctx.yes)? {
                return Ok(());
            }
            let policy = wait.policy(ctx.waits.server);
            let applied = util::waiting(
                policy.as_ref(),
                "server",
                ctx.quiet,
                session.delete_server(&server, policy.as_ref()),
            )
            .await?;
            output::report(&applied, &format!("Server {server}"), "deleted", ctx.quiet);
            Ok(())
        }
    }
}

async fn power(
    session: &Session,
    ctx: &Ctx,
    server: &str,
    action: PowerAction,
    wait: &WaitArgs,
) -> Result<(), CliError> {
    let policy = wait.policy(ctx.waits.server);
    let applied = util::waiting(
        policy.as_ref(),
        "server",
        ctx.quiet,
        session.power(server, action, policy.as_ref()),
    )
    .await?;
    let verb = match action {
        PowerAction::Start => "started",
        PowerAction::Stop => "stopped",
        PowerAction::Reboot => "rebooted",
    };
    output::report(&applied, &format!("Server {server}"), verb, ctx.quiet);
    show(ctx, &applied.resource)
}

/// `VLAN_NAME:ADAPTER`; the adapter is required and checked by the
/// operation layer.
fn additional_nic(raw: &str) -> NicRequest {
    let (vlan, adapter) = match raw.split_once(':') {
        Some((vlan, adapter)) => (vlan, Some(adapter.to_owned())),
        None => (raw, None),
    };
    NicRequest {
        placement: NicPlacement::VlanName(vlan.to_owned()),
        network_adapter: adapter,
    }
}

async fn create_server(
    session: &Session,
    args: ServerCreateArgs,
    ctx: &Ctx,
) -> Result<(), CliError> {
    let network_domain_id = util::domain_id(session, &args.domain).await?;

    let image_id = match (args.image, args.image_name, args.domain.datacenter.as_deref()) {
        (Some(id), _, _) => id,
        (None, Some(name), Some(dc)) => session
            .find_image(dc, &name)
            .await?
            .map(|image| image.id)
            .ok_or_else(|| CliError::NotFound {
                resource_type: "image".into(),
                identifier: name,
                list_command: format!("infra images --datacenter {dc}"),
            })?,
        _ => {
            return Err(CliError::validation(
                "image",
                "give --image, or --image-name with --datacenter",
            ));
        }
    };

    let placement = match (args.vlan, args.vlan_id, args.private_ipv4) {
        (Some(name), _, _) => NicPlacement::VlanName(name),
        (None, Some(id), _) => NicPlacement::VlanId(id),
        (None, None, Some(ip)) => NicPlacement::PrivateIpv4(ip),
        (None, None, None) => {
            return Err(CliError::validation(
                "primary NIC",
                "give --vlan, --vlan-id or --private-ipv4",
            ));
        }
    };

    let generated = args.admin_password.is_none() && !args.no_customize;
    let req = CreateServer {
        name: args.name,
        description: args.description,
        image_id,
        network_domain_id,
        primary_nic: NicRequest {
            placement,
            network_adapter: args.network_adapter,
        },
        additional_nics: args
            .additional_nics
            .iter()
            .map(String::as_str)
            .map(additional_nic)
            .collect(),
        disks: args.disks,
        cpu_count: args.cpu_count,
        cores_per_socket: args.cores_per_socket,
        cpu_speed: args.cpu_speed,
        memory_gb: args.memory_gb,
        primary_dns: args.primary_dns,
        secondary_dns: args.secondary_dns,
        ipv4_gateway: args.ipv4_gateway,
        ipv6_gateway: args.ipv6_gateway,
        start: !args.no_start,
        customize: !args.no_customize,
        administrator_password: args.admin_password.map(SecretString::from),
    };

    let policy = args.wait.policy(ctx.waits.server);
    let applied = util::waiting(
        policy.as_ref(),
        "server",
        ctx.quiet,
        session.create_server(&req, policy.as_ref()),
    )
    .await?;
    output::report(&applied, &format!("Server {}", req.name), "deployed", ctx.quiet);

    let deployed = &applied.resource;
    let password = if generated && applied.changed {
        deployed
            .administrator_password
            .as_ref()
            .map(|p| p.expose_secret())
    } else {
        None
    };
    let view = DeployedView {
        server: &deployed.server,
        administrator_password: password,
    };
    let out = output::render_single(
        ctx.output,
        &view,
        |v| {
            let mut text = detail(v.server);
            if let Some(password) = v.administrator_password {
                text.push_str(&format!("\nAdmin Password: {password}"));
            }
            text
        },
        |v| v.server.id.clone(),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additional_nic_splits_adapter() {
        let nic = additional_nic("backend:VMXNET3");
        assert_eq!(nic.placement, NicPlacement::VlanName("backend".into()));
        assert_eq!(nic.network_adapter.as_deref(), Some("VMXNET3"));

        assert!(additional_nic("backend").network_adapter.is_none());
    }
}
