//! VLAN command handlers.

use tabled::Tabled;

use cloudcontrol_core::{CreateVlan, Session, UpdateVlan, Vlan, VlanFilter, VlanMode};

use crate::cli::{VlanArgs, VlanCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VlanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IPv4 Range")]
    ipv4: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Attached")]
    attached: String,
    #[tabled(rename = "State")]
    state: String,
}

fn range(v: &Vlan) -> String {
    v.private_ipv4_range.as_ref().map_or_else(
        || "-".into(),
        |r| match r.prefix_size {
            Some(prefix) => format!("{}/{prefix}", r.address),
            None => r.address.clone(),
        },
    )
}

impl VlanRow {
    fn new(v: &Vlan) -> Self {
        Self {
            id: v.id.clone(),
            name: v.name.clone(),
            ipv4: range(v),
            gateway: output::or_dash(v.ipv4_gateway_address.as_deref()),
            attached: output::yes_no(!v.is_detached()),
            state: util::state(&v.state),
        }
    }
}

fn detail(v: &Vlan) -> String {
    let ipv6 = v
        .ipv6_range
        .as_ref()
        .map(|r| match r.prefix_size {
            Some(prefix) => format!("{}/{prefix}", r.address),
            None => r.address.clone(),
        })
        .unwrap_or_else(|| "-".into());
    output::detail(&[
        ("ID", v.id.clone()),
        ("Name", v.name.clone()),
        ("Description", output::or_dash(v.description.as_deref())),
        ("Network Domain", output::or_dash(v.network_domain_id())),
        ("IPv4 Range", range(v)),
        ("IPv4 Gateway", output::or_dash(v.ipv4_gateway_address.as_deref())),
        ("IPv6 Range", ipv6),
        ("IPv6 Gateway", output::or_dash(v.ipv6_gateway_address.as_deref())),
        ("Attached", output::yes_no(!v.is_detached())),
        ("Addressing", output::or_dash(v.gateway_addressing.as_deref())),
        ("State", util::state(&v.state)),
    ])
}

fn show(ctx: &Ctx, vlan: &Vlan) -> Result<(), CliError> {
    let out = output::render_single(ctx.output, vlan, detail, |v| v.id.clone())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: VlanArgs, ctx: &Ctx) -> Result<(), CliError> {
    match args.command {
        VlanCommand::List {
            domain,
            name,
            attached,
        } => {
            let filter = VlanFilter {
                network_domain_id: Some(util::domain_id(session, &domain).await?),
                name,
                attached,
                ..VlanFilter::default()
            };
            let vlans = session.list_vlans(&filter).await?;
            let out = output::render_list(ctx.output, &vlans, VlanRow::new, |v| v.id.clone())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        VlanCommand::Get {
            vlan,
            network_domain,
            datacenter,
        } => {
            let found = match network_domain {
                Some(domain) => {
                    let nd = util::resolve_domain(session, &domain, datacenter.as_deref()).await?;
                    session.require_vlan(&nd, &vlan).await?
                }
                None => session.get_vlan(&vlan).await?,
            };
            show(ctx, &found)
        }

        VlanCommand::Create {
            domain,
            name,
            description,
            network,
            prefix,
            gateway_addressing,
            detached_gateway,
            wait,
        } => {
            let req = CreateVlan {
                network_domain_id: util::domain_id(session, &domain).await?,
                name,
                description,
                private_ipv4_network: network,
                private_ipv4_prefix_size: prefix,
                mode: VlanMode::from_parts(gateway_addressing, detached_gateway)?,
            };
            let policy = wait.policy(ctx.waits.general);
            let applied = util::waiting(
                policy.as_ref(),
                "VLAN",
                ctx.quiet,
                session.create_vlan(&req, policy.as_ref()),
            )
            .await?;
            output::report(&applied, &format!("VLAN {}", req.name), "created", ctx.quiet);
            show(ctx, &applied.resource)
        }

        VlanCommand::Update {
            vlan,
            name,
            description,
            ipv4_gateway,
            ipv6_gateway,
            wait,
        } => {
            let req = UpdateVlan {
                name,
                description,
                ipv4_gateway,
                ipv6_gateway,
            };
            let policy = wait.policy(ctx.waits.general);
            let applied = util::waiting(
                policy.as_ref(),
                "VLAN",
                ctx.quiet,
                session.update_vlan(&vlan, &req, policy.as_ref()),
            )
            .await?;
            output::report(&applied, &format!("VLAN {vlan}"), "updated", ctx.quiet);
            show(ctx, &applied.resource)
        }

        VlanCommand::Delete { vlan, wait } => {
            if !util::confirm(&format!("Delete VLAN {vlan}?"), ctx.yes)? {
                return Ok(());
            }
            let policy = wait.policy(ctx.waits.general);
            let applied = util::waiting(
                policy.as_ref(),
                "VLAN",
                ctx.quiet,
                session.delete_vlan(&vlan, policy.as_ref()),
            )
            .await?;
            output::report(&applied, &format!("VLAN {vlan}"), "deleted", ctx.quiet);
            Ok(())
        }
    }
}
