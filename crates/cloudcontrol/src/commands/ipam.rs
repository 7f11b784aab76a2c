//! Public IP block and private reservation handlers.

use std::net::IpAddr;

use tabled::Tabled;

use cloudcontrol_core::{
    IpVersion, PublicIpBlock, ReservationScope, ReserveIp, ReservedIp, Session,
};

use crate::cli::{IpamArgs, IpamCommand, PublicBlocksCommand, ReservationsCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct BlockRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Base IP")]
    base_ip: String,
    #[tabled(rename = "Size")]
    size: u32,
    #[tabled(rename = "State")]
    state: String,
}

impl BlockRow {
    fn new(b: &PublicIpBlock) -> Self {
        Self {
            id: b.id.clone(),
            base_ip: b.base_ip.clone(),
            size: b.size,
            state: util::state(&b.state),
        }
    }
}

fn block_detail(b: &PublicIpBlock) -> String {
    output::detail(&[
        ("ID", b.id.clone()),
        ("Network Domain", output::or_dash(b.network_domain_id.as_deref())),
        ("Base IP", b.base_ip.clone()),
        ("Size", b.size.to_string()),
        ("Created", output::or_dash(b.create_time.as_deref())),
        ("State", util::state(&b.state)),
    ])
}

fn show_block(ctx: &Ctx, block: &PublicIpBlock) -> Result<(), CliError> {
    let out = output::render_single(ctx.output, block, block_detail, |b| b.id.clone())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[derive(Tabled)]
struct ReservedRow {
    #[tabled(rename = "IP Address")]
    ip_address: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Datacenter")]
    datacenter: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl ReservedRow {
    fn new(r: &ReservedIp) -> Self {
        Self {
            ip_address: r.ip_address.clone(),
            vlan: output::or_dash(r.vlan_id.as_deref()),
            datacenter: output::or_dash(r.datacenter_id.as_deref()),
            description: output::or_dash(r.description.as_deref()),
        }
    }
}

/// Address family of a reservation target.
fn version_of(raw: &str) -> Result<IpVersion, CliError> {
    match raw.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => Ok(IpVersion::Ipv4),
        Ok(IpAddr::V6(_)) => Ok(IpVersion::Ipv6),
        Err(_) => Err(CliError::validation(
            "ip",
            format!("'{raw}' is not an IP address"),
        )),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: IpamArgs, ctx: &Ctx) -> Result<(), CliError> {
    match args.command {
        IpamCommand::PublicBlocks(blocks) => match blocks.command {
            PublicBlocksCommand::List { domain } => {
                let nd = util::domain_id(session, &domain).await?;
                let found = session.list_public_ip_blocks(&nd).await?;
                let out =
                    output::render_list(ctx.output, &found, BlockRow::new, |b| b.id.clone())?;
                output::print_output(&out, ctx.quiet);
                Ok(())
            }

            PublicBlocksCommand::Get { block } => {
                let found = session.get_public_ip_block(&block).await?;
                show_block(ctx, &found)
            }

            PublicBlocksCommand::Add { domain } => {
                let nd = util::domain_id(session, &domain).await?;
                let applied = session.add_public_ip_block(&nd).await?;
                output::report(
                    &applied,
                    &format!("Public IP block {}", applied.resource.base_ip),
                    "added",
                    ctx.quiet,
                );
                show_block(ctx, &applied.resource)
            }

            PublicBlocksCommand::Remove { block } => {
                if !util::confirm(&format!("Remove public IP block {block}?"), ctx.yes)? {
                    return Ok(());
                }
                let applied = session.remove_public_ip_block(&block).await?;
                output::report(
                    &applied,
                    &format!("Public IP block {block}"),
                    "removed",
                    ctx.quiet,
                );
                Ok(())
            }
        },

        IpamCommand::Reservations(reservations) => match reservations.command {
            ReservationsCommand::List {
                vlan,
                datacenter,
                version,
            } => {
                let scope = match (vlan, datacenter) {
                    (Some(vlan), _) => ReservationScope::Vlan(vlan),
                    (None, Some(dc)) => ReservationScope::Datacenter(dc),
                    (None, None) => {
                        return Err(CliError::validation(
                            "scope",
                            "give --vlan or --datacenter",
                        ));
                    }
                };
                let found = session.list_reserved_ips(&scope, version).await?;
                let out = output::render_list(ctx.output, &found, ReservedRow::new, |r| {
                    r.ip_address.clone()
                })?;
                output::print_output(&out, ctx.quiet);
                Ok(())
            }

            ReservationsCommand::Reserve {
                vlan,
                ip,
                description,
            } => {
                let req = ReserveIp {
                    version: version_of(&ip)?,
                    vlan_id: vlan,
                    ip_address: ip,
                    description,
                };
                let applied = session.reserve_ip(&req).await?;
                output::report(
                    &applied,
                    &format!("Address {} on VLAN {}", applied.resource, req.vlan_id),
                    "reserved",
                    ctx.quiet,
                );
                output::print_output(&applied.resource, ctx.quiet);
                Ok(())
            }

            ReservationsCommand::Unreserve { vlan, ip } => {
                let version = version_of(&ip)?;
                let applied = session.unreserve_ip(&vlan, &ip, version).await?;
                output::report(
                    &applied,
                    &format!("Address {ip} on VLAN {vlan}"),
                    "unreserved",
                    ctx.quiet,
                );
                Ok(())
            }
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn family_follows_the_address() {
        assert_eq!(version_of("10.0.0.10").unwrap(), IpVersion::Ipv4);
        assert_eq!(version_of("2001:db8::10").unwrap(), IpVersion::Ipv6);
        assert!(version_of("10.0.0.0/24").is_err());
    }
}
