//! Firewall rule command handlers.

use tabled::Tabled;

use cloudcontrol_core::{
    CreateFirewallRule, EndpointSpec, FirewallRule, FirewallRuleEndpoint, PortSpec, Session,
    UpdateFirewallRule,
};

use crate::cli::{FirewallArgs, FirewallCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "State")]
    state: String,
}

/// `10.0.0.0/24:443`, `list:web-servers:any`, ...
fn endpoint(e: Option<&FirewallRuleEndpoint>) -> String {
    let Some(e) = e else {
        return "-".into();
    };
    let address = match (&e.ip, &e.ip_address_list) {
        (Some(ip), _) => match ip.prefix_size {
            Some(prefix) => format!("{}/{prefix}", ip.address),
            None => ip.address.clone(),
        },
        (None, Some(list)) => format!("list:{}", list.name.as_deref().unwrap_or(&list.id)),
        (None, None) => "ANY".into(),
    };
    let port = match (&e.port, &e.port_list) {
        (Some(range), _) => match range.end {
            Some(end) => format!("{}-{end}", range.begin),
            None => range.begin.to_string(),
        },
        (None, Some(list)) => format!("list:{}", list.name.as_deref().unwrap_or(&list.id)),
        (None, None) => "ANY".into(),
    };
    format!("{address}:{port}")
}

impl RuleRow {
    fn new(r: &FirewallRule) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            action: output::or_dash(r.action.as_deref()),
            protocol: output::or_dash(r.protocol.as_deref()),
            source: endpoint(r.source.as_ref()),
            destination: endpoint(r.destination.as_ref()),
            enabled: output::yes_no(r.enabled),
            state: util::state(&r.state),
        }
    }
}

fn detail(r: &FirewallRule) -> String {
    output::detail(&[
        ("ID", r.id.clone()),
        ("Name", r.name.clone()),
        ("Network Domain", output::or_dash(r.network_domain_id.as_deref())),
        ("Action", output::or_dash(r.action.as_deref())),
        ("IP Version", output::or_dash(r.ip_version.as_deref())),
        ("Protocol", output::or_dash(r.protocol.as_deref())),
        ("Source", endpoint(r.source.as_ref())),
        ("Destination", endpoint(r.destination.as_ref())),
        ("Enabled", output::yes_no(r.enabled)),
        ("Rule Type", output::or_dash(r.rule_type.as_deref())),
        ("State", util::state(&r.state)),
    ])
}

fn show(ctx: &Ctx, rule: &FirewallRule) -> Result<(), CliError> {
    let out = output::render_single(ctx.output, rule, detail, |r| r.id.clone())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

/// An endpoint only when some part of it was given on the command line.
fn changed_endpoint(
    side: &str,
    ip: Option<String>,
    prefix: Option<u8>,
    ip_list: Option<String>,
    port: Option<PortSpec>,
    port_list: Option<String>,
) -> Result<Option<EndpointSpec>, CliError> {
    if ip.is_none() && prefix.is_none() && ip_list.is_none() && port.is_none() && port_list.is_none()
    {
        return Ok(None);
    }
    Ok(Some(EndpointSpec::from_parts(
        side, ip, prefix, ip_list, port, port_list,
    )?))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: FirewallArgs, ctx: &Ctx) -> Result<(), CliError> {
    match args.command {
        FirewallCommand::List { domain } => {
            let nd = util::domain_id(session, &domain).await?;
            let rules = session.list_firewall_rules(&nd).await?;
            let out = output::render_list(ctx.output, &rules, RuleRow::new, |r| r.id.clone())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        FirewallCommand::Get { rule } => {
            let found = session.get_firewall_rule(&rule).await?;
            show(ctx, &found)
        }

        FirewallCommand::Create {
            domain,
            name,
            action,
            ip_version,
            protocol,
            source,
            destination,
            disabled,
            position,
            relative_to,
        } => {
            let src = EndpointSpec::from_parts(
                "source",
                source.src_ip,
                source.src_prefix,
                source.src_ip_list,
                source.src_port,
                source.src_port_list,
            )?;
            let dst = EndpointSpec::from_parts(
                "destination",
                destination.dst_ip,
                destination.dst_prefix,
                destination.dst_ip_list,
                destination.dst_port,
                destination.dst_port_list,
            )?;
            let nd = util::domain_id(session, &domain).await?;
            let mut req = CreateFirewallRule::new(nd, name, src, dst);
            req.action = action;
            req.ip_version = ip_version;
            req.protocol = protocol;
            req.enabled = !disabled;
            req.position = position;
            req.relative_to = relative_to;

            let applied = session.create_firewall_rule(&req).await?;
            output::report(
                &applied,
                &format!("Firewall rule {}", req.name),
                "created",
                ctx.quiet,
            );
            show(ctx, &applied.resource)
        }

        FirewallCommand::Update {
            rule,
            action,
            protocol,
            source,
            destination,
            enabled,
            position,
            relative_to,
        } => {
            let req = UpdateFirewallRule {
                action,
                protocol,
                source: changed_endpoint(
                    "source",
                    source.src_ip,
                    source.src_prefix,
                    source.src_ip_list,
                    source.src_port,
                    source.src_port_list,
                )?,
                destination: changed_endpoint(
                    "destination",
                    destination.dst_ip,
                    destination.dst_prefix,
                    destination.dst_ip_list,
                    destination.dst_port,
                    destination.dst_port_list,
                )?,
                enabled,
                position,
                relative_to,
            };
            let applied = session.update_firewall_rule(&rule, &req).await?;
            output::report(&applied, &format!("Firewall rule {rule}"), "updated", ctx.quiet);
            show(ctx, &applied.resource)
        }

        FirewallCommand::Delete { rule } => {
            if !util::confirm(&format!("Delete firewall rule {rule}?"), ctx.yes)? {
                return Ok(());
            }
            let applied = session.delete_firewall_rule(&rule).await?;
            output::report(&applied, &format!("Firewall rule {rule}"), "deleted", ctx.quiet);
            Ok(())
        }
    }
}
