//! NAT rule command handlers.

use tabled::Tabled;

use cloudcontrol_core::{CreateNatRule, NatRule, Session};

use crate::cli::{NatArgs, NatCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

#[derive(Tabled)]
struct NatRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Internal IP")]
    internal_ip: String,
    #[tabled(rename = "External IP")]
    external_ip: String,
    #[tabled(rename = "State")]
    state: String,
}

impl NatRow {
    fn new(r: &NatRule) -> Self {
        Self {
            id: r.id.clone(),
            internal_ip: r.internal_ip.clone(),
            external_ip: r.external_ip.clone(),
            state: util::state(&r.state),
        }
    }
}

fn detail(r: &NatRule) -> String {
    output::detail(&[
        ("ID", r.id.clone()),
        ("Network Domain", output::or_dash(r.network_domain_id.as_deref())),
        ("Internal IP", r.internal_ip.clone()),
        ("External IP", r.external_ip.clone()),
        ("Created", output::or_dash(r.create_time.as_deref())),
        ("State", util::state(&r.state)),
    ])
}

fn show(ctx: &Ctx, rule: &NatRule) -> Result<(), CliError> {
    let out = output::render_single(ctx.output, rule, detail, |r| r.id.clone())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

pub async fn handle(session: &Session, args: NatArgs, ctx: &Ctx) -> Result<(), CliError> {
    match args.command {
        NatCommand::List { domain } => {
            let nd = util::domain_id(session, &domain).await?;
            let rules = session.list_nat_rules(&nd).await?;
            let out = output::render_list(ctx.output, &rules, NatRow::new, |r| r.id.clone())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        NatCommand::Get { rule } => {
            let found = session.get_nat_rule(&rule).await?;
            show(ctx, &found)
        }

        NatCommand::Create {
            domain,
            internal_ip,
            external_ip,
        } => {
            let req = CreateNatRule {
                network_domain_id: util::domain_id(session, &domain).await?,
                internal_ip,
                external_ip,
            };
            let applied = session.create_nat_rule(&req).await?;
            output::report(
                &applied,
                &format!("NAT rule for {}", req.internal_ip),
                "created",
                ctx.quiet,
            );
            show(ctx, &applied.resource)
        }

        NatCommand::Delete { rule } => {
            if !util::confirm(&format!("Delete NAT rule {rule}?"), ctx.yes)? {
                return Ok(());
            }
            let applied = session.delete_nat_rule(&rule).await?;
            output::report(&applied, &format!("NAT rule {rule}"), "deleted", ctx.quiet);
            Ok(())
        }
    }
}
