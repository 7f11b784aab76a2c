//! Network domain command handlers.

use tabled::Tabled;

use cloudcontrol_core::{
    CreateNetworkDomain, NetworkDomain, NetworkDomainFilter, Session, UpdateNetworkDomain,
};

use crate::cli::{NetworkDomainArgs, NetworkDomainCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DomainRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    domain_type: String,
    #[tabled(rename = "Datacenter")]
    datacenter: String,
    #[tabled(rename = "SNAT")]
    snat: String,
    #[tabled(rename = "State")]
    state: String,
}

impl DomainRow {
    fn new(d: &NetworkDomain) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            domain_type: output::or_dash(d.domain_type.as_deref()),
            datacenter: output::or_dash(d.datacenter_id.as_deref()),
            snat: output::or_dash(d.snat_ipv4_address.as_deref()),
            state: util::state(&d.state),
        }
    }
}

fn detail(d: &NetworkDomain) -> String {
    output::detail(&[
        ("ID", d.id.clone()),
        ("Name", d.name.clone()),
        ("Description", output::or_dash(d.description.as_deref())),
        ("Type", output::or_dash(d.domain_type.as_deref())),
        ("Datacenter", output::or_dash(d.datacenter_id.as_deref())),
        ("SNAT IPv4", output::or_dash(d.snat_ipv4_address.as_deref())),
        ("Created", output::or_dash(d.create_time.as_deref())),
        ("State", util::state(&d.state)),
    ])
}

fn show(ctx: &Ctx, domain: &NetworkDomain) -> Result<(), CliError> {
    let out = output::render_single(ctx.output, domain, detail, |d| d.id.clone())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: NetworkDomainArgs,
    ctx: &Ctx,
) -> Result<(), CliError> {
    match args.command {
        NetworkDomainCommand::List {
            datacenter,
            name,
            domain_type,
            state,
        } => {
            let filter = NetworkDomainFilter {
                datacenter_id: datacenter,
                name,
                domain_type,
                state,
                ..NetworkDomainFilter::default()
            };
            let domains = session.list_network_domains(&filter).await?;
            let out = output::render_list(ctx.output, &domains, DomainRow::new, |d| {
                d.id.clone()
            })?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        NetworkDomainCommand::Get { domain, datacenter } => {
            let id = util::resolve_domain(session, &domain, datacenter.as_deref()).await?;
            let found = session.get_network_domain(&id).await?;
            show(ctx, &found)
        }

        NetworkDomainCommand::Create {
            datacenter,
            name,
            description,
            domain_type,
            wait,
        } => {
            let req = CreateNetworkDomain {
                datacenter_id: datacenter,
                name,
                description,
                domain_type,
            };
            let policy = wait.policy(ctx.waits.general);
            let applied = util::waiting(
                policy.as_ref(),
                "network domain",
                ctx.quiet,
                session.create_network_domain(&req, policy.as_ref()),
            )
            .await?;
            output::report(
                &applied,
                &format!("Network domain {}", req.name),
                "created",
                ctx.quiet,
            );
            show(ctx, &applied.resource)
        }

        NetworkDomainCommand::Update {
            domain,
            datacenter,
            name,
            description,
            domain_type,
            wait,
        } => {
            let id = util::resolve_domain(session, &domain, datacenter.as_deref()).await?;
            let req = UpdateNetworkDomain {
                name,
                description,
                domain_type,
            };
            let policy = wait.policy(ctx.waits.general);
            let applied = util::waiting(
                policy.as_ref(),
                "network domain",
                ctx.quiet,
                session.update_network_domain(&id, &req, policy.as_ref()),
            )
            .await?;
            output::report(&applied, &format!("Network domain {id}"), "updated", ctx.quiet);
            show(ctx, &applied.resource)
        }

        NetworkDomainCommand::Delete {
            domain,
            datacenter,
            wait,
        } => {
            let id = util::resolve_domain(session, &domain, datacenter.as_deref()).await?;
            if !util::confirm(&format!("Delete network domain {id}?"), ctx.yes)? {
                return Ok(());
            }
            let policy = wait.policy(ctx.waits.general);
            let applied = util::waiting(
                policy.as_ref(),
                "network domain",
                ctx.quiet,
                session.delete_network_domain(&id, policy.as_ref()),
            )
            .await?;
            output::report(&applied, &format!("Network domain {id}"), "deleted", ctx.quiet);
            Ok(())
        }
    }
}
