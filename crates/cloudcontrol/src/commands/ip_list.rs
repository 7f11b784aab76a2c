//! IP address list command handlers.

use tabled::Tabled;

use cloudcontrol_core::{CreateIpList, IpAddressList, IpRange, IpVersion, Session, UpdateIpList};

use crate::cli::{IpListArgs, IpListCommand};
use crate::error::CliError;
use crate::output;

use super::port_list::children;
use super::{Ctx, util};

#[derive(Tabled)]
struct IpListRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Entries")]
    entries: String,
    #[tabled(rename = "Children")]
    children: String,
    #[tabled(rename = "State")]
    state: String,
}

fn entries(ranges: &[IpRange]) -> String {
    if ranges.is_empty() {
        return "-".into();
    }
    ranges
        .iter()
        .map(|r| match (&r.end, r.prefix_size) {
            (Some(end), _) => format!("{}-{end}", r.begin),
            (None, Some(prefix)) => format!("{}/{prefix}", r.begin),
            (None, None) => r.begin.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl IpListRow {
    fn new(l: &IpAddressList) -> Self {
        Self {
            id: l.id.clone(),
            name: l.name.clone(),
            version: output::or_dash(l.ip_version.as_deref()),
            entries: entries(&l.ip_address),
            children: children(&l.child_ip_address_list),
            state: util::state(&l.state),
        }
    }
}

fn detail(l: &IpAddressList) -> String {
    output::detail(&[
        ("ID", l.id.clone()),
        ("Name", l.name.clone()),
        ("Description", output::or_dash(l.description.as_deref())),
        ("IP Version", output::or_dash(l.ip_version.as_deref())),
        ("Entries", entries(&l.ip_address)),
        ("Child Lists", children(&l.child_ip_address_list)),
        ("Created", output::or_dash(l.create_time.as_deref())),
        ("State", util::state(&l.state)),
    ])
}

fn show(ctx: &Ctx, list: &IpAddressList) -> Result<(), CliError> {
    let out = output::render_single(ctx.output, list, detail, |l| l.id.clone())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

pub async fn handle(session: &Session, args: IpListArgs, ctx: &Ctx) -> Result<(), CliError> {
    match args.command {
        IpListCommand::List { domain } => {
            let nd = util::domain_id(session, &domain).await?;
            let lists = session.list_ip_address_lists(&nd).await?;
            let out = output::render_list(ctx.output, &lists, IpListRow::new, |l| l.id.clone())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        IpListCommand::Get { list } => {
            let found = session.get_ip_address_list(&list).await?;
            show(ctx, &found)
        }

        IpListCommand::Create {
            domain,
            name,
            description,
            version,
            entries,
            children,
        } => {
            let req = CreateIpList {
                network_domain_id: util::domain_id(session, &domain).await?,
                name,
                description,
                version,
                entries: util::parse_entries(version, &entries)?,
                children,
            };
            let applied = session.create_ip_address_list(&req).await?;
            output::report(
                &applied,
                &format!("IP address list {}", req.name),
                "created",
                ctx.quiet,
            );
            show(ctx, &applied.resource)
        }

        IpListCommand::Update {
            list,
            description,
            entries,
            clear_entries,
            children,
            clear_children,
        } => {
            // Entries are checked against the list's own version.
            let parsed = if entries.is_empty() {
                Vec::new()
            } else {
                let current = session.get_ip_address_list(&list).await?;
                let version = current
                    .ip_version
                    .as_deref()
                    .and_then(|v| v.parse::<IpVersion>().ok())
                    .unwrap_or_default();
                util::parse_entries(version, &entries)?
            };
            let req = UpdateIpList {
                description,
                entries: util::list_change(parsed, clear_entries),
                children: util::list_change(children, clear_children),
            };
            let applied = session.update_ip_address_list(&list, &req).await?;
            output::report(
                &applied,
                &format!("IP address list {list}"),
                "updated",
                ctx.quiet,
            );
            show(ctx, &applied.resource)
        }

        IpListCommand::Delete { list } => {
            if !util::confirm(&format!("Delete IP address list {list}?"), ctx.yes)? {
                return Ok(());
            }
            let applied = session.delete_ip_address_list(&list).await?;
            output::report(
                &applied,
                &format!("IP address list {list}"),
                "deleted",
                ctx.quiet,
            );
            Ok(())
        }
    }
}
