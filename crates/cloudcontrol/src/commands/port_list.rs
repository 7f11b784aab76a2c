//! Port list command handlers.

use tabled::Tabled;

use cloudcontrol_core::{CreatePortList, IdName, PortList, PortRange, Session, UpdatePortList};

use crate::cli::{PortListArgs, PortListCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PortListRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Ports")]
    ports: String,
    #[tabled(rename = "Children")]
    children: String,
    #[tabled(rename = "State")]
    state: String,
}

fn ports(ranges: &[PortRange]) -> String {
    if ranges.is_empty() {
        return "-".into();
    }
    ranges
        .iter()
        .map(|r| match r.end {
            Some(end) => format!("{}-{end}", r.begin),
            None => r.begin.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Child list names, falling back to ids.
pub(super) fn children(refs: &[IdName]) -> String {
    if refs.is_empty() {
        return "-".into();
    }
    refs.iter()
        .map(|c| c.name.as_deref().unwrap_or(&c.id))
        .collect::<Vec<_>>()
        .join(", ")
}

impl PortListRow {
    fn new(l: &PortList) -> Self {
        Self {
            id: l.id.clone(),
            name: l.name.clone(),
            ports: ports(&l.port),
            children: children(&l.child_port_list),
            state: util::state(&l.state),
        }
    }
}

fn detail(l: &PortList) -> String {
    output::detail(&[
        ("ID", l.id.clone()),
        ("Name", l.name.clone()),
        ("Description", output::or_dash(l.description.as_deref())),
        ("Ports", ports(&l.port)),
        ("Child Lists", children(&l.child_port_list)),
        ("Created", output::or_dash(l.create_time.as_deref())),
        ("State", util::state(&l.state)),
    ])
}

fn show(ctx: &Ctx, list: &PortList) -> Result<(), CliError> {
    let out = output::render_single(ctx.output, list, detail, |l| l.id.clone())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: PortListArgs, ctx: &Ctx) -> Result<(), CliError> {
    match args.command {
        PortListCommand::List { domain } => {
            let nd = util::domain_id(session, &domain).await?;
            let lists = session.list_port_lists(&nd).await?;
            let out =
                output::render_list(ctx.output, &lists, PortListRow::new, |l| l.id.clone())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        PortListCommand::Get { list } => {
            let found = session.get_port_list(&list).await?;
            show(ctx, &found)
        }

        PortListCommand::Create {
            domain,
            name,
            description,
            ports,
            children,
        } => {
            let req = CreatePortList {
                network_domain_id: util::domain_id(session, &domain).await?,
                name,
                description,
                ports: util::parse_ports(&ports)?,
                children,
            };
            let applied = session.create_port_list(&req).await?;
            output::report(&applied, &format!("Port list {}", req.name), "created", ctx.quiet);
            show(ctx, &applied.resource)
        }

        PortListCommand::Update {
            list,
            description,
            ports,
            clear_ports,
            children,
            clear_children,
        } => {
            let req = UpdatePortList {
                description,
                ports: util::list_change(util::parse_ports(&ports)?, clear_ports),
                children: util::list_change(children, clear_children),
            };
            let applied = session.update_port_list(&list, &req).await?;
            output::report(&applied, &format!("Port list {list}"), "updated", ctx.quiet);
            show(ctx, &applied.resource)
        }

        PortListCommand::Delete { list } => {
            if !util::confirm(&format!("Delete port list {list}?"), ctx.yes)? {
                return Ok(());
            }
            let applied = session.delete_port_list(&list).await?;
            output::report(&applied, &format!("Port list {list}"), "deleted", ctx.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_render_singles_and_ranges() {
        let ranges = [
            PortRange {
                begin: 443,
                end: None,
            },
            PortRange {
                begin: 8000,
                end: Some(8080),
            },
        ];
        assert_eq!(ports(&ranges), "443, 8000-8080");
        assert_eq!(ports(&[]), "-");
    }

    #[test]
    fn children_prefer_names() {
        let refs = [
            IdName {
                id: "a1".into(),
                name: Some("web".into()),
            },
            IdName {
                id: "b2".into(),
                name: None,
            },
        ];
        assert_eq!(children(&refs), "web, b2");
    }
}
