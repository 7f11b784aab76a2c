//! Read-only infrastructure queries and customer image import.

use tabled::Tabled;

use cloudcontrol_core::{
    Datacenter, DatacenterFilter, GeographicRegion, GeographicRegionFilter, Image, ImageFilter,
    ImportImage, OperatingSystem, OperatingSystemFilter, Session,
};

use crate::cli::{InfraArgs, InfraCommand};
use crate::error::CliError;
use crate::output;

use super::Ctx;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct GeoRegionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "API Host")]
    host: String,
    #[tabled(rename = "Time Zone")]
    time_zone: String,
    #[tabled(rename = "Home")]
    home: String,
}

impl GeoRegionRow {
    fn new(r: &GeographicRegion) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            host: output::or_dash(r.cloud_api_host.as_deref()),
            time_zone: output::or_dash(r.time_zone.as_deref()),
            home: output::yes_no(r.is_home.unwrap_or(false)),
        }
    }
}

#[derive(Tabled)]
struct DatacenterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    datacenter_type: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Country")]
    country: String,
}

impl DatacenterRow {
    fn new(d: &Datacenter) -> Self {
        Self {
            id: d.id.clone(),
            name: output::or_dash(d.display_name.as_deref()),
            datacenter_type: output::or_dash(d.datacenter_type.as_deref()),
            city: output::or_dash(d.city.as_deref()),
            country: output::or_dash(d.country.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct OsRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Family")]
    family: String,
}

impl OsRow {
    fn new(o: &OperatingSystem) -> Self {
        Self {
            id: o.id.clone(),
            name: output::or_dash(o.display_name.as_deref()),
            family: output::or_dash(o.family.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct ImageRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Datacenter")]
    datacenter: String,
    #[tabled(rename = "State")]
    state: String,
}

fn image_state(i: &Image) -> String {
    i.state
        .as_ref()
        .map_or_else(|| "-".into(), |s| s.as_str().to_owned())
}

impl ImageRow {
    fn new(i: &Image) -> Self {
        Self {
            id: i.id.clone(),
            name: i.name.clone(),
            datacenter: output::or_dash(i.datacenter_id.as_deref()),
            state: image_state(i),
        }
    }
}

fn image_detail(i: &Image) -> String {
    output::detail(&[
        ("ID", i.id.clone()),
        ("Name", i.name.clone()),
        ("Description", output::or_dash(i.description.as_deref())),
        ("Datacenter", output::or_dash(i.datacenter_id.as_deref())),
        ("Created", output::or_dash(i.create_time.as_deref())),
        ("State", image_state(i)),
    ])
}

fn show_image(ctx: &Ctx, image: &Image) -> Result<(), CliError> {
    let out = output::render_single(ctx.output, image, image_detail, |i| i.id.clone())?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

/// Exact match, or `id.LIKE` / `name.LIKE` when `like` is set.
fn os_filter(
    datacenter: String,
    id: Option<String>,
    name: Option<String>,
    like: bool,
    family: Option<String>,
) -> OperatingSystemFilter {
    let mut filter = OperatingSystemFilter {
        datacenter_id: Some(datacenter),
        family,
        ..OperatingSystemFilter::default()
    };
    if like {
        filter.id_like = id;
        filter.name_like = name;
    } else {
        filter.id = id;
        filter.name = name;
    }
    filter
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: InfraArgs, ctx: &Ctx) -> Result<(), CliError> {
    match args.command {
        InfraCommand::GeoRegions => {
            let regions = session
                .list_geographic_regions(&GeographicRegionFilter::default())
                .await?;
            let out =
                output::render_list(ctx.output, &regions, GeoRegionRow::new, |r| r.id.clone())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        InfraCommand::Datacenters { id } => {
            let datacenters = session.list_datacenters(&DatacenterFilter { id }).await?;
            let out = output::render_list(ctx.output, &datacenters, DatacenterRow::new, |d| {
                d.id.clone()
            })?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        InfraCommand::OperatingSystems {
            datacenter,
            id,
            name,
            like,
            family,
        } => {
            let filter = os_filter(datacenter, id, name, like, family);
            let systems = session.list_operating_systems(&filter).await?;
            let out = output::render_list(ctx.output, &systems, OsRow::new, |o| o.id.clone())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        InfraCommand::Images {
            datacenter,
            name,
            customer,
        } => {
            let filter = ImageFilter {
                datacenter_id: datacenter,
                name,
                ..ImageFilter::default()
            };
            let images = if customer {
                session.list_customer_images(&filter).await?
            } else {
                session.list_os_images(&filter).await?
            };
            let out = output::render_list(ctx.output, &images, ImageRow::new, |i| i.id.clone())?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        InfraCommand::Image { image } => {
            let found = session.get_customer_image(&image).await?;
            show_image(ctx, &found)
        }

        InfraCommand::ImportImage {
            datacenter,
            ovf_package,
            name,
            description,
            guest_os_customization,
        } => {
            let req = ImportImage {
                datacenter_id: datacenter,
                ovf_package,
                name,
                description,
                guest_os_customization,
            };
            let applied = session.import_image(&req).await?;
            output::report(&applied, &format!("Image {}", req.name), "imported", ctx.quiet);
            show_image(ctx, &applied.resource)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_moves_patterns_to_like_fields() {
        let exact = os_filter("NA9".into(), None, Some("CENTOS7/64".into()), false, None);
        assert_eq!(exact.name.as_deref(), Some("CENTOS7/64"));
        assert!(exact.name_like.is_none());

        let like = os_filter("NA9".into(), Some("CENTOS%".into()), None, true, None);
        assert_eq!(like.id_like.as_deref(), Some("CENTOS%"));
        assert!(like.id.is_none());
    }
}
