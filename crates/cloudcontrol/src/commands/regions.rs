//! The built-in regional endpoint table. Needs no session.

use tabled::Tabled;

use cloudcontrol_core::{REGIONS, Region};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Host")]
    host: &'static str,
    #[tabled(rename = "Vendor")]
    vendor: String,
}

impl RegionRow {
    fn new(r: &Region) -> Self {
        Self {
            key: r.key,
            name: r.name,
            host: r.host,
            vendor: r.vendor.to_string(),
        }
    }
}

pub fn handle(format: OutputFormat, quiet: bool) -> Result<(), CliError> {
    let out = output::render_list(format, REGIONS, RegionRow::new, |r| r.key.to_owned())?;
    output::print_output(&out, quiet);
    Ok(())
}
