// Static region endpoint table
//
// Each region key maps to a regional API host operated by one vendor.
// The table is a `const` slice: lookups are linear, the set never changes
// at runtime.

use serde::Serialize;
use strum::{Display, IntoStaticStr};

use crate::error::Error;

/// CaaS API version segment used in every URL.
pub const API_VERSION: &str = "2.8";

/// Region used for the identity lookup and when no region is given.
pub const DEFAULT_REGION: &str = "na";

/// Operator of a regional endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
pub enum Vendor {
    #[strum(serialize = "NTTC-CIS")]
    NttcCis,
    #[strum(serialize = "InternetSolutions")]
    InternetSolutions,
    #[strum(serialize = "NTTNorthAmerica")]
    NttNorthAmerica,
    #[strum(serialize = "Cisco")]
    Cisco,
    #[strum(serialize = "Med-1")]
    Med1,
    #[strum(serialize = "Indosat")]
    Indosat,
    #[strum(serialize = "BSNL")]
    Bsnl,
}

/// One row of the endpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub key: &'static str,
    pub name: &'static str,
    pub host: &'static str,
    pub vendor: Vendor,
}

impl Region {
    const fn new(key: &'static str, name: &'static str, host: &'static str, vendor: Vendor) -> Self {
        Self {
            key,
            name,
            host,
            vendor,
        }
    }

    /// Look a region up by key (`na`, `eu`, `is-latam`, ...).
    pub fn find(key: &str) -> Option<&'static Region> {
        REGIONS.iter().find(|r| r.key == key)
    }

    /// Like [`Region::find`], failing with [`Error::UnknownRegion`].
    pub fn lookup(key: &str) -> Result<&'static Region, Error> {
        Self::find(key).ok_or_else(|| Error::UnknownRegion(key.to_owned()))
    }

    /// The region whose host answers the identity lookup.
    pub fn default_region() -> &'static Region {
        &REGIONS[0]
    }

    /// All region keys, in table order.
    pub fn keys() -> impl Iterator<Item = &'static str> {
        REGIONS.iter().map(|r| r.key)
    }
}

/// Every known regional endpoint.
pub const REGIONS: &[Region] = &[
    // ── NTTC-CIS ──
    Region::new("na", "North America (NA)", "api-na.dimensiondata.com", Vendor::NttcCis),
    Region::new("eu", "Europe (EU)", "api-eu.dimensiondata.com", Vendor::NttcCis),
    Region::new("au", "Australia (AU)", "api-au.dimensiondata.com", Vendor::NttcCis),
    Region::new("au-gov", "Australia Canberra ACT (AU)", "api-canberra.dimensiondata.com", Vendor::NttcCis),
    Region::new("af", "Africa (AF)", "api-mea.dimensiondata.com", Vendor::NttcCis),
    Region::new("ap", "Asia Pacific (AP)", "api-ap.dimensiondata.com", Vendor::NttcCis),
    Region::new("ca", "Canada (CA)", "api-canada.dimensiondata.com", Vendor::NttcCis),
    // ── InternetSolutions ──
    Region::new("is-na", "North America (NA)", "usapi.cloud.is.co.za", Vendor::InternetSolutions),
    Region::new("is-eu", "Europe (EU)", "euapi.cloud.is.co.za", Vendor::InternetSolutions),
    Region::new("is-au", "Australia (AU)", "auapi.cloud.is.co.za", Vendor::InternetSolutions),
    Region::new("is-af", "Africa (AF)", "meaapi.cloud.is.co.za", Vendor::InternetSolutions),
    Region::new("is-ap", "Asia Pacific (AP)", "apapi.cloud.is.co.za", Vendor::InternetSolutions),
    Region::new("is-latam", "South America (LATAM)", "latamapi.cloud.is.co.za", Vendor::InternetSolutions),
    Region::new("is-canada", "Canada (CA)", "canadaapi.cloud.is.co.za", Vendor::InternetSolutions),
    // ── NTTNorthAmerica ──
    Region::new("ntta-na", "North America (NA)", "cloudapi.nttamerica.com", Vendor::NttNorthAmerica),
    Region::new("ntta-eu", "Europe (EU)", "eucloudapi.nttamerica.com", Vendor::NttNorthAmerica),
    Region::new("ntta-au", "Australia (AU)", "aucloudapi.nttamerica.com", Vendor::NttNorthAmerica),
    Region::new("ntta-af", "Africa (AF)", "sacloudapi.nttamerica.com", Vendor::NttNorthAmerica),
    Region::new("ntta-ap", "Asia Pacific (AP)", "hkcloudapi.nttamerica.com", Vendor::NttNorthAmerica),
    // ── Cisco ──
    Region::new("cisco-na", "North America (NA)", "iaas-api-na.cisco-ccs.com", Vendor::Cisco),
    Region::new("cisco-eu", "Europe (EU)", "iaas-api-eu.cisco-ccs.com", Vendor::Cisco),
    Region::new("cisco-au", "Australia (AU)", "iaas-api-au.cisco-ccs.com", Vendor::Cisco),
    Region::new("cisco-af", "Africa (AF)", "iaas-api-mea.cisco-ccs.com", Vendor::Cisco),
    Region::new("cisco-ap", "Asia Pacific (AP)", "iaas-api-ap.cisco-ccs.com", Vendor::Cisco),
    Region::new("cisco-latam", "South America (LATAM)", "iaas-api-sa.cisco-ccs.com", Vendor::Cisco),
    Region::new("cisco-canada", "Canada (CA)", "iaas-api-ca.cisco-ccs.com", Vendor::Cisco),
    // ── Med-1 ──
    Region::new("med1-il", "Israel (IL)", "api.cloud.med-1.com", Vendor::Med1),
    Region::new("med1-na", "North America (NA)", "api-na.cloud.med-1.com", Vendor::Med1),
    Region::new("med1-eu", "Europe (EU)", "api-eu.cloud.med-1.com", Vendor::Med1),
    Region::new("med1-au", "Australia (AU)", "api-au.cloud.med-1.com", Vendor::Med1),
    Region::new("med1-af", "Africa (AF)", "api-af.cloud.med-1.com", Vendor::Med1),
    Region::new("med1-ap", "Asia Pacific (AP)", "api-ap.cloud.med-1.com", Vendor::Med1),
    Region::new("med1-latam", "South America (LATAM)", "api-sa.cloud.med-1.com", Vendor::Med1),
    Region::new("med1-canada", "Canada (CA)", "api-ca.cloud.med-1.com", Vendor::Med1),
    // ── Indosat ──
    Region::new("indosat-id", "Indonesia (ID)", "iaas-api.indosat.com", Vendor::Indosat),
    Region::new("indosat-na", "North America (NA)", "iaas-usapi.indosat.com", Vendor::Indosat),
    Region::new("indosat-eu", "Europe (EU)", "iaas-euapi.indosat.com", Vendor::Indosat),
    Region::new("indosat-au", "Australia (AU)", "iaas-auapi.indosat.com", Vendor::Indosat),
    Region::new("indosat-af", "Africa (AF)", "iaas-afapi.indosat.com", Vendor::Indosat),
    // ── BSNL ──
    Region::new("bsnl-in", "India (IN)", "api.bsnlcloud.com", Vendor::Bsnl),
    Region::new("bsnl-na", "North America (NA)", "usapi.bsnlcloud.com", Vendor::Bsnl),
    Region::new("bsnl-eu", "Europe (EU)", "euapi.bsnlcloud.com", Vendor::Bsnl),
    Region::new("bsnl-au", "Australia (AU)", "auapi.bsnlcloud.com", Vendor::Bsnl),
    Region::new("bsnl-af", "Africa (AF)", "afapi.bsnlcloud.com", Vendor::Bsnl),
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn default_region_is_first_row() {
        assert_eq!(Region::default_region().key, DEFAULT_REGION);
        assert_eq!(Region::default_region().host, "api-na.dimensiondata.com");
    }

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = Region::keys().collect();
        assert_eq!(keys.len(), REGIONS.len());
    }

    #[test]
    fn lookup_known_and_unknown() {
        let region = Region::lookup("is-latam").unwrap();
        assert_eq!(region.host, "latamapi.cloud.is.co.za");
        assert_eq!(region.vendor, Vendor::InternetSolutions);
        assert_eq!(region.vendor.to_string(), "InternetSolutions");

        assert!(matches!(Region::lookup("mars"), Err(Error::UnknownRegion(k)) if k == "mars"));
    }
}
