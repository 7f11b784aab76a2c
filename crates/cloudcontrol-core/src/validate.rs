// ── Client-side validation ──
//
// Everything here runs before a request is built, so a malformed
// parameter set never reaches the provider.

use std::net::IpAddr;
use std::str::FromStr;

use cloudcontrol_api::caas::models::{IpRange, IpVersion, PortRange};

use crate::error::CoreError;

/// Literal that stands for "any port" in firewall rules.
pub const ANY: &str = "ANY";

/// Firewall port match: a range, or `ANY` (no port clause at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSpec {
    Any,
    Range(PortRange),
}

impl PortSpec {
    /// Parse the `begin` / `end` pair as given on a command line.
    pub fn parse(begin: &str, end: Option<&str>) -> Result<Self, CoreError> {
        if begin.eq_ignore_ascii_case(ANY) {
            if end.is_some() {
                return Err(CoreError::validation(
                    "an end port cannot be combined with ANY",
                ));
            }
            return Ok(Self::Any);
        }
        let begin = parse_port(begin)?;
        let end = end.map(parse_port).transpose()?;
        port_range(begin, end).map(Self::Range)
    }

    /// The wire `port` clause; `None` for `ANY`.
    pub fn to_wire(self) -> Option<PortRange> {
        match self {
            Self::Any => None,
            Self::Range(range) => Some(range),
        }
    }
}

impl FromStr for PortSpec {
    type Err = CoreError;

    /// `ANY`, `443` or `8000-8080`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((begin, end)) => Self::parse(begin.trim(), Some(end.trim())),
            None => Self::parse(s.trim(), None),
        }
    }
}

fn parse_port(raw: &str) -> Result<u16, CoreError> {
    raw.parse::<u16>()
        .map_err(|_| CoreError::validation(format!("'{raw}' is not a valid port number")))
}

/// A port range whose end, when present, is strictly greater than its begin.
pub fn port_range(begin: u16, end: Option<u16>) -> Result<PortRange, CoreError> {
    if let Some(end) = end {
        if end <= begin {
            return Err(CoreError::validation(format!(
                "end port {end} must be greater than the beginning port {begin}"
            )));
        }
    }
    Ok(PortRange { begin, end })
}

/// Parse `80`, `8000-8080` into a validated range.
pub fn parse_port_range(raw: &str) -> Result<PortRange, CoreError> {
    match raw.parse::<PortSpec>()? {
        PortSpec::Range(range) => Ok(range),
        PortSpec::Any => Err(CoreError::validation("ANY is not valid in a port list")),
    }
}

// ── IP address lists ─────────────────────────────────────────────────

fn family_matches(addr: IpAddr, version: IpVersion) -> bool {
    matches!(
        (addr, version),
        (IpAddr::V4(_), IpVersion::Ipv4) | (IpAddr::V6(_), IpVersion::Ipv6)
    )
}

/// An IP list entry: `begin`, then either `end` or `prefix_size`.
pub fn ip_range(
    version: IpVersion,
    begin: &str,
    end: Option<&str>,
    prefix_size: Option<u8>,
) -> Result<IpRange, CoreError> {
    let parse = |raw: &str| {
        raw.parse::<IpAddr>()
            .map_err(|_| CoreError::validation(format!("'{raw}' is not an IP address")))
    };

    let first = parse(begin)?;
    if !family_matches(first, version) {
        return Err(CoreError::validation(format!(
            "{begin} is not an IPv{} address",
            version.number()
        )));
    }

    if end.is_some() && prefix_size.is_some() {
        return Err(CoreError::validation(format!(
            "{begin}: give an end address or a prefix size, not both"
        )));
    }

    if let Some(end) = end {
        let last = parse(end)?;
        if !family_matches(last, version) {
            return Err(CoreError::validation(format!(
                "{end} is not an IPv{} address",
                version.number()
            )));
        }
        if last <= first {
            return Err(CoreError::validation(format!(
                "end address {end} must be greater than {begin}"
            )));
        }
    }

    if let Some(prefix) = prefix_size {
        let max = match version {
            IpVersion::Ipv4 => 32,
            IpVersion::Ipv6 => 128,
        };
        if prefix > max {
            return Err(CoreError::validation(format!(
                "prefix size {prefix} is out of range for IPv{}",
                version.number()
            )));
        }
    }

    Ok(IpRange {
        begin: begin.to_owned(),
        end: end.map(str::to_owned),
        prefix_size,
    })
}

/// Parse `10.0.0.1`, `10.0.0.1-10.0.0.9` or `10.0.0.0/24`.
pub fn parse_ip_range(version: IpVersion, raw: &str) -> Result<IpRange, CoreError> {
    if let Some((begin, end)) = raw.split_once('-') {
        return ip_range(version, begin.trim(), Some(end.trim()), None);
    }
    if let Some((begin, prefix)) = raw.split_once('/') {
        let prefix = prefix
            .trim()
            .parse::<u8>()
            .map_err(|_| CoreError::validation(format!("'{prefix}' is not a prefix size")))?;
        return ip_range(version, begin.trim(), None, Some(prefix));
    }
    ip_range(version, raw.trim(), None, None)
}

/// Non-empty, trimmed name.
pub fn name(kind: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("a {kind} name is required")));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reversed_port_range_is_rejected() {
        assert!(matches!(
            port_range(100, Some(50)),
            Err(CoreError::Validation { .. })
        ));
        assert!(matches!(
            port_range(100, Some(100)),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn ordered_port_range_passes_unchanged() {
        assert_eq!(
            port_range(100, Some(200)).unwrap(),
            PortRange {
                begin: 100,
                end: Some(200)
            }
        );
    }

    #[test]
    fn any_sentinel_has_no_wire_clause() {
        let spec = PortSpec::parse("ANY", None).unwrap();
        assert_eq!(spec, PortSpec::Any);
        assert_eq!(spec.to_wire(), None);
        assert!(PortSpec::parse("ANY", Some("80")).is_err());
    }

    #[test]
    fn port_spec_from_str_forms() {
        assert_eq!(
            "8000-8080".parse::<PortSpec>().unwrap().to_wire(),
            Some(PortRange {
                begin: 8000,
                end: Some(8080)
            })
        );
        assert!("http".parse::<PortSpec>().is_err());
        assert!("70000".parse::<PortSpec>().is_err());
    }

    #[test]
    fn ip_range_checks_family_and_order() {
        assert!(ip_range(IpVersion::Ipv4, "2001:db8::1", None, None).is_err());
        assert!(ip_range(IpVersion::Ipv4, "10.0.0.9", Some("10.0.0.1"), None).is_err());
        assert!(ip_range(IpVersion::Ipv4, "10.0.0.0", Some("10.0.0.9"), Some(24)).is_err());
        assert!(ip_range(IpVersion::Ipv4, "10.0.0.0", None, Some(33)).is_err());

        let cidr = parse_ip_range(IpVersion::Ipv4, "10.0.0.0/24").unwrap();
        assert_eq!(cidr.prefix_size, Some(24));
        let span = parse_ip_range(IpVersion::Ipv6, "2001:db8::1-2001:db8::ff").unwrap();
        assert_eq!(span.end.as_deref(), Some("2001:db8::ff"));
    }
}
