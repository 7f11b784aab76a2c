// ── Operation request types ──
//
// What callers hand to `Session` operations. These carry names and
// human-level choices (a VLAN by name, `ANY` as a port); the operation
// layer validates them, resolves references and builds the wire payloads
// from `cloudcontrol_api::caas::requests`.

use secrecy::SecretString;

use cloudcontrol_api::caas::models::{
    DiskSpeed, FirewallAction, GatewayAddressing, IpRange, IpVersion, NetworkDomainType,
    PortRange, Protocol, RulePosition,
};

use crate::error::CoreError;
use crate::validate::PortSpec;

/// Change to a clearable collection on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange<T> {
    Replace(Vec<T>),
    Clear,
}

// ── Network Domain ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CreateNetworkDomain {
    pub datacenter_id: String,
    pub name: String,
    pub description: Option<String>,
    pub domain_type: NetworkDomainType,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateNetworkDomain {
    pub name: Option<String>,
    pub description: Option<String>,
    pub domain_type: Option<NetworkDomainType>,
}

// ── VLAN ───────────────────────────────────────────────────────────

/// How the VLAN's gateway is provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VlanMode {
    /// Provider-managed gateway at the low or high end of the range.
    Attached(GatewayAddressing),
    /// Customer-managed gateway at an explicit address.
    Detached { ipv4_gateway: String },
}

impl VlanMode {
    /// Exactly one of `gateway_addressing` or `detached_gateway` must be set.
    pub fn from_parts(
        gateway_addressing: Option<GatewayAddressing>,
        detached_gateway: Option<String>,
    ) -> Result<Self, CoreError> {
        match (gateway_addressing, detached_gateway) {
            (Some(side), None) => Ok(Self::Attached(side)),
            (None, Some(ipv4_gateway)) => Ok(Self::Detached { ipv4_gateway }),
            (Some(_), Some(_)) => Err(CoreError::validation(
                "a VLAN is either attached (LOW/HIGH) or detached with a gateway, not both",
            )),
            (None, None) => Err(CoreError::validation(
                "a VLAN needs gateway addressing (LOW/HIGH) or a detached gateway address",
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateVlan {
    pub network_domain_id: String,
    pub name: String,
    pub description: Option<String>,
    pub private_ipv4_network: String,
    pub private_ipv4_prefix_size: u8,
    pub mode: VlanMode,
}

/// Gateway fields are only honoured on detached VLANs.
#[derive(Debug, Clone, Default)]
pub struct UpdateVlan {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ipv4_gateway: Option<String>,
    pub ipv6_gateway: Option<String>,
}

// ── Server ─────────────────────────────────────────────────────────

/// Where a NIC lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NicPlacement {
    /// A VLAN in the server's network domain, by name.
    VlanName(String),
    VlanId(String),
    /// A private IPv4 address; the provider picks the VLAN that holds it.
    PrivateIpv4(String),
}

#[derive(Debug, Clone)]
pub struct NicRequest {
    pub placement: NicPlacement,
    pub network_adapter: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DiskRequest {
    /// Image disk id.
    pub id: String,
    pub speed: DiskSpeed,
    pub iops: Option<u32>,
}

impl DiskRequest {
    fn validate(&self) -> Result<(), CoreError> {
        if self.iops.is_some() && !self.speed.supports_variable_iops() {
            return Err(CoreError::validation(format!(
                "disk {}: IOPS can only be set with speed {}",
                self.id,
                DiskSpeed::ProvisionedIops
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CreateServer {
    pub name: String,
    pub description: Option<String>,
    pub image_id: String,
    pub network_domain_id: String,
    pub primary_nic: NicRequest,
    pub additional_nics: Vec<NicRequest>,
    pub disks: Vec<DiskRequest>,
    pub cpu_count: Option<u32>,
    pub cores_per_socket: Option<u32>,
    pub cpu_speed: Option<String>,
    pub memory_gb: Option<u32>,
    pub primary_dns: Option<String>,
    pub secondary_dns: Option<String>,
    pub ipv4_gateway: Option<String>,
    pub ipv6_gateway: Option<String>,
    pub start: bool,
    /// Guest OS customization (`deployServer`) versus
    /// `deployUncustomizedServer`.
    pub customize: bool,
    /// Generated when customizing and left unset.
    pub administrator_password: Option<SecretString>,
}

impl CreateServer {
    pub(crate) fn validate(&self) -> Result<(), CoreError> {
        crate::validate::name("server", &self.name)?;
        if self.image_id.trim().is_empty() {
            return Err(CoreError::validation("an image id is required"));
        }
        for (index, nic) in self.additional_nics.iter().enumerate() {
            if nic.network_adapter.is_none() {
                return Err(CoreError::validation(format!(
                    "additional NIC {} needs a network adapter",
                    index + 1
                )));
            }
        }
        for disk in &self.disks {
            disk.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateServer {
    pub cpu_count: Option<u32>,
    pub cores_per_socket: Option<u32>,
    pub cpu_speed: Option<String>,
    pub memory_gb: Option<u32>,
}

impl UpdateServer {
    pub fn is_empty(&self) -> bool {
        self.cpu_count.is_none()
            && self.cores_per_socket.is_none()
            && self.cpu_speed.is_none()
            && self.memory_gb.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PowerAction {
    Start,
    Stop,
    Reboot,
}

// ── Firewall Rule ──────────────────────────────────────────────────

/// Source or destination address match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSpec {
    /// `ANY`, an address, or an address with prefix.
    Literal {
        address: String,
        prefix_size: Option<u8>,
    },
    /// An IP address list in the rule's network domain, by name.
    List(String),
}

/// Source or destination port match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortMatch {
    Ports(PortSpec),
    /// A port list in the rule's network domain, by name.
    List(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    pub address: AddressSpec,
    pub port: PortMatch,
}

impl EndpointSpec {
    /// Build from loose parts: exactly one address form and exactly one
    /// port form. `ANY` has to be given explicitly.
    pub fn from_parts(
        side: &str,
        ip: Option<String>,
        prefix_size: Option<u8>,
        ip_list: Option<String>,
        port: Option<PortSpec>,
        port_list: Option<String>,
    ) -> Result<Self, CoreError> {
        let address = match (ip, ip_list) {
            (Some(address), None) => AddressSpec::Literal {
                address,
                prefix_size,
            },
            (None, Some(list)) if prefix_size.is_none() => AddressSpec::List(list),
            (None, Some(_)) => {
                return Err(CoreError::validation(format!(
                    "{side}: a prefix size cannot be combined with an IP address list"
                )));
            }
            (Some(_), Some(_)) => {
                return Err(CoreError::validation(format!(
                    "{side}: give an IP address or an IP address list, not both"
                )));
            }
            (None, None) => {
                return Err(CoreError::validation(format!(
                    "{side}: an IP address or an IP address list is required"
                )));
            }
        };
        let port = match (port, port_list) {
            (Some(spec), None) => PortMatch::Ports(spec),
            (None, Some(list)) => PortMatch::List(list),
            (None, None) => {
                return Err(CoreError::validation(format!(
                    "{side}: a port, ANY, or a port list is required"
                )));
            }
            (Some(_), Some(_)) => {
                return Err(CoreError::validation(format!(
                    "{side}: give a port range or a port list, not both"
                )));
            }
        };
        Ok(Self { address, port })
    }
}

#[derive(Debug, Clone)]
pub struct CreateFirewallRule {
    pub network_domain_id: String,
    pub name: String,
    pub action: FirewallAction,
    pub ip_version: IpVersion,
    pub protocol: Protocol,
    pub source: EndpointSpec,
    pub destination: EndpointSpec,
    pub enabled: bool,
    pub position: RulePosition,
    /// Rule name, required for `BEFORE` / `AFTER`.
    pub relative_to: Option<String>,
}

impl CreateFirewallRule {
    /// ACCEPT_DECISIVELY, IPv4, TCP, enabled, placed LAST.
    pub fn new(
        network_domain_id: impl Into<String>,
        name: impl Into<String>,
        source: EndpointSpec,
        destination: EndpointSpec,
    ) -> Self {
        Self {
            network_domain_id: network_domain_id.into(),
            name: name.into(),
            action: FirewallAction::default(),
            ip_version: IpVersion::default(),
            protocol: Protocol::default(),
            source,
            destination,
            enabled: true,
            position: RulePosition::default(),
            relative_to: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFirewallRule {
    pub action: Option<FirewallAction>,
    pub protocol: Option<Protocol>,
    pub source: Option<EndpointSpec>,
    pub destination: Option<EndpointSpec>,
    pub enabled: Option<bool>,
    pub position: Option<RulePosition>,
    pub relative_to: Option<String>,
}

// ── Port / IP lists ────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CreatePortList {
    pub network_domain_id: String,
    pub name: String,
    pub description: Option<String>,
    pub ports: Vec<PortRange>,
    /// Child port list ids.
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePortList {
    pub description: Option<String>,
    pub ports: Option<ListChange<PortRange>>,
    pub children: Option<ListChange<String>>,
}

#[derive(Debug, Clone)]
pub struct CreateIpList {
    pub network_domain_id: String,
    pub name: String,
    pub description: Option<String>,
    pub version: IpVersion,
    pub entries: Vec<IpRange>,
    /// Child IP address list ids.
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateIpList {
    pub description: Option<String>,
    pub entries: Option<ListChange<IpRange>>,
    pub children: Option<ListChange<String>>,
}

// ── NAT / IPAM ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CreateNatRule {
    pub network_domain_id: String,
    pub internal_ip: String,
    pub external_ip: String,
}

#[derive(Debug, Clone)]
pub struct ReserveIp {
    pub vlan_id: String,
    pub ip_address: String,
    pub version: IpVersion,
    pub description: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn vlan_mode_needs_exactly_one_gateway_form() {
        assert_eq!(
            VlanMode::from_parts(Some(GatewayAddressing::Low), None).unwrap(),
            VlanMode::Attached(GatewayAddressing::Low)
        );
        assert!(VlanMode::from_parts(None, None).is_err());
        assert!(VlanMode::from_parts(Some(GatewayAddressing::High), Some("10.0.0.1".into())).is_err());
    }

    #[test]
    fn endpoint_without_port_is_rejected() {
        let err =
            EndpointSpec::from_parts("source", Some("ANY".into()), None, None, None, None)
                .unwrap_err();
        assert!(
            matches!(&err, CoreError::Validation { message } if message.starts_with("source:")),
            "{err}"
        );

        let spec = EndpointSpec::from_parts(
            "source",
            Some("ANY".into()),
            None,
            None,
            Some(PortSpec::Any),
            None,
        )
        .unwrap();
        assert_eq!(spec.port, PortMatch::Ports(PortSpec::Any));
    }

    #[test]
    fn endpoint_rejects_conflicting_forms() {
        assert!(
            EndpointSpec::from_parts(
                "source",
                Some("10.0.0.1".into()),
                None,
                Some("web".into()),
                None,
                None
            )
            .is_err()
        );
        assert!(EndpointSpec::from_parts("destination", None, None, None, None, None).is_err());
        assert!(
            EndpointSpec::from_parts(
                "destination",
                None,
                None,
                Some("web".into()),
                Some(PortSpec::Any),
                Some("http".into())
            )
            .is_err()
        );
    }

    #[test]
    fn iops_only_with_provisioned_speed() {
        let disk = DiskRequest {
            id: "d-1".into(),
            speed: DiskSpeed::Standard,
            iops: Some(500),
        };
        assert!(disk.validate().is_err());
        let disk = DiskRequest {
            speed: DiskSpeed::ProvisionedIops,
            ..disk
        };
        assert!(disk.validate().is_ok());
    }
}
