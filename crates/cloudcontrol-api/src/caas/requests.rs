// ── Typed CaaS request payloads and list filters ──
//
// Each mutating endpoint gets a payload struct; unset optional fields are
// skipped during serialization so an update never resets what the caller
// did not mention. Collections that can be cleared use `ListUpdate`, which
// serializes the provider's `[{"nil": true}]` sentinel.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::caas::models::{
    DiskSpeed, FirewallAction, GatewayAddressing, IpRange, IpVersion, NetworkDomainType,
    PortRange, Protocol, RulePosition,
};

// ── Nil sentinel ───────────────────────────────────────────────────

/// Replacement value for a clearable collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListUpdate<T> {
    /// Replace the collection with these entries.
    Replace(Vec<T>),
    /// Remove every entry (`[{"nil": true}]` on the wire).
    Clear,
}

#[derive(Serialize)]
struct Nil {
    nil: bool,
}

impl<T: Serialize> Serialize for ListUpdate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Replace(items) => items.serialize(serializer),
            Self::Clear => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(&Nil { nil: true })?;
                seq.end()
            }
        }
    }
}

/// `{"id": "..."}` body shared by delete/start/shutdown/reboot endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct IdRequest<'a> {
    pub id: &'a str,
}

// ── Network Domain ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDomainFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub domain_type: Option<NetworkDomainType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployNetworkDomain {
    pub datacenter_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub domain_type: NetworkDomainType,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditNetworkDomain {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub domain_type: Option<NetworkDomainType>,
}

// ── VLAN ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VlanFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_domain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_ipv4_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedVlan {
    pub gateway_addressing: GatewayAddressing,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachedVlan {
    pub ipv4_gateway_address: String,
}

/// `attachedVlan` and `detachedVlan` are mutually exclusive; exactly one
/// must be set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployVlan {
    pub network_domain_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub private_ipv4_network_address: String,
    pub private_ipv4_prefix_size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_vlan: Option<AttachedVlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detached_vlan: Option<DetachedVlan>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditVlan {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_gateway_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_gateway_address: Option<String>,
}

// ── Server ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_domain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores_per_socket: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskSpec {
    pub id: String,
    pub speed: DiskSpeed,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iops: Option<u32>,
}

/// NIC placement: either a VLAN id or a private IPv4 inside one.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NicSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_ipv4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_adapter: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfoSpec {
    pub network_domain_id: String,
    pub primary_nic: NicSpec,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_nic: Vec<NicSpec>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployServer {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_id: String,
    pub start: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrator_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_gb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_dns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_dns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_gateway: Option<String>,
    pub network_info: NetworkInfoSpec,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disk: Vec<DiskSpec>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconfigureServer {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores_per_socket: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_gb: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandDisk {
    /// The disk's id, not the server's.
    pub id: String,
    pub new_size_gb: u32,
}

// ── Infrastructure ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct GeographicRegionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "isHome", skip_serializing_if = "Option::is_none")]
    pub is_home: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DatacenterFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OperatingSystemFilter {
    #[serde(rename = "datacenterId", skip_serializing_if = "Option::is_none")]
    pub datacenter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "id.LIKE", skip_serializing_if = "Option::is_none")]
    pub id_like: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "name.LIKE", skip_serializing_if = "Option::is_none")]
    pub name_like: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "operatingSystemFamily", skip_serializing_if = "Option::is_none")]
    pub os_family: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportImage {
    pub datacenter_id: String,
    pub ovf_package: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub guest_os_customization: bool,
}

// ── IPAM ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPublicIpBlock {
    pub network_domain_id: String,
}

/// Scope of a reservation listing; the VLAN wins when both are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationScope {
    Vlan(String),
    Datacenter(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveIp {
    pub vlan_id: String,
    pub ip_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreserveIp {
    pub vlan_id: String,
    pub ip_address: String,
}

// ── NAT ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNatRule {
    pub network_domain_id: String,
    pub internal_ip: String,
    pub external_ip: String,
}

// ── Port List ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePortList {
    pub network_domain_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub port: Vec<PortRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child_port_list_id: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPortList {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub port: ListUpdate<PortRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_port_list_id: Option<ListUpdate<String>>,
}

// ── IP Address List ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIpAddressList {
    pub network_domain_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ip_version: IpVersion,
    pub ip_address: Vec<IpRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child_ip_address_list_id: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditIpAddressList {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ip_address: ListUpdate<IpRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_ip_address_list_id: Option<ListUpdate<String>>,
}

// ── Firewall Rule ──────────────────────────────────────────────────

/// Literal address match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpMatch {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_size: Option<u8>,
}

/// Source or destination of a rule. An absent `port` and `port_list_id`
/// means "any port".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEndpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address_list_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<PortRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_list_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<RulePosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_to_rule: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFirewallRule {
    pub network_domain_id: String,
    pub name: String,
    pub action: FirewallAction,
    pub ip_version: IpVersion,
    pub protocol: Protocol,
    pub source: RuleEndpoint,
    pub destination: RuleEndpoint,
    pub enabled: bool,
    pub placement: Placement,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFirewallRule {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<FirewallAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<RuleEndpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<RuleEndpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn clear_serializes_nil_sentinel() {
        let edit = EditPortList {
            id: "pl-1".into(),
            description: None,
            port: ListUpdate::Clear,
            child_port_list_id: Some(ListUpdate::Clear),
        };
        assert_eq!(
            serde_json::to_value(&edit).unwrap(),
            json!({
                "id": "pl-1",
                "port": [{ "nil": true }],
                "childPortListId": [{ "nil": true }]
            })
        );
    }

    #[test]
    fn replace_serializes_plain_list_and_omits_unset() {
        let edit = EditIpAddressList {
            id: "ipl-1".into(),
            description: Some("web".into()),
            ip_address: ListUpdate::Replace(vec![IpRange {
                begin: "10.0.0.1".into(),
                end: None,
                prefix_size: Some(24),
            }]),
            child_ip_address_list_id: None,
        };
        assert_eq!(
            serde_json::to_value(&edit).unwrap(),
            json!({
                "id": "ipl-1",
                "description": "web",
                "ipAddress": [{ "begin": "10.0.0.1", "prefixSize": 24 }]
            })
        );
    }

    #[test]
    fn edit_vlan_sends_only_provided_fields() {
        let edit = EditVlan {
            id: "v-1".into(),
            description: Some("app tier".into()),
            ..EditVlan::default()
        };
        assert_eq!(
            serde_json::to_value(&edit).unwrap(),
            json!({ "id": "v-1", "description": "app tier" })
        );
    }

    #[test]
    fn deploy_vlan_attached_shape() {
        let deploy = DeployVlan {
            network_domain_id: "nd-1".into(),
            name: "web".into(),
            description: None,
            private_ipv4_network_address: "10.0.1.0".into(),
            private_ipv4_prefix_size: 24,
            attached_vlan: Some(AttachedVlan {
                gateway_addressing: GatewayAddressing::Low,
            }),
            detached_vlan: None,
        };
        assert_eq!(
            serde_json::to_value(&deploy).unwrap(),
            json!({
                "networkDomainId": "nd-1",
                "name": "web",
                "privateIpv4NetworkAddress": "10.0.1.0",
                "privateIpv4PrefixSize": 24,
                "attachedVlan": { "gatewayAddressing": "LOW" }
            })
        );
    }

    #[test]
    fn operating_system_filter_uses_like_keys() {
        let filter = OperatingSystemFilter {
            name_like: Some("*UBUNTU*".into()),
            ..OperatingSystemFilter::default()
        };
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({ "name.LIKE": "*UBUNTU*" })
        );
    }
}
