// CaaS response types
//
// Models for the CloudControl 2.x JSON API. Entities use `#[serde(default)]`
// liberally because the provider omits unset fields instead of sending
// null, and every entity keeps a flattened `extra` map so nothing the
// provider returns is dropped on the way to the caller.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::Error;

// ── Command Envelope ─────────────────────────────────────────────────

/// Envelope returned by every mutating (`POST`) endpoint.
///
/// ```json
/// { "operation": "DEPLOY_VLAN", "responseCode": "IN_PROGRESS",
///   "message": "...", "info": [{ "name": "vlanId", "value": "..." }],
///   "requestId": "..." }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub response_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub info: Vec<NameValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// `{name, value}` pair from an envelope's `info` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

/// Response codes that mean the request was taken.
const ACCEPTED_CODES: &[&str] = &["OK", "IN_PROGRESS", "SUCCESS"];

impl ApiResponse {
    /// `true` unless the envelope signals a non-OK `responseCode` or
    /// carries an `error` field.
    pub fn is_accepted(&self) -> bool {
        let code_ok = self
            .response_code
            .as_deref()
            .is_none_or(|c| ACCEPTED_CODES.contains(&c));
        code_ok && self.error.is_none()
    }

    /// Return `self` when accepted, otherwise [`Error::Rejected`].
    pub fn into_accepted(self) -> Result<Self, Error> {
        if self.is_accepted() {
            return Ok(self);
        }
        Err(Error::Rejected {
            operation: self.operation.clone().unwrap_or_else(|| "request".into()),
            response_code: self
                .response_code
                .clone()
                .unwrap_or_else(|| "ERROR".into()),
            message: self.error_message(),
        })
    }

    /// The id of the created or queued resource (`info[0].value`).
    pub fn created_id(&self) -> Result<String, Error> {
        self.info
            .first()
            .map(|nv| nv.value.clone())
            .ok_or_else(|| Error::UnexpectedResponse {
                message: format!(
                    "{} was accepted without an id in info[0].value",
                    self.operation.as_deref().unwrap_or("request")
                ),
            })
    }

    /// Best human-readable explanation: `error`, else `message`.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_owned))
                .collect::<Vec<_>>()
                .join("; "),
            Some(other) => other.to_string(),
            None => self.message.clone().unwrap_or_default(),
        }
    }
}

/// Body of a non-200 response, when it parses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response_code: Option<String>,
}

// ── Shared Enumerations ──────────────────────────────────────────────

/// Lifecycle state shared by every state-bearing entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceState {
    Normal,
    PendingAdd,
    PendingChange,
    PendingDelete,
    FailedAdd,
    FailedChange,
    FailedDelete,
    RequiresSupport,
    /// Any state string not in the table above.
    #[serde(untagged)]
    #[strum(default)]
    Other(String),
}

impl ResourceState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Normal => "NORMAL",
            Self::PendingAdd => "PENDING_ADD",
            Self::PendingChange => "PENDING_CHANGE",
            Self::PendingDelete => "PENDING_DELETE",
            Self::FailedAdd => "FAILED_ADD",
            Self::FailedChange => "FAILED_CHANGE",
            Self::FailedDelete => "FAILED_DELETE",
            Self::RequiresSupport => "REQUIRES_SUPPORT",
            Self::Other(s) => s,
        }
    }

    /// `FAILED_*` or `REQUIRES_SUPPORT`.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::FailedAdd | Self::FailedChange | Self::FailedDelete | Self::RequiresSupport
        )
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::PendingAdd | Self::PendingChange | Self::PendingDelete
        )
    }
}

impl std::fmt::Display for ResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disk performance tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum DiskSpeed {
    Standard,
    HighPerformance,
    Economy,
    ProvisionedIops,
}

impl DiskSpeed {
    /// Only provisioned-IOPS disks accept an explicit IOPS value.
    pub fn supports_variable_iops(self) -> bool {
        matches!(self, Self::ProvisionedIops)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum NetworkDomainType {
    Essentials,
    Advanced,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum GatewayAddressing {
    Low,
    High,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum IpVersion {
    #[default]
    Ipv4,
    Ipv6,
}

impl IpVersion {
    pub fn number(self) -> u8 {
        match self {
            Self::Ipv4 => 4,
            Self::Ipv6 => 6,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum FirewallAction {
    #[default]
    AcceptDecisively,
    #[strum(to_string = "DROP", serialize = "DENY")]
    Drop,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Protocol {
    Ip,
    Icmp,
    #[default]
    Tcp,
    Udp,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum RulePosition {
    First,
    #[default]
    Last,
    Before,
    After,
}

impl RulePosition {
    /// `BEFORE` / `AFTER` are relative to another rule.
    pub fn needs_relative_rule(self) -> bool {
        matches!(self, Self::Before | Self::After)
    }
}

// ── Identity ─────────────────────────────────────────────────────────

/// `GET /caas/{version}/user/myUser`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyUser {
    #[serde(default)]
    pub user_name: Option<String>,
    pub organization: Organization,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub home_geo_api_host: String,
    #[serde(default)]
    pub home_geo_id: Option<String>,
}

// ── Shared Fragments ─────────────────────────────────────────────────

/// `{id, name}` reference embedded in other entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdName {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// `{address, prefixSize}` network range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPrefix {
    pub address: String,
    #[serde(default)]
    pub prefix_size: Option<u8>,
}

/// `{begin, end?}` port range as listed by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub begin: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u16>,
}

/// `{begin, end?, prefixSize?}` IP list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpRange {
    pub begin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_size: Option<u8>,
}

// ── Network Domain ───────────────────────────────────────────────────

/// Entry of `network/networkDomain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDomain {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub domain_type: Option<String>,
    #[serde(default)]
    pub snat_ipv4_address: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    pub state: ResourceState,
    #[serde(default)]
    pub datacenter_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── VLAN ─────────────────────────────────────────────────────────────

/// Entry of `network/vlan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub network_domain: Option<IdName>,
    #[serde(default)]
    pub private_ipv4_range: Option<AddressPrefix>,
    #[serde(default)]
    pub ipv4_gateway_address: Option<String>,
    #[serde(default)]
    pub ipv6_range: Option<AddressPrefix>,
    #[serde(default)]
    pub ipv6_gateway_address: Option<String>,
    /// `false` for detached VLANs (customer-managed gateway).
    #[serde(default)]
    pub attached: Option<bool>,
    #[serde(default)]
    pub gateway_addressing: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    pub state: ResourceState,
    #[serde(default)]
    pub datacenter_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Vlan {
    pub fn is_detached(&self) -> bool {
        self.attached == Some(false)
    }

    pub fn network_domain_id(&self) -> Option<&str> {
        self.network_domain.as_ref().map(|d| d.id.as_str())
    }
}

// ── Server ───────────────────────────────────────────────────────────

/// Entry of `server/server`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub datacenter_id: Option<String>,
    pub state: ResourceState,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub deployed: Option<bool>,
    #[serde(default)]
    pub cpu: Option<ServerCpu>,
    #[serde(default)]
    pub memory_gb: Option<u32>,
    #[serde(default)]
    pub disk: Vec<ServerDisk>,
    #[serde(default)]
    pub network_info: Option<ServerNetworkInfo>,
    #[serde(default)]
    pub source_image_id: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Server {
    pub fn network_domain_id(&self) -> Option<&str> {
        self.network_info
            .as_ref()
            .map(|n| n.network_domain_id.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCpu {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default)]
    pub cores_per_socket: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDisk {
    pub id: String,
    #[serde(default)]
    pub scsi_id: Option<u32>,
    #[serde(default)]
    pub size_gb: u32,
    #[serde(default)]
    pub speed: Option<String>,
    #[serde(default)]
    pub iops: Option<u32>,
    #[serde(default)]
    pub state: Option<ResourceState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerNetworkInfo {
    pub network_domain_id: String,
    #[serde(default)]
    pub primary_nic: Option<ServerNic>,
    #[serde(default)]
    pub additional_nic: Vec<ServerNic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerNic {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub private_ipv4: Option<String>,
    #[serde(default)]
    pub ipv6: Option<String>,
    #[serde(default)]
    pub vlan_id: Option<String>,
    #[serde(default)]
    pub vlan_name: Option<String>,
    #[serde(default)]
    pub network_adapter: Option<String>,
    #[serde(default)]
    pub state: Option<ResourceState>,
}

// ── Firewall ─────────────────────────────────────────────────────────

/// Entry of `network/firewallRule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub network_domain_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub ip_version: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub source: Option<FirewallRuleEndpoint>,
    #[serde(default)]
    pub destination: Option<FirewallRuleEndpoint>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rule_type: Option<String>,
    pub state: ResourceState,
    #[serde(default)]
    pub datacenter_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRuleEndpoint {
    #[serde(default)]
    pub ip: Option<AddressPrefix>,
    #[serde(default)]
    pub ip_address_list: Option<IdName>,
    #[serde(default)]
    pub port: Option<PortRange>,
    #[serde(default)]
    pub port_list: Option<IdName>,
}

// ── NAT ──────────────────────────────────────────────────────────────

/// Entry of `network/natRule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatRule {
    pub id: String,
    #[serde(default)]
    pub network_domain_id: Option<String>,
    pub internal_ip: String,
    pub external_ip: String,
    #[serde(default)]
    pub create_time: Option<String>,
    pub state: ResourceState,
    #[serde(default)]
    pub datacenter_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Port / IP Address Lists ──────────────────────────────────────────

/// Entry of `network/portList`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub port: Vec<PortRange>,
    #[serde(default)]
    pub child_port_list: Vec<IdName>,
    pub state: ResourceState,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Entry of `network/ipAddressList`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAddressList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ip_version: Option<String>,
    #[serde(default)]
    pub ip_address: Vec<IpRange>,
    #[serde(default)]
    pub child_ip_address_list: Vec<IdName>,
    pub state: ResourceState,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── IPAM ─────────────────────────────────────────────────────────────

/// Entry of `network/publicIpBlock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpBlock {
    pub id: String,
    #[serde(default)]
    pub network_domain_id: Option<String>,
    pub base_ip: String,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub create_time: Option<String>,
    pub state: ResourceState,
    #[serde(default)]
    pub datacenter_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Entry of `network/reservedPrivateIpv4Address` / `reservedIpv6Address`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedIp {
    pub ip_address: String,
    #[serde(default)]
    pub vlan_id: Option<String>,
    #[serde(default)]
    pub datacenter_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Infrastructure ───────────────────────────────────────────────────

/// Entry of `infrastructure/geographicRegion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographicRegion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cloud_api_host: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub is_home: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Entry of `infrastructure/datacenter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datacenter {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "type")]
    pub datacenter_type: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Entry of `infrastructure/operatingSystem`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingSystem {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Entry of `image/osImage` or `image/customerImage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub datacenter_id: Option<String>,
    #[serde(default)]
    pub state: Option<ResourceState>,
    #[serde(default)]
    pub guest: Option<serde_json::Value>,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
