// cloudcontrol-core: Lookup, declarative resource operations and the
// convergence engine on top of cloudcontrol-api.

pub mod config;
pub mod converge;
pub mod error;
pub mod lookup;
pub mod ops;
pub mod password;
pub mod requests;
pub mod session;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DuplicateNamePolicy, SessionConfig, TlsVerification};
pub use converge::{
    FailureStatePolicy, InstantSleeper, PollState, Poller, Sleeper, Stateful, TokioSleeper,
    TrackingSleeper, WaitPolicy, WaitTarget,
};
pub use error::CoreError;
pub use lookup::{ChildLists, Named};
pub use ops::{Applied, Deployed};
pub use password::generate_password;
pub use requests::*;
pub use session::Session;
pub use validate::{ANY, PortSpec};

// Wire models callers see in results.
pub use cloudcontrol_api::caas::models::{
    AddressPrefix, Datacenter, DiskSpeed, FirewallAction, FirewallRule, FirewallRuleEndpoint,
    GatewayAddressing, GeographicRegion, IdName, Image, IpAddressList, IpRange, IpVersion,
    NatRule, NetworkDomain, NetworkDomainType, OperatingSystem, PortList, PortRange, Protocol, PublicIpBlock, ReservedIp, ResourceState,
    RulePosition, Server, Vlan,
};
// Filters and payloads the operation layer takes as-is.
pub use cloudcontrol_api::caas::requests::{
    DatacenterFilter, GeographicRegionFilter, ImageFilter, ImportImage, NetworkDomainFilter,
    OperatingSystemFilter, ReservationScope, ServerFilter, VlanFilter,
};
pub use cloudcontrol_api::region::REGIONS;
pub use cloudcontrol_api::{DEFAULT_REGION, Region, Vendor};
