// cloudcontrol-api: Async Rust client for the NTT CIS CloudControl (CaaS 2.x) API

pub mod caas;
pub mod endpoints;
pub mod error;
pub mod region;
pub mod transport;

pub use caas::{CaasClient, Credentials, ShutdownOutcome};
pub use endpoints::{ApiHosts, Endpoints};
pub use error::Error;
pub use region::{API_VERSION, DEFAULT_REGION, Region, Vendor};
pub use transport::{TlsMode, TransportConfig};
