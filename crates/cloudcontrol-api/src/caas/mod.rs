// CloudControl CaaS 2.x API
//
// Basic-Auth JSON API. Reads are `GET {base}/{category}/{collection}`
// returning `{ <collection>: [...], totalCount, ... }`; writes are
// `POST {base}/{category}/{action}` returning a command envelope.

pub mod client;
pub mod firewall;
pub mod infrastructure;
pub mod ip_lists;
pub mod ipam;
pub mod models;
pub mod nat;
pub mod network_domains;
pub mod port_lists;
pub mod requests;
pub mod servers;
pub mod vlans;

pub use client::{CaasClient, Credentials};
pub use servers::ShutdownOutcome;
