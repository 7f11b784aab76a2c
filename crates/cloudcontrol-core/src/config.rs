// ── Runtime session configuration ──
//
// These types describe *how* to reach CloudControl. They carry credential
// data and connection tuning, but never touch disk. The CLI builds a
// `SessionConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use cloudcontrol_api::DEFAULT_REGION;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (intercepting proxies only).
    DangerAcceptInvalid,
}

/// What a name lookup does when several entities share the name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateNamePolicy {
    /// Take the first entity in provider list order and log a warning.
    #[default]
    FirstMatch,
    /// Fail with `CoreError::AmbiguousReference`.
    Reject,
}

/// Configuration for one CloudControl session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Region key from the endpoint table (`na`, `eu`, `is-au`, ...).
    pub region: String,
    pub user_id: String,
    pub password: SecretString,
    /// Route every request to this base instead of the region's public
    /// hosts (API gateways, mock servers).
    pub base_url: Option<Url>,
    pub tls: TlsVerification,
    /// HTTP request timeout.
    pub timeout: Duration,
    pub name_policy: DuplicateNamePolicy,
}

impl SessionConfig {
    pub fn new(
        region: impl Into<String>,
        user_id: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            region: region.into(),
            user_id: user_id.into(),
            password,
            base_url: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(60),
            name_policy: DuplicateNamePolicy::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REGION, "", SecretString::from(String::new()))
    }
}
