// ── Session ──
//
// A bootstrapped CaaS client plus the policies every operation shares.
// Construction performs the identity lookup; a `Session` value therefore
// always has a resolved organization id and home-geo host.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use cloudcontrol_api::{ApiHosts, CaasClient, Credentials, Region, TlsMode, TransportConfig};

use crate::config::{DuplicateNamePolicy, SessionConfig, TlsVerification};
use crate::converge::{Poller, Sleeper, TokioSleeper};
use crate::error::CoreError;

/// Entry point for every resource operation.
pub struct Session {
    client: CaasClient,
    region: &'static Region,
    poller: Poller,
    name_policy: DuplicateNamePolicy,
}

impl Session {
    /// Resolve the region, build the HTTP client and run the identity lookup.
    ///
    /// A failed lookup is fatal: `CoreError::SessionBootstrap`.
    pub async fn connect(config: SessionConfig) -> Result<Self, CoreError> {
        let region = Region::lookup(&config.region)?;
        let hosts = match &config.base_url {
            Some(base) => ApiHosts::single(base)?,
            None => ApiHosts::for_region(region),
        };

        let transport = TransportConfig {
            tls: tls_mode(&config.tls),
            timeout: config.timeout,
        };
        let credentials = Credentials {
            user_id: config.user_id.clone(),
            password: config.password.clone(),
        };

        let client = CaasClient::connect(&hosts, credentials, &transport)
            .await
            .map_err(|e| match e {
                cloudcontrol_api::Error::Tls(_) | cloudcontrol_api::Error::InvalidUrl(_) => {
                    CoreError::from(e)
                }
                other => CoreError::SessionBootstrap {
                    user: config.user_id.clone(),
                    reason: other.to_string(),
                },
            })?;

        info!(
            region = region.key,
            org_id = client.org_id(),
            "session established"
        );
        Ok(Self::from_client(client, region).with_name_policy(config.name_policy))
    }

    /// Wrap an already-bootstrapped client.
    pub fn from_client(client: CaasClient, region: &'static Region) -> Self {
        Self {
            client,
            region,
            poller: Poller::new(Arc::new(TokioSleeper), CancellationToken::new()),
            name_policy: DuplicateNamePolicy::default(),
        }
    }

    /// Replace the sleeper used between polls.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        let cancel = self.poller.cancellation_token().clone();
        self.poller = Poller::new(sleeper, cancel);
        self
    }

    /// Use `cancel` to abort in-flight waits.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.poller = Poller::new(self.poller.sleeper(), cancel);
        self
    }

    pub fn with_name_policy(mut self, policy: DuplicateNamePolicy) -> Self {
        self.name_policy = policy;
        self
    }

    pub fn client(&self) -> &CaasClient {
        &self.client
    }

    pub fn region(&self) -> &'static Region {
        self.region
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub fn name_policy(&self) -> DuplicateNamePolicy {
        self.name_policy
    }

    /// Token that cancels waits started from this session.
    pub fn cancellation_token(&self) -> &CancellationToken {
        self.poller.cancellation_token()
    }
}

fn tls_mode(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
