// CaaS API HTTP client
//
// Wraps `reqwest::Client` with Basic-Auth credentials, session URL
// construction, and response normalization. All endpoint groups
// (network domains, VLANs, servers, ...) are implemented as inherent
// methods in separate files to keep this module focused on transport
// mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::caas::models::{ApiResponse, ErrorBody, MyUser};
use crate::endpoints::{ApiHosts, Endpoints};
use crate::error::Error;
use crate::transport::TransportConfig;

const BODY_PREVIEW: usize = 200;

/// Query for endpoints that take no filters.
pub(crate) const NO_QUERY: &[(&str, &str)] = &[];

/// Basic-Auth credential pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Raw HTTP client for the CloudControl 2.x API.
///
/// A client only exists after the identity lookup succeeded: the
/// organization id and home-geo host it returns are baked into every
/// URL, so there is no "unauthenticated" state to guard against.
pub struct CaasClient {
    http: reqwest::Client,
    credentials: Credentials,
    endpoints: Endpoints,
}

impl CaasClient {
    /// Build an HTTP client from `transport` and bootstrap the session.
    pub async fn connect(
        hosts: &ApiHosts,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::connect_with_client(http, hosts, credentials).await
    }

    /// Bootstrap the session over a pre-built `reqwest::Client`.
    ///
    /// `GET {identity host}/caas/{version}/user/myUser` yields the
    /// organization id and home-geo host.
    pub async fn connect_with_client(
        http: reqwest::Client,
        hosts: &ApiHosts,
        credentials: Credentials,
    ) -> Result<Self, Error> {
        let url = hosts.identity_url()?;
        debug!(user = %credentials.user_id, "resolving organization via {url}");

        let builder = http
            .get(url)
            .basic_auth(&credentials.user_id, Some(credentials.password.expose_secret()));
        let user: MyUser = send(builder).await?;

        let org = &user.organization;
        debug!(org_id = %org.id, home_geo = %org.home_geo_api_host, "session bootstrapped");
        let endpoints = hosts.resolve(&org.id, &org.home_geo_api_host)?;

        Ok(Self {
            http,
            credentials,
            endpoints,
        })
    }

    /// Create a client from already-resolved endpoints (no identity lookup).
    pub fn with_endpoints(
        http: reqwest::Client,
        endpoints: Endpoints,
        credentials: Credentials,
    ) -> Self {
        Self {
            http,
            credentials,
            endpoints,
        }
    }

    /// The session's URL prefixes.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// The resolved organization id.
    pub fn org_id(&self) -> &str {
        self.endpoints.org_id()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{regional base}{path}`
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        self.endpoints.regional(path)
    }

    /// `{home-geo base}{path}`
    pub(crate) fn home_geo_url(&self, path: &str) -> Result<Url, Error> {
        self.endpoints.home_geo(path)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and deserialize the whole body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &(impl Serialize + Sync + ?Sized),
    ) -> Result<T, Error> {
        debug!("GET {url}");
        let builder = self.authed(self.http.get(url)).query(query);
        send(builder).await
    }

    /// Send an authenticated GET against a list endpoint and extract
    /// `collection_key` from the `{ totalCount, <key>: [...] }` envelope.
    pub(crate) async fn get_collection<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &(impl Serialize + Sync + ?Sized),
        collection_key: &str,
    ) -> Result<Vec<T>, Error> {
        let mut envelope: serde_json::Value = self.get(url, query).await?;
        extract_collection(&mut envelope, collection_key)
    }

    /// Send an authenticated POST and return the raw command envelope.
    ///
    /// The envelope is *not* checked; use [`CaasClient::post_accepted`]
    /// unless the caller interprets `responseCode` itself.
    pub(crate) async fn post(
        &self,
        url: Url,
        body: &(impl Serialize + Sync + ?Sized),
    ) -> Result<ApiResponse, Error> {
        debug!("POST {url}");
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(body = %serde_json::to_string(body).unwrap_or_default(), "request body");
        }
        let builder = self.authed(self.http.post(url)).json(body);
        send(builder).await
    }

    /// POST and require an accepted envelope.
    pub(crate) async fn post_accepted(
        &self,
        url: Url,
        body: &(impl Serialize + Sync + ?Sized),
    ) -> Result<ApiResponse, Error> {
        self.post(url, body).await?.into_accepted()
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(
            &self.credentials.user_id,
            Some(self.credentials.password.expose_secret()),
        )
    }
}

/// Send a request and normalize the response.
///
/// - non-200 → [`Error::Http`] with the provider's `message` when present
/// - unparseable 200 body → [`Error::Deserialization`]
async fn send<T: DeserializeOwned>(builder: reqwest::RequestBuilder) -> Result<T, Error> {
    let resp = builder.send().await.map_err(Error::Transport)?;
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    if status != reqwest::StatusCode::OK {
        let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
        let (message, response_code) = match parsed {
            Some(ErrorBody {
                message: Some(message),
                response_code,
            }) => (message, response_code),
            Some(ErrorBody { response_code, .. }) => (preview(&body), response_code),
            None => (preview(&body), None),
        };
        return Err(Error::Http {
            status: status.as_u16(),
            message,
            response_code,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| format!("{e} (body preview: {:?})", preview(&body)));
        Error::Deserialization { message, body }
    })
}

fn extract_collection<T: DeserializeOwned>(
    envelope: &mut serde_json::Value,
    collection_key: &str,
) -> Result<Vec<T>, Error> {
    match envelope.get_mut(collection_key).map(serde_json::Value::take) {
        Some(items) => serde_json::from_value(items).map_err(|e| Error::Deserialization {
            message: format!("invalid `{collection_key}` entries: {e}"),
            body: envelope.to_string(),
        }),
        // Empty pages may omit the collection key but keep the counters.
        None if envelope.get("totalCount").is_some() => Ok(Vec::new()),
        None => {
            let message = envelope
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map_or_else(
                    || format!("response has no `{collection_key}` collection"),
                    str::to_owned,
                );
            Err(Error::Deserialization {
                message,
                body: envelope.to_string(),
            })
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn collection_is_extracted_by_key() {
        let mut envelope = json!({ "vlan": [1, 2, 3], "totalCount": 3 });
        let items: Vec<u32> = extract_collection(&mut envelope, "vlan").unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn empty_page_without_key_is_empty() {
        let mut envelope = json!({ "pageNumber": 1, "totalCount": 0 });
        let items: Vec<u32> = extract_collection(&mut envelope, "vlan").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn missing_key_surfaces_provider_message() {
        let mut envelope = json!({ "message": "Unsupported filter" });
        let err = extract_collection::<u32>(&mut envelope, "vlan").unwrap_err();
        assert!(matches!(err, Error::Deserialization { ref message, .. } if message == "Unsupported filter"));
    }

    #[test]
    fn preview_is_bounded() {
        let long = "x".repeat(1000);
        assert_eq!(preview(&long).len(), BODY_PREVIEW);
    }
}
