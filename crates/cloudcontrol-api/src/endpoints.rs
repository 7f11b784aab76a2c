// Resource-path builder
//
// Turns `{region, org id, home-geo host}` into the URL prefixes every
// request is built from. Pure: no I/O happens here.
//
//   identity : {scheme}://{default-region host}/caas/{version}/user/myUser
//   regional : {scheme}://{region host}/caas/{version}/{org id}/
//   home geo : {scheme}://{home-geo host}/caas/{version}/{org id}/

use url::Url;

use crate::error::Error;
use crate::region::{API_VERSION, Region};

/// Hosts known before the identity lookup has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiHosts {
    scheme: String,
    identity_host: String,
    regional_host: String,
}

impl ApiHosts {
    /// Public HTTPS endpoints for a region. The identity lookup always
    /// goes to the default region's host.
    pub fn for_region(region: &Region) -> Self {
        Self {
            scheme: "https".into(),
            identity_host: Region::default_region().host.into(),
            regional_host: region.host.into(),
        }
    }

    /// Route every request to a single base URL (scheme + host + port).
    ///
    /// Used for test servers and API gateways that front all regions.
    pub fn single(base: &Url) -> Result<Self, Error> {
        let authority = authority(base)?;
        Ok(Self {
            scheme: base.scheme().into(),
            identity_host: authority.clone(),
            regional_host: authority,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn regional_host(&self) -> &str {
        &self.regional_host
    }

    /// `GET` target of the identity lookup.
    pub fn identity_url(&self) -> Result<Url, Error> {
        let raw = format!(
            "{}://{}/caas/{API_VERSION}/user/myUser",
            self.scheme, self.identity_host
        );
        Ok(Url::parse(&raw)?)
    }

    /// Combine with the identity lookup results into session endpoints.
    pub fn resolve(&self, org_id: &str, home_geo_host: &str) -> Result<Endpoints, Error> {
        Ok(Endpoints {
            regional_base: base_url(&self.scheme, &self.regional_host, org_id)?,
            home_geo_base: base_url(&self.scheme, home_geo_host, org_id)?,
            org_id: org_id.into(),
        })
    }
}

/// URL prefixes for a bootstrapped session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    regional_base: Url,
    home_geo_base: Url,
    org_id: String,
}

impl Endpoints {
    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    pub fn regional_base(&self) -> &Url {
        &self.regional_base
    }

    pub fn home_geo_base(&self) -> &Url {
        &self.home_geo_base
    }

    /// `{regional base}{path}`, e.g. `network/deployVlan`.
    pub fn regional(&self, path: &str) -> Result<Url, Error> {
        Ok(self.regional_base.join(path.trim_start_matches('/'))?)
    }

    /// `{home-geo base}{path}`; only geography listing lives here.
    pub fn home_geo(&self, path: &str) -> Result<Url, Error> {
        Ok(self.home_geo_base.join(path.trim_start_matches('/'))?)
    }
}

fn base_url(scheme: &str, host: &str, org_id: &str) -> Result<Url, Error> {
    let raw = format!("{scheme}://{host}/caas/{API_VERSION}/{org_id}/");
    Ok(Url::parse(&raw)?)
}

fn authority(url: &Url) -> Result<String, Error> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::InvalidUrl(url::ParseError::EmptyHost))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn identity_url_uses_default_region() {
        let hosts = ApiHosts::for_region(Region::lookup("eu").unwrap());
        assert_eq!(
            hosts.identity_url().unwrap().as_str(),
            "https://api-na.dimensiondata.com/caas/2.8/user/myUser"
        );
    }

    #[test]
    fn regional_and_home_geo_bases() {
        let hosts = ApiHosts::for_region(Region::lookup("eu").unwrap());
        let endpoints = hosts.resolve("org-1", "api-na.dimensiondata.com").unwrap();

        assert_eq!(
            endpoints.regional("network/vlan").unwrap().as_str(),
            "https://api-eu.dimensiondata.com/caas/2.8/org-1/network/vlan"
        );
        assert_eq!(
            endpoints
                .home_geo("infrastructure/geographicRegion")
                .unwrap()
                .as_str(),
            "https://api-na.dimensiondata.com/caas/2.8/org-1/infrastructure/geographicRegion"
        );
        assert_eq!(endpoints.org_id(), "org-1");
    }

    #[test]
    fn single_base_keeps_port_and_scheme() {
        let base = Url::parse("http://127.0.0.1:8089").unwrap();
        let hosts = ApiHosts::single(&base).unwrap();
        assert_eq!(
            hosts.identity_url().unwrap().as_str(),
            "http://127.0.0.1:8089/caas/2.8/user/myUser"
        );
        let endpoints = hosts.resolve("o", "127.0.0.1:8089").unwrap();
        assert_eq!(
            endpoints.regional("/server/server").unwrap().as_str(),
            "http://127.0.0.1:8089/caas/2.8/o/server/server"
        );
    }
}
