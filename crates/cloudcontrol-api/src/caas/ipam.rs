// CaaS IP address management endpoints
//
// Public IPv4 blocks are network-domain scoped. Private reservations have
// parallel IPv4 and IPv6 endpoint families, and their list responses are
// keyed `ipv4` / `ipv6`.

use tracing::debug;

use crate::caas::client::{CaasClient, NO_QUERY};
use crate::caas::models::{ApiResponse, IpVersion, PublicIpBlock, ReservedIp};
use crate::caas::requests::{
    AddPublicIpBlock, IdRequest, ReservationScope, ReserveIp, UnreserveIp,
};
use crate::error::Error;

fn reservation_path(action: &str, version: IpVersion) -> String {
    match version {
        IpVersion::Ipv4 => format!("network/{action}PrivateIpv4Address"),
        IpVersion::Ipv6 => format!("network/{action}Ipv6Address"),
    }
}

impl CaasClient {
    // ── Public IPv4 blocks ───────────────────────────────────────────

    /// `GET network/publicIpBlock?networkDomainId=...`
    pub async fn list_public_ip_blocks(
        &self,
        network_domain_id: &str,
    ) -> Result<Vec<PublicIpBlock>, Error> {
        let url = self.url("network/publicIpBlock")?;
        debug!(network_domain = network_domain_id, "listing public ip blocks");
        self.get_collection(url, &[("networkDomainId", network_domain_id)], "publicIpBlock")
            .await
    }

    /// `GET network/publicIpBlock/{id}`
    pub async fn get_public_ip_block(&self, id: &str) -> Result<PublicIpBlock, Error> {
        let url = self.url(&format!("network/publicIpBlock/{id}"))?;
        self.get(url, NO_QUERY).await
    }

    /// `POST network/addPublicIpBlock`; the new block id is `info[0].value`.
    pub async fn add_public_ip_block(&self, network_domain_id: &str) -> Result<ApiResponse, Error> {
        let url = self.url("network/addPublicIpBlock")?;
        debug!(network_domain = network_domain_id, "adding public ip block");
        let body = AddPublicIpBlock {
            network_domain_id: network_domain_id.to_owned(),
        };
        self.post_accepted(url, &body).await
    }

    /// `POST network/removePublicIpBlock`
    pub async fn remove_public_ip_block(&self, id: &str) -> Result<ApiResponse, Error> {
        let url = self.url("network/removePublicIpBlock")?;
        debug!(id, "removing public ip block");
        self.post_accepted(url, &IdRequest { id }).await
    }

    // ── Private reservations ─────────────────────────────────────────

    /// `GET network/reservedPrivateIpv4Address` or `network/reservedIpv6Address`
    pub async fn list_reserved_ips(
        &self,
        scope: &ReservationScope,
        version: IpVersion,
    ) -> Result<Vec<ReservedIp>, Error> {
        let url = self.url(&reservation_path("reserved", version))?;
        let query = match scope {
            ReservationScope::Vlan(id) => [("vlanId", id.as_str())],
            ReservationScope::Datacenter(id) => [("datacenterId", id.as_str())],
        };
        debug!(?scope, %version, "listing reserved ips");
        let key = match version {
            IpVersion::Ipv4 => "ipv4",
            IpVersion::Ipv6 => "ipv6",
        };
        self.get_collection(url, &query, key).await
    }

    /// `POST network/reservePrivateIpv4Address` or `network/reserveIpv6Address`;
    /// the provider echoes the reserved address in `info[0].value`.
    pub async fn reserve_ip(
        &self,
        body: &ReserveIp,
        version: IpVersion,
    ) -> Result<ApiResponse, Error> {
        let url = self.url(&reservation_path("reserve", version))?;
        debug!(vlan = %body.vlan_id, ip = %body.ip_address, "reserving ip");
        self.post_accepted(url, body).await
    }

    /// `POST network/unreservePrivateIpv4Address` or `network/unreserveIpv6Address`
    pub async fn unreserve_ip(
        &self,
        body: &UnreserveIp,
        version: IpVersion,
    ) -> Result<ApiResponse, Error> {
        let url = self.url(&reservation_path("unreserve", version))?;
        debug!(vlan = %body.vlan_id, ip = %body.ip_address, "unreserving ip");
        self.post_accepted(url, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservation_paths_by_family() {
        assert_eq!(
            reservation_path("reserved", IpVersion::Ipv4),
            "network/reservedPrivateIpv4Address"
        );
        assert_eq!(
            reservation_path("unreserve", IpVersion::Ipv6),
            "network/unreserveIpv6Address"
        );
    }
}
