// IP address management: public IPv4 blocks and private reservations.

use std::net::IpAddr;

use tracing::{debug, info};

use cloudcontrol_api::caas::models::{IpVersion, PublicIpBlock, ReservedIp};
use cloudcontrol_api::caas::requests::{ReservationScope, ReserveIp as ReserveIpBody, UnreserveIp};

use super::{Applied, optional, required};
use crate::error::CoreError;
use crate::requests::ReserveIp;
use crate::session::Session;

const BLOCK_KIND: &str = "public IP block";

impl Session {
    // ── Public IPv4 blocks ───────────────────────────────────────────

    pub async fn list_public_ip_blocks(
        &self,
        network_domain_id: &str,
    ) -> Result<Vec<PublicIpBlock>, CoreError> {
        Ok(self.client().list_public_ip_blocks(network_domain_id).await?)
    }

    pub async fn get_public_ip_block(&self, id: &str) -> Result<PublicIpBlock, CoreError> {
        required(self.client().get_public_ip_block(id).await, BLOCK_KIND, id)
    }

    /// Add a block to the domain. Blocks are not named, so this always
    /// allocates.
    pub async fn add_public_ip_block(
        &self,
        network_domain_id: &str,
    ) -> Result<Applied<PublicIpBlock>, CoreError> {
        let resp = self.client().add_public_ip_block(network_domain_id).await?;
        let id = resp.created_id()?;
        info!(id = %id, network_domain = network_domain_id, "public IP block added");

        let block = self.get_public_ip_block(&id).await?;
        Ok(Applied::submitted(&resp, block))
    }

    pub async fn remove_public_ip_block(
        &self,
        id: &str,
    ) -> Result<Applied<Option<PublicIpBlock>>, CoreError> {
        let Some(current) = optional(self.client().get_public_ip_block(id).await)? else {
            debug!(id, "public IP block already absent");
            return Ok(Applied::unchanged(None));
        };
        let resp = self.client().remove_public_ip_block(id).await?;
        info!(id, base_ip = %current.base_ip, "public IP block removed");
        Ok(Applied::submitted(&resp, Some(current)))
    }

    // ── Private reservations ─────────────────────────────────────────

    pub async fn list_reserved_ips(
        &self,
        scope: &ReservationScope,
        version: IpVersion,
    ) -> Result<Vec<ReservedIp>, CoreError> {
        Ok(self.client().list_reserved_ips(scope, version).await?)
    }

    /// Reserve an address on a VLAN. The provider echoes the reserved
    /// address back; anything else is treated as a failed reservation.
    pub async fn reserve_ip(&self, req: &ReserveIp) -> Result<Applied<String>, CoreError> {
        check_family(&req.ip_address, req.version)?;
        if self.is_reserved(&req.vlan_id, &req.ip_address, req.version).await? {
            debug!(ip = %req.ip_address, vlan = %req.vlan_id, "address already reserved");
            return Ok(Applied::unchanged(req.ip_address.clone()));
        }

        let body = ReserveIpBody {
            vlan_id: req.vlan_id.clone(),
            ip_address: req.ip_address.clone(),
            description: req.description.clone(),
        };
        let resp = self.client().reserve_ip(&body, req.version).await?;
        let echoed = resp.created_id()?;
        if echoed != req.ip_address {
            return Err(CoreError::ProviderRejected {
                operation: resp.operation.clone().unwrap_or_else(|| "RESERVE_IP".into()),
                response_code: resp.response_code.clone().unwrap_or_else(|| "OK".into()),
                message: format!(
                    "reservation of {} was confirmed for {echoed}",
                    req.ip_address
                ),
            });
        }
        info!(ip = %echoed, vlan = %req.vlan_id, "address reserved");
        Ok(Applied::submitted(&resp, echoed))
    }

    pub async fn unreserve_ip(
        &self,
        vlan_id: &str,
        ip_address: &str,
        version: IpVersion,
    ) -> Result<Applied<String>, CoreError> {
        check_family(ip_address, version)?;
        if !self.is_reserved(vlan_id, ip_address, version).await? {
            debug!(ip = ip_address, vlan = vlan_id, "address not reserved");
            return Ok(Applied::unchanged(ip_address.to_owned()));
        }

        let body = UnreserveIp {
            vlan_id: vlan_id.to_owned(),
            ip_address: ip_address.to_owned(),
        };
        let resp = self.client().unreserve_ip(&body, version).await?;
        info!(ip = ip_address, vlan = vlan_id, "address unreserved");
        Ok(Applied::submitted(&resp, ip_address.to_owned()))
    }

    async fn is_reserved(
        &self,
        vlan_id: &str,
        ip_address: &str,
        version: IpVersion,
    ) -> Result<bool, CoreError> {
        let scope = ReservationScope::Vlan(vlan_id.to_owned());
        let reserved = self.client().list_reserved_ips(&scope, version).await?;
        Ok(reserved.iter().any(|r| r.ip_address == ip_address))
    }
}

fn check_family(raw: &str, version: IpVersion) -> Result<(), CoreError> {
    let matches = match raw.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => version == IpVersion::Ipv4,
        Ok(IpAddr::V6(_)) => version == IpVersion::Ipv6,
        Err(_) => {
            return Err(CoreError::validation(format!(
                "'{raw}' is not an IP address"
            )));
        }
    };
    if !matches {
        return Err(CoreError::validation(format!(
            "{raw} is not an IPv{} address",
            version.number()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservation_family_must_match() {
        assert!(check_family("10.0.0.10", IpVersion::Ipv4).is_ok());
        assert!(check_family("2001:db8::10", IpVersion::Ipv4).is_err());
        assert!(check_family("2001:db8::10", IpVersion::Ipv6).is_ok());
        assert!(check_family("host", IpVersion::Ipv6).is_err());
    }
}
