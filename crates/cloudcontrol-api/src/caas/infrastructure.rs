// CaaS infrastructure and image endpoints
//
// Geography is global and lives on the home-geo host; everything else
// is regional.

use tracing::debug;

use crate::caas::client::{CaasClient, NO_QUERY};
use crate::caas::models::{ApiResponse, Datacenter, GeographicRegion, Image, OperatingSystem};
use crate::caas::requests::{
    DatacenterFilter, GeographicRegionFilter, ImageFilter, ImportImage, OperatingSystemFilter,
};
use crate::error::Error;

impl CaasClient {
    /// `GET {home geo}/infrastructure/geographicRegion`
    pub async fn list_geographic_regions(
        &self,
        filter: &GeographicRegionFilter,
    ) -> Result<Vec<GeographicRegion>, Error> {
        let url = self.home_geo_url("infrastructure/geographicRegion")?;
        debug!(?filter, "listing geographic regions");
        self.get_collection(url, filter, "geographicRegion").await
    }

    /// `GET infrastructure/datacenter`
    pub async fn list_datacenters(
        &self,
        filter: &DatacenterFilter,
    ) -> Result<Vec<Datacenter>, Error> {
        let url = self.url("infrastructure/datacenter")?;
        debug!(?filter, "listing datacenters");
        self.get_collection(url, filter, "datacenter").await
    }

    /// `GET infrastructure/operatingSystem`
    pub async fn list_operating_systems(
        &self,
        filter: &OperatingSystemFilter,
    ) -> Result<Vec<OperatingSystem>, Error> {
        let url = self.url("infrastructure/operatingSystem")?;
        debug!(?filter, "listing operating systems");
        self.get_collection(url, filter, "operatingSystem").await
    }

    /// `GET image/osImage`
    pub async fn list_os_images(&self, filter: &ImageFilter) -> Result<Vec<Image>, Error> {
        let url = self.url("image/osImage")?;
        debug!(?filter, "listing os images");
        self.get_collection(url, filter, "osImage").await
    }

    /// `GET image/customerImage`
    pub async fn list_customer_images(&self, filter: &ImageFilter) -> Result<Vec<Image>, Error> {
        let url = self.url("image/customerImage")?;
        debug!(?filter, "listing customer images");
        self.get_collection(url, filter, "customerImage").await
    }

    /// `GET image/customerImage/{id}`
    pub async fn get_customer_image(&self, id: &str) -> Result<Image, Error> {
        let url = self.url(&format!("image/customerImage/{id}"))?;
        self.get(url, NO_QUERY).await
    }

    /// Import an OVF package from the customer FTPS area.
    ///
    /// `POST image/importImage`
    pub async fn import_image(&self, body: &ImportImage) -> Result<ApiResponse, Error> {
        let url = self.url("image/importImage")?;
        debug!(name = %body.name, package = %body.ovf_package, "importing image");
        self.post_accepted(url, body).await
    }
}
