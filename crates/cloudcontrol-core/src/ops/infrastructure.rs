// Infrastructure and image queries.

use tracing::info;

use cloudcontrol_api::caas::models::{Datacenter, GeographicRegion, Image, OperatingSystem};
use cloudcontrol_api::caas::requests::{
    DatacenterFilter, GeographicRegionFilter, ImageFilter, ImportImage, OperatingSystemFilter,
};

use super::{Applied, required};
use crate::error::CoreError;
use crate::session::Session;
use crate::validate;

impl Session {
    /// Regions visible to the account, read from the home geo.
    pub async fn list_geographic_regions(
        &self,
        filter: &GeographicRegionFilter,
    ) -> Result<Vec<GeographicRegion>, CoreError> {
        Ok(self.client().list_geographic_regions(filter).await?)
    }

    pub async fn list_datacenters(
        &self,
        filter: &DatacenterFilter,
    ) -> Result<Vec<Datacenter>, CoreError> {
        Ok(self.client().list_datacenters(filter).await?)
    }

    pub async fn list_operating_systems(
        &self,
        filter: &OperatingSystemFilter,
    ) -> Result<Vec<OperatingSystem>, CoreError> {
        Ok(self.client().list_operating_systems(filter).await?)
    }

    pub async fn list_os_images(&self, filter: &ImageFilter) -> Result<Vec<Image>, CoreError> {
        Ok(self.client().list_os_images(filter).await?)
    }

    pub async fn list_customer_images(&self, filter: &ImageFilter) -> Result<Vec<Image>, CoreError> {
        Ok(self.client().list_customer_images(filter).await?)
    }

    pub async fn get_customer_image(&self, id: &str) -> Result<Image, CoreError> {
        required(self.client().get_customer_image(id).await, "customer image", id)
    }

    /// An image called `name` in a datacenter: provider OS images first,
    /// then customer images.
    pub async fn find_image(
        &self,
        datacenter_id: &str,
        name: &str,
    ) -> Result<Option<Image>, CoreError> {
        let filter = ImageFilter {
            datacenter_id: Some(datacenter_id.to_owned()),
            name: Some(name.to_owned()),
            ..ImageFilter::default()
        };
        let os = self.client().list_os_images(&filter).await?;
        if let Some(image) = os.into_iter().find(|i| i.name == name) {
            return Ok(Some(image));
        }
        let customer = self.client().list_customer_images(&filter).await?;
        Ok(customer.into_iter().find(|i| i.name == name))
    }

    /// Import an OVF package as a customer image.
    pub async fn import_image(&self, req: &ImportImage) -> Result<Applied<Image>, CoreError> {
        validate::name("image", &req.name)?;
        if req.ovf_package.trim().is_empty() {
            return Err(CoreError::validation("an OVF package name is required"));
        }
        let resp = self.client().import_image(req).await?;
        let id = resp.created_id()?;
        info!(id = %id, name = %req.name, datacenter = %req.datacenter_id, "image import accepted");

        let image = self.get_customer_image(&id).await?;
        Ok(Applied::submitted(&resp, image))
    }
}
