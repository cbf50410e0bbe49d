//! Point sources blurred only by the PSF

use super::common_fields::CommonFields;
use super::header::HeaderRecord;
use super::image_parameters::ImageParameters;
use super::light_source::RenderableSource;
use crate::constants::DEFAULT_STAR_RELATIVE_INTENSITIES;
use crate::error::{RenderError, ValidationError};
use crate::render::LightProfile;

/// A star: a Gaussian PSF image scaled to the star's flux in each band
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    common: CommonFields,
}

impl Default for Star {
    fn default() -> Self {
        Self {
            common: CommonFields::with_defaults(40.0, DEFAULT_STAR_RELATIVE_INTENSITIES),
        }
    }
}

impl Star {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn common_fields(&self) -> &CommonFields {
        &self.common
    }

    /// Place the star relative to the image center
    pub fn offset_arcsec(&mut self, x: f64, y: f64) -> &mut Self {
        self.common.set_offset_from_center_arcsec(x, y);
        self
    }

    pub fn world_coordinates_deg(
        &mut self,
        right_ascension_deg: f64,
        declination_deg: f64,
    ) -> &mut Self {
        self.common
            .set_world_coordinates_deg(right_ascension_deg, declination_deg);
        self
    }

    pub fn reference_band_flux_nmgy(&mut self, flux: f64) -> Result<&mut Self, ValidationError> {
        self.common.set_reference_band_flux_nmgy(flux)?;
        Ok(self)
    }

    pub fn flux_relative_to_reference_band(
        &mut self,
        relative_flux: &[f64],
    ) -> Result<&mut Self, ValidationError> {
        self.common.set_flux_relative_to_reference_band(relative_flux)?;
        Ok(self)
    }
}

impl RenderableSource for Star {
    fn light_profile(
        &self,
        band: usize,
        psf_sigma_deg: f64,
        image_parameters: &ImageParameters,
    ) -> Result<LightProfile, RenderError> {
        let flux = self.common.flux_counts(band)?;
        let (ra, dec) = self.common.world_coordinates_deg(image_parameters);
        Ok(LightProfile::gaussian(flux, psf_sigma_deg).shift(ra, dec))
    }

    fn export_ground_truth(
        &self,
        header: &mut HeaderRecord,
        index_label: &str,
        image_parameters: &ImageParameters,
    ) {
        self.common
            .export_ground_truth(header, index_label, image_parameters, "star");
    }
}
