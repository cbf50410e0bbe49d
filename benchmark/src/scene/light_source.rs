//! Capabilities every light source provides to a test case

use super::galaxy::Galaxy;
use super::header::HeaderRecord;
use super::image_parameters::ImageParameters;
use super::star::Star;
use crate::error::RenderError;
use crate::render::LightProfile;

/// A source that can be rendered into a band image and described in the
/// ground-truth header
pub trait RenderableSource {
    /// Light profile for one band, already convolved with a Gaussian PSF.
    ///
    /// # Arguments
    /// * `band` - Zero-based band index
    /// * `psf_sigma_deg` - PSF standard deviation in degrees
    /// * `image_parameters` - Image the source is placed in, used to resolve its position
    fn light_profile(
        &self,
        band: usize,
        psf_sigma_deg: f64,
        image_parameters: &ImageParameters,
    ) -> Result<LightProfile, RenderError>;

    /// Append this source's ground-truth cards, suffixing each key with `index_label`
    fn export_ground_truth(
        &self,
        header: &mut HeaderRecord,
        index_label: &str,
        image_parameters: &ImageParameters,
    );
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightSource {
    Star(Star),
    Galaxy(Galaxy),
}

impl LightSource {
    pub fn kind_label(&self) -> &'static str {
        match self {
            LightSource::Star(_) => "star",
            LightSource::Galaxy(_) => "galaxy",
        }
    }

    fn as_renderable(&self) -> &dyn RenderableSource {
        match self {
            LightSource::Star(star) => star,
            LightSource::Galaxy(galaxy) => galaxy,
        }
    }
}

impl RenderableSource for LightSource {
    fn light_profile(
        &self,
        band: usize,
        psf_sigma_deg: f64,
        image_parameters: &ImageParameters,
    ) -> Result<LightProfile, RenderError> {
        self.as_renderable()
            .light_profile(band, psf_sigma_deg, image_parameters)
    }

    fn export_ground_truth(
        &self,
        header: &mut HeaderRecord,
        index_label: &str,
        image_parameters: &ImageParameters,
    ) {
        self.as_renderable()
            .export_ground_truth(header, index_label, image_parameters)
    }
}
