//! Image geometry and its mapping onto the sky

use shared::ImageSize;

use crate::constants::ARCSEC_PER_DEGREE;
use crate::render::PixelScaleWcs;

/// Dimensions, resolution and world origin of a test image.
///
/// Every derived quantity is computed from the stored fields on each call.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageParameters {
    pub width_px: usize,
    pub height_px: usize,
    /// Defaults to the SDSS pixel scale
    pub arcsec_per_pixel: f64,
    pub origin_right_ascension_arcsec: f64,
    pub origin_declination_arcsec: f64,
}

impl Default for ImageParameters {
    fn default() -> Self {
        Self {
            width_px: 96,
            height_px: 96,
            arcsec_per_pixel: 0.396,
            origin_right_ascension_arcsec: 0.0,
            origin_declination_arcsec: 0.0,
        }
    }
}

impl ImageParameters {
    pub fn degrees_per_pixel(&self) -> f64 {
        self.arcsec_per_pixel / ARCSEC_PER_DEGREE
    }

    /// World coordinates of image position (0, 0), in degrees
    pub fn world_origin_degrees(&self) -> (f64, f64) {
        (
            self.origin_right_ascension_arcsec / ARCSEC_PER_DEGREE,
            self.origin_declination_arcsec / ARCSEC_PER_DEGREE,
        )
    }

    /// Origin plus half the image extent along each axis, in degrees
    pub fn image_center_world_coordinates(&self) -> (f64, f64) {
        let (origin_ra, origin_dec) = self.world_origin_degrees();
        let width_deg = self.width_px as f64 * self.degrees_per_pixel();
        let height_deg = self.height_px as f64 * self.degrees_per_pixel();
        (origin_ra + width_deg / 2.0, origin_dec + height_deg / 2.0)
    }

    pub fn wcs(&self) -> PixelScaleWcs {
        PixelScaleWcs::new(self.degrees_per_pixel(), self.world_origin_degrees())
    }

    pub fn image_size(&self) -> ImageSize {
        ImageSize::from_width_height(self.width_px, self.height_px)
    }
}
