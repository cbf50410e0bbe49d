//! Extended sources: an exponential disk plus a de Vaucouleurs bulge
//!
//! Both components share the galaxy's center, half-light radius, axis ratio
//! and orientation. The de Vaucouleurs mixture weight splits the band flux
//! between them, and the combined light is convolved once with the Gaussian PSF.

use super::common_fields::CommonFields;
use super::header::HeaderRecord;
use super::image_parameters::ImageParameters;
use super::light_source::RenderableSource;
use crate::constants::{ARCSEC_PER_DEGREE, DEFAULT_GALAXY_RELATIVE_INTENSITIES};
use crate::error::{RenderError, ValidationError};
use crate::render::LightProfile;

#[derive(Debug, Clone, PartialEq)]
pub struct Galaxy {
    common: CommonFields,
    angle_deg: f64,
    minor_major_axis_ratio: f64,
    half_light_radius_arcsec: f64,
    de_vaucouleurs_mixture_weight: f64,
}

impl Default for Galaxy {
    fn default() -> Self {
        Self {
            common: CommonFields::with_defaults(10.0, DEFAULT_GALAXY_RELATIVE_INTENSITIES),
            angle_deg: 0.0,
            minor_major_axis_ratio: 0.4,
            half_light_radius_arcsec: 1.5,
            de_vaucouleurs_mixture_weight: 0.0,
        }
    }
}

fn out_of_range(parameter: &'static str, expected: &'static str, value: f64) -> ValidationError {
    ValidationError::OutOfRange {
        parameter,
        expected,
        value,
    }
}

impl Galaxy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn common_fields(&self) -> &CommonFields {
        &self.common
    }

    pub fn angle(&self) -> f64 {
        self.angle_deg
    }

    pub fn axis_ratio(&self) -> f64 {
        self.minor_major_axis_ratio
    }

    pub fn half_light_radius(&self) -> f64 {
        self.half_light_radius_arcsec
    }

    pub fn mixture_weight(&self) -> f64 {
        self.de_vaucouleurs_mixture_weight
    }

    /// Place the galaxy relative to the image center
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

    /// Major axis angle, degrees counter-clockwise from the x axis
    pub fn angle_deg(&mut self, angle: f64) -> &mut Self {
        self.angle_deg = angle;
        self
    }

    /// Minor/major axis ratio in (0, 1]
    pub fn minor_major_axis_ratio(&mut self, ratio: f64) -> Result<&mut Self, ValidationError> {
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(out_of_range("minor/major axis ratio", "in (0, 1]", ratio));
        }
        self.minor_major_axis_ratio = ratio;
        Ok(self)
    }

    pub fn half_light_radius_arcsec(&mut self, radius: f64) -> Result<&mut Self, ValidationError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(out_of_range("half-light radius", "positive and finite", radius));
        }
        self.half_light_radius_arcsec = radius;
        Ok(self)
    }

    /// Fraction of the flux in the de Vaucouleurs component, in [0, 1]
    pub fn de_vaucouleurs_mixture_weight(
        &mut self,
        weight: f64,
    ) -> Result<&mut Self, ValidationError> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(out_of_range("de Vaucouleurs mixture weight", "in [0, 1]", weight));
        }
        self.de_vaucouleurs_mixture_weight = weight;
        Ok(self)
    }
}

impl RenderableSource for Galaxy {
    fn light_profile(
        &self,
        band: usize,
        psf_sigma_deg: f64,
        image_parameters: &ImageParameters,
    ) -> Result<LightProfile, RenderError> {
        let flux = self.common.flux_counts(band)?;
        let (ra, dec) = self.common.world_coordinates_deg(image_parameters);
        let half_light_radius_deg = self.half_light_radius_arcsec / ARCSEC_PER_DEGREE;
        let weight = self.de_vaucouleurs_mixture_weight;

        let shape = |profile: LightProfile| {
            profile
                .shear(self.minor_major_axis_ratio, self.angle_deg)
                .shift(ra, dec)
        };
        let disk = shape(LightProfile::exponential(
            flux * (1.0 - weight),
            half_light_radius_deg,
        ));
        let bulge = shape(LightProfile::de_vaucouleurs(
            flux * weight,
            half_light_radius_deg,
        ));
        let psf = LightProfile::gaussian(1.0, psf_sigma_deg);

        Ok((disk + bulge).convolve(psf))
    }

    fn export_ground_truth(
        &self,
        header: &mut HeaderRecord,
        index_label: &str,
        image_parameters: &ImageParameters,
    ) {
        self.common
            .export_ground_truth(header, index_label, image_parameters, "galaxy");
        header.set(
            format!("CLANG{index_label}"),
            self.angle_deg,
            "major axis angle (degrees from x-axis)",
        );
        header.set(
            format!("CLRTO{index_label}"),
            self.minor_major_axis_ratio,
            "minor/major axis ratio",
        );
        header.set(
            format!("CLRDA{index_label}"),
            self.half_light_radius_arcsec,
            "half-light radius (arcsec)",
        );
        header.set(
            format!("CLRDP{index_label}"),
            self.half_light_radius_arcsec / image_parameters.arcsec_per_pixel,
            "half-light radius (pixels)",
        );
        header.set(
            format!("CLDEV{index_label}"),
            self.de_vaucouleurs_mixture_weight,
            "de Vaucouleurs mixture weight",
        );
    }
}
