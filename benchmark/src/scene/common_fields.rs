//! Position, brightness and color shared by every kind of light source

use super::header::HeaderRecord;
use super::image_parameters::ImageParameters;
use super::position::Position;
use crate::constants::{
    ARCSEC_PER_DEGREE, COUNTS_PER_NMGY, DEFAULT_GALAXY_RELATIVE_INTENSITIES, NUM_BANDS,
    REFERENCE_BAND_INDEX,
};
use crate::error::{RenderError, ValidationError};

/// Fields common to stars and galaxies.
///
/// The relative flux vector fixes the source's color: entry `b` is the flux in
/// band `b` divided by the flux in the reference band, so the reference entry
/// is always exactly 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonFields {
    pub position: Position,
    reference_band_flux_nmgy: f64,
    flux_relative_to_reference_band: [f64; NUM_BANDS],
}

impl Default for CommonFields {
    fn default() -> Self {
        Self::with_defaults(40.0, DEFAULT_GALAXY_RELATIVE_INTENSITIES)
    }
}

impl CommonFields {
    /// Centered fields with a built-in brightness and color prior
    pub(crate) fn with_defaults(reference_band_flux_nmgy: f64, prior: [f64; NUM_BANDS]) -> Self {
        debug_assert_eq!(prior[REFERENCE_BAND_INDEX], 1.0);
        Self {
            position: Position::default(),
            reference_band_flux_nmgy,
            flux_relative_to_reference_band: prior,
        }
    }

    pub fn reference_band_flux_nmgy(&self) -> f64 {
        self.reference_band_flux_nmgy
    }

    /// Set the reference-band brightness; must be positive and finite
    pub fn set_reference_band_flux_nmgy(&mut self, flux: f64) -> Result<(), ValidationError> {
        if !(flux.is_finite() && flux > 0.0) {
            return Err(ValidationError::OutOfRange {
                parameter: "reference band flux",
                expected: "positive and finite",
                value: flux,
            });
        }
        self.reference_band_flux_nmgy = flux;
        Ok(())
    }

    pub fn flux_relative_to_reference_band(&self) -> &[f64; NUM_BANDS] {
        &self.flux_relative_to_reference_band
    }

    /// Replace the color vector.
    ///
    /// # Arguments
    /// * `relative_flux` - One positive entry per band, with the reference band exactly 1
    pub fn set_flux_relative_to_reference_band(
        &mut self,
        relative_flux: &[f64],
    ) -> Result<(), ValidationError> {
        let relative_flux: [f64; NUM_BANDS] =
            relative_flux
                .try_into()
                .map_err(|_| ValidationError::WrongBandCount {
                    expected: NUM_BANDS,
                    actual: relative_flux.len(),
                })?;
        let reference = relative_flux[REFERENCE_BAND_INDEX];
        if reference != 1.0 {
            return Err(ValidationError::ReferenceBandNotUnity {
                band: REFERENCE_BAND_INDEX,
                value: reference,
            });
        }
        // Zero entries would make a color ratio infinite
        if let Some(&value) = relative_flux
            .iter()
            .find(|value| !(value.is_finite() && **value > 0.0))
        {
            return Err(ValidationError::OutOfRange {
                parameter: "relative flux",
                expected: "positive and finite",
                value,
            });
        }
        self.flux_relative_to_reference_band = relative_flux;
        Ok(())
    }

    /// Total flux in detector counts for one band
    pub fn flux_counts(&self, band: usize) -> Result<f64, RenderError> {
        let relative = self
            .flux_relative_to_reference_band
            .get(band)
            .ok_or(RenderError::BandOutOfRange(band))?;
        Ok(self.reference_band_flux_nmgy * relative * COUNTS_PER_NMGY)
    }

    pub fn set_offset_from_center_arcsec(&mut self, x_offset_arcsec: f64, y_offset_arcsec: f64) {
        self.position = Position::OffsetFromCenter {
            x_offset_deg: x_offset_arcsec / ARCSEC_PER_DEGREE,
            y_offset_deg: y_offset_arcsec / ARCSEC_PER_DEGREE,
        };
    }

    pub fn set_world_coordinates_deg(&mut self, right_ascension_deg: f64, declination_deg: f64) {
        self.position = Position::Absolute {
            right_ascension_deg,
            declination_deg,
        };
    }

    pub fn world_coordinates_deg(&self, image_parameters: &ImageParameters) -> (f64, f64) {
        self.position.resolve(image_parameters)
    }

    /// Write position, brightness and color cards for the source labelled `index_label`.
    ///
    /// The color cards keep their historical definitions: CLC12 and CLC45 are
    /// ratios of adjacent bands, CLC23 is the reciprocal of band 2 and CLC34 is
    /// band 4 itself (both relative to the reference band).
    pub fn export_ground_truth(
        &self,
        header: &mut HeaderRecord,
        index_label: &str,
        image_parameters: &ImageParameters,
        kind_label: &str,
    ) {
        let (ra, dec) = self.world_coordinates_deg(image_parameters);
        let relative = &self.flux_relative_to_reference_band;

        header.set(format!("CLRA{index_label}"), ra, "Center right ascension, deg");
        header.set(format!("CLDEC{index_label}"), dec, "Center declination, deg");
        header.set(
            format!("CLFLX{index_label}"),
            self.reference_band_flux_nmgy,
            "reference (=3) band brightness (nMgy)",
        );
        header.set(
            format!("CLC12{index_label}"),
            relative[1] / relative[0],
            "ratio of flux in band 2 to band 1",
        );
        header.set(
            format!("CLC23{index_label}"),
            1.0 / relative[1],
            "ratio of flux in band 3 to band 2",
        );
        header.set(
            format!("CLC34{index_label}"),
            relative[3],
            "ratio of flux in band 4 to band 3",
        );
        header.set(
            format!("CLC45{index_label}"),
            relative[4] / relative[3],
            "ratio of flux in band 5 to band 4",
        );
        header.set(
            format!("CLTYP{index_label}"),
            kind_label,
            "\"star\" or \"galaxy\"?",
        );
    }
}
