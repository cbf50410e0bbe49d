//! A complete synthetic test image description
//!
//! A [`GalSimTestCase`] starts from defaults, is configured by a catalog
//! function (dimensions, sky, PSF and an ordered list of light sources) and
//! can then be rendered per band and exported as ground-truth header cards any
//! number of times. Rendering never mutates the case; all randomness comes
//! from the [`RandomStream`] passed in.

use log::debug;

use super::galaxy::Galaxy;
use super::header::HeaderRecord;
use super::image_parameters::ImageParameters;
use super::light_source::{LightSource, RenderableSource};
use super::star::Star;
use crate::constants::{COUNTS_PER_NMGY, MAX_LIGHT_SOURCES, NUM_BANDS};
use crate::error::{ConfigurationError, RenderError};
use crate::render::{PixelGrid, RandomStream};

#[derive(Debug, Clone, PartialEq)]
pub struct GalSimTestCase {
    light_sources: Vec<LightSource>,
    image_parameters: ImageParameters,
    /// Gaussian PSF standard deviation in pixels
    pub psf_sigma_pixels: f64,
    /// Sky brightness per pixel, in nanomaggies
    pub sky_level_nmgy: f64,
    /// Replace the flat sky with a Poisson realization of it
    pub include_noise: bool,
    pub comment: Option<String>,
}

impl Default for GalSimTestCase {
    fn default() -> Self {
        Self {
            light_sources: Vec::new(),
            image_parameters: ImageParameters::default(),
            psf_sigma_pixels: 4.0,
            sky_level_nmgy: 0.01,
            include_noise: false,
            comment: None,
        }
    }
}

impl GalSimTestCase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_parameters(&self) -> &ImageParameters {
        &self.image_parameters
    }

    pub fn light_sources(&self) -> &[LightSource] {
        &self.light_sources
    }

    pub fn set_dimensions(&mut self, width_px: usize, height_px: usize) {
        self.image_parameters.width_px = width_px;
        self.image_parameters.height_px = height_px;
    }

    pub fn set_resolution(&mut self, arcsec_per_pixel: f64) {
        self.image_parameters.arcsec_per_pixel = arcsec_per_pixel;
    }

    /// Arcseconds per pixel
    pub fn resolution(&self) -> f64 {
        self.image_parameters.arcsec_per_pixel
    }

    pub fn set_world_origin(&mut self, right_ascension_arcsec: f64, declination_arcsec: f64) {
        self.image_parameters.origin_right_ascension_arcsec = right_ascension_arcsec;
        self.image_parameters.origin_declination_arcsec = declination_arcsec;
    }

    pub fn set_psf_sigma_pixels(&mut self, sigma: f64) {
        self.psf_sigma_pixels = sigma;
    }

    pub fn set_sky_level_nmgy(&mut self, sky_level: f64) {
        self.sky_level_nmgy = sky_level;
    }

    pub fn set_include_noise(&mut self, include_noise: bool) {
        self.include_noise = include_noise;
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    /// Append a default star and return it for configuration
    pub fn add_star(&mut self) -> &mut Star {
        self.light_sources.push(LightSource::Star(Star::new()));
        match self.light_sources.last_mut() {
            Some(LightSource::Star(star)) => star,
            _ => unreachable!("a star was just appended"),
        }
    }

    /// Append a default galaxy and return it for configuration
    pub fn add_galaxy(&mut self) -> &mut Galaxy {
        self.light_sources.push(LightSource::Galaxy(Galaxy::new()));
        match self.light_sources.last_mut() {
            Some(LightSource::Galaxy(galaxy)) => galaxy,
            _ => unreachable!("a galaxy was just appended"),
        }
    }

    /// Render one band: every source in insertion order, then the sky.
    ///
    /// Sources are photon-shot with enough photons that shot noise adds at most
    /// `sky counts / 1000` of variance to the brightest pixel. The sky is a flat
    /// `sky_level_nmgy * COUNTS_PER_NMGY` per pixel, or a Poisson draw with that
    /// mean in every pixel when noise is enabled.
    pub fn render_band(
        &self,
        band: usize,
        stream: &mut RandomStream,
    ) -> Result<PixelGrid, RenderError> {
        if band >= NUM_BANDS {
            return Err(RenderError::BandOutOfRange(band));
        }

        let params = &self.image_parameters;
        let mut grid = PixelGrid::new(params.image_size(), params.wcs());
        let psf_sigma_deg = self.psf_sigma_pixels * params.degrees_per_pixel();
        let sky_level_counts = self.sky_level_nmgy * COUNTS_PER_NMGY;
        let max_extra_noise = sky_level_counts / 1000.0;

        for (index, source) in self.light_sources.iter().enumerate() {
            let profile = source.light_profile(band, psf_sigma_deg, params)?;
            let summary = profile.draw_photons(&mut grid, stream, max_extra_noise)?;
            debug!(
                "Band {} source {} ({}): {}/{} photons on image, {:.4} counts each",
                band + 1,
                index + 1,
                source.kind_label(),
                summary.landed,
                summary.shot,
                summary.photon_flux
            );
        }

        if self.include_noise {
            grid.add_poisson_noise(sky_level_counts, stream)?;
        } else {
            grid.add_constant(sky_level_counts)?;
        }
        Ok(grid)
    }

    /// Ground-truth cards for one band image of this case.
    ///
    /// Case-level cards come first, followed by each source's cards keyed with
    /// its zero-padded 1-based index.
    ///
    /// # Arguments
    /// * `case_index` - Zero-based position of this case in the batch
    /// * `band` - Zero-based band index
    pub fn export_ground_truth_header(
        &self,
        case_index: usize,
        band: usize,
    ) -> Result<HeaderRecord, ConfigurationError> {
        // Keys are at most 8 characters, leaving room for a three-digit index
        if self.light_sources.len() > MAX_LIGHT_SOURCES {
            return Err(ConfigurationError::TooManySources {
                count: self.light_sources.len(),
                max: MAX_LIGHT_SOURCES,
            });
        }

        let params = &self.image_parameters;
        let mut header = HeaderRecord::new();
        header.set("CLCASEI", case_index + 1, "test case index");
        header.set("CLDESCR", self.comment.as_deref(), "comment");
        header.set("CLIOTA", COUNTS_PER_NMGY, "counts per nMgy");
        header.set(
            "CLSKY",
            self.sky_level_nmgy,
            "\"epsilon\" sky level (nMgy each px)",
        );
        header.set("CLNOISE", self.include_noise, "was Poisson noise added?");
        header.set("CLSIGMA", self.psf_sigma_pixels, "Gaussian PSF sigma (px)");
        header.set("CLBAND", band + 1, "color band");
        header.set("CLNSRC", self.light_sources.len(), "number of sources");
        header.set(
            "CLRES",
            params.degrees_per_pixel(),
            "resolution (degrees/px)",
        );

        for (index, source) in self.light_sources.iter().enumerate() {
            let index_label = format!("{:03}", index + 1);
            source.export_ground_truth(&mut header, &index_label, params);
        }
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shared::fits::HeaderValue;

    fn single_star_case() -> GalSimTestCase {
        let mut case = GalSimTestCase::new();
        case.add_star();
        case
    }

    #[test]
    fn test_defaults() {
        let case = GalSimTestCase::new();
        assert!(case.light_sources().is_empty());
        assert_eq!(case.psf_sigma_pixels, 4.0);
        assert_eq!(case.sky_level_nmgy, 0.01);
        assert!(!case.include_noise);
        assert_eq!(case.comment, None);
        assert_eq!(case.resolution(), 0.396);
    }

    #[test]
    fn test_sources_keep_insertion_order() -> Result<(), crate::error::ValidationError> {
        let mut case = GalSimTestCase::new();
        case.add_galaxy().angle_deg(15.0);
        case.add_star().reference_band_flux_nmgy(2.0)?;
        case.add_galaxy();

        let kinds: Vec<_> = case.light_sources().iter().map(|s| s.kind_label()).collect();
        assert_eq!(kinds, vec!["galaxy", "star", "galaxy"]);

        let header = case.export_ground_truth_header(0, 0).unwrap();
        assert_eq!(header.get("CLTYP002"), Some(&HeaderValue::Text("star".into())));
        assert_eq!(header.get("CLANG001"), Some(&HeaderValue::Real(15.0)));
        assert_eq!(header.get("CLNSRC"), Some(&HeaderValue::Integer(3)));
        Ok(())
    }

    #[test]
    fn test_case_level_header() {
        let mut case = single_star_case();
        case.set_comment("one star");
        case.set_include_noise(true);
        let header = case.export_ground_truth_header(4, 2).unwrap();

        let keys: Vec<_> = header.keys().take(9).collect();
        assert_eq!(
            keys,
            vec![
                "CLCASEI", "CLDESCR", "CLIOTA", "CLSKY", "CLNOISE", "CLSIGMA", "CLBAND", "CLNSRC",
                "CLRES"
            ]
        );
        assert_eq!(header.get("CLCASEI"), Some(&HeaderValue::Integer(5)));
        assert_eq!(header.get("CLBAND"), Some(&HeaderValue::Integer(3)));
        assert_eq!(
            header.get("CLDESCR"),
            Some(&HeaderValue::Text("one star".into()))
        );
        assert_eq!(header.get("CLNOISE"), Some(&HeaderValue::Logical(true)));
        assert_eq!(header.get("CLIOTA"), Some(&HeaderValue::Real(1000.0)));
        // Sigma is fractional-capable, so even the default is a real
        assert_eq!(header.get("CLSIGMA"), Some(&HeaderValue::Real(4.0)));
        assert_eq!(header.len(), 9 + 8);
    }

    #[test]
    fn test_missing_comment_is_undefined() {
        let header = GalSimTestCase::new().export_ground_truth_header(0, 0).unwrap();
        assert_eq!(header.get("CLDESCR"), Some(&HeaderValue::Undefined));
    }

    #[test]
    fn test_header_export_is_idempotent() {
        let mut case = single_star_case();
        case.add_galaxy().offset_arcsec(1.0, 1.0);
        assert_eq!(
            case.export_ground_truth_header(1, 3).unwrap(),
            case.export_ground_truth_header(1, 3).unwrap()
        );
    }

    #[test]
    fn test_source_limit_enforced_at_export() {
        let mut case = GalSimTestCase::new();
        for _ in 0..MAX_LIGHT_SOURCES {
            case.add_star();
        }
        let header = case.export_ground_truth_header(0, 0).unwrap();
        assert!(header.get("CLRA999").is_some());

        case.add_star();
        assert_eq!(
            case.export_ground_truth_header(0, 0),
            Err(ConfigurationError::TooManySources {
                count: 1000,
                max: 999
            })
        );
    }

    #[test]
    fn test_offset_resolved_against_current_dimensions() {
        let mut case = single_star_case();
        case.set_dimensions(200, 100);
        case.set_resolution(3.6);
        let header = case.export_ground_truth_header(0, 0).unwrap();
        match (header.get("CLRA001"), header.get("CLDEC001")) {
            (Some(HeaderValue::Real(ra)), Some(HeaderValue::Real(dec))) => {
                assert_relative_eq!(*ra, 0.1, epsilon = 1e-12);
                assert_relative_eq!(*dec, 0.05, epsilon = 1e-12);
            }
            other => panic!("Expected position cards, got {other:?}"),
        }
    }

    #[test]
    fn test_single_star_total_flux() {
        let case = single_star_case();
        let mut stream = RandomStream::from_seed(1234);
        let grid = case.render_band(2, &mut stream).unwrap();

        let expected = 40.0 * 1000.0 + 0.01 * 1000.0 * 96.0 * 96.0;
        assert_relative_eq!(grid.sum(), expected, max_relative = 0.01);
        assert_eq!(grid.size().to_tuple(), (96, 96));
    }

    #[test]
    fn test_star_peaks_at_center() {
        let case = single_star_case();
        let mut stream = RandomStream::from_seed(9);
        let grid = case.render_band(2, &mut stream).unwrap();

        let center: f32 = grid.data()[[47, 47]];
        let corner: f32 = grid.data()[[0, 0]];
        assert!(center > 100.0);
        assert_relative_eq!(corner, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_render_is_deterministic_and_non_mutating() {
        let mut case = single_star_case();
        case.add_galaxy().offset_arcsec(-4.0, 3.0);
        let before = case.clone();

        let first = case.render_band(1, &mut RandomStream::for_case(1234, 2)).unwrap();
        let second = case.render_band(1, &mut RandomStream::for_case(1234, 2)).unwrap();
        assert_eq!(first, second);
        assert_eq!(case, before);
    }

    #[test]
    fn test_sky_noise() {
        let mut case = GalSimTestCase::new();
        case.set_include_noise(true);
        case.set_sky_level_nmgy(0.05);
        let grid = case.render_band(0, &mut RandomStream::from_seed(5)).unwrap();

        let n = grid.size().pixel_count() as f64;
        let mean = grid.sum() / n;
        let variance = grid
            .data()
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        assert_relative_eq!(mean, 50.0, max_relative = 0.02);
        assert_relative_eq!(variance, 50.0, max_relative = 0.1);
        assert!(grid.data().iter().all(|v| v.fract() == 0.0));
    }

    #[test]
    fn test_band_out_of_range() {
        let case = single_star_case();
        let result = case.render_band(NUM_BANDS, &mut RandomStream::from_seed(1));
        assert!(matches!(result, Err(RenderError::BandOutOfRange(5))));
    }
}
