//! Fixed physical, photometric and file-format constants.

/// Base seed for the per-case random streams (case `i` uses `RANDOM_SEED + i`)
pub const RANDOM_SEED: u64 = 1234;

/// Prefix applied to every ground-truth header comment when written
pub const FITS_COMMENT_PREPEND: &str = "Celeste: ";

pub const ARCSEC_PER_DEGREE: f64 = 3600.0;

/// Detector counts per nanomaggy ("iota")
pub const COUNTS_PER_NMGY: f64 = 1000.0;

/// Number of color bands rendered for every test case
pub const NUM_BANDS: usize = 5;

/// Index of the reference band, whose relative flux is fixed at 1
pub const REFERENCE_BAND_INDEX: usize = 2;

/// Header keys carry a three-digit source index, so at most 999 sources
pub const MAX_LIGHT_SOURCES: usize = 999;

/// Relative flux per band for stars, from the dominant component of the
/// lognormal color prior
pub const DEFAULT_STAR_RELATIVE_INTENSITIES: [f64; NUM_BANDS] =
    [0.1330, 0.5308, 1.0, 1.3179, 1.5417];

/// Relative flux per band for galaxies, from the dominant component of the
/// lognormal color prior
pub const DEFAULT_GALAXY_RELATIVE_INTENSITIES: [f64; NUM_BANDS] =
    [0.4013, 0.4990, 1.0, 1.4031, 1.7750];
