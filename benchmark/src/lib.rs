//! Synthetic ground-truth image generation for source-detection benchmarks.
//!
//! Test cases describe small images holding stars and galaxies with known
//! positions, brightnesses, colors and shapes. Each case is rendered in five
//! color bands by photon shooting through a Gaussian PSF over a flat or
//! Poisson sky, and the images are written with their ground truth embedded as
//! FITS header cards.

pub mod cases;
pub mod constants;
pub mod error;
pub mod generate;
pub mod render;
pub mod scene;
pub mod shared_args;

pub use cases::{find_cases, TestCaseDefinition, TEST_CASES};
pub use error::{ConfigurationError, GenerateError, RenderError, ValidationError};
pub use generate::{generate_fits_file, GenerateConfig, GeneratedFiles};
pub use scene::{Galaxy, GalSimTestCase, Star};
