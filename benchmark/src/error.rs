//! Error types for scene construction, rendering and file generation

use shared::fits::FitsError;
use shared::image_proc::NoiseError;
use shared::output::OutputError;
use thiserror::Error;

/// A scene parameter was given a value outside its valid range.
///
/// Raised at assignment time, never deferred to rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Relative flux must have {expected} entries, got {actual}")]
    WrongBandCount { expected: usize, actual: usize },
    #[error("Relative flux of the reference band (index {band}) must be 1, got {value}")]
    ReferenceBandNotUnity { band: usize, value: f64 },
    #[error("{parameter} must be {expected}, got {value}")]
    OutOfRange {
        parameter: &'static str,
        expected: &'static str,
        value: f64,
    },
}

/// A test case is internally consistent but cannot be exported
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Test case has {count} light sources, the ground-truth header holds at most {max}")]
    TooManySources { count: usize, max: usize },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Band index {0} is out of range")]
    BandOutOfRange(usize),
    #[error("Cannot draw a photon count with mean {0}")]
    InvalidPhotonMean(f64),
    #[error("Sky background error: {0}")]
    Noise(#[from] NoiseError),
}

/// Failure anywhere in a generation batch; aborts the whole run
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Unknown test case {0:?}")]
    UnknownCase(String),
    #[error("Test case {case} is misconfigured: {source}")]
    Validation {
        case: String,
        #[source]
        source: ValidationError,
    },
    #[error("Test case {case}: {source}")]
    Configuration {
        case: String,
        #[source]
        source: ConfigurationError,
    },
    #[error("Test case {case} failed to render: {source}")]
    Render {
        case: String,
        #[source]
        source: RenderError,
    },
    #[error("No test cases selected")]
    NoCases,
    #[error("FITS error: {0}")]
    Fits(#[from] FitsError),
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}
