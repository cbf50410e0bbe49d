//! Image processing utilities shared across the workspace

pub mod noise;

pub use noise::{add_constant_background, add_poisson_background, NoiseError};
