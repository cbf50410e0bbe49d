//! Noise generation utilities for synthetic sky backgrounds.
//!
//! Provides the two ways a sky level can be laid down on a rendered image:
//! - a flat constant pedestal, for noiseless benchmark images
//! - an independent Poisson draw per pixel, for images with shot noise
//!
//! Both operate in place on `f32` images and walk pixels in row-major order,
//! so a seeded generator always produces the same image.

use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use thiserror::Error;

/// Errors that can occur while adding background noise
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoiseError {
    #[error("Background mean must be finite and non-negative, got {0}")]
    InvalidMean(f64),
}

fn check_mean(mean: f64) -> Result<(), NoiseError> {
    if mean.is_finite() && mean >= 0.0 {
        Ok(())
    } else {
        Err(NoiseError::InvalidMean(mean))
    }
}

/// Add a constant level to every pixel
pub fn add_constant_background(image: &mut Array2<f32>, level: f64) -> Result<(), NoiseError> {
    check_mean(level)?;
    let level = level as f32;
    image.mapv_inplace(|pixel| pixel + level);
    Ok(())
}

/// Add an independent Poisson-distributed count to every pixel.
///
/// Each pixel receives a full Poisson draw with the given mean (the draw
/// includes the mean itself, not just the fluctuation around it). Pixels are
/// visited in row-major order so the result depends only on the generator state.
///
/// # Arguments
/// * `image` - Image to accumulate into
/// * `mean` - Expected count per pixel
/// * `rng` - Random number generator, advanced once per pixel
pub fn add_poisson_background<R: Rng + ?Sized>(
    image: &mut Array2<f32>,
    mean: f64,
    rng: &mut R,
) -> Result<(), NoiseError> {
    check_mean(mean)?;
    if mean == 0.0 {
        return Ok(());
    }

    let poisson = Poisson::new(mean).map_err(|_| NoiseError::InvalidMean(mean))?;
    for pixel in image.iter_mut() {
        let count: f64 = poisson.sample(rng);
        *pixel += count as f32;
    }
    Ok(())
}
