//! Pixel grid with an attached world coordinate system

use ndarray::Array2;
use shared::image_proc::{add_constant_background, add_poisson_background};
use shared::ImageSize;

use super::rng::RandomStream;
use super::wcs::PixelScaleWcs;
use crate::error::RenderError;

/// Single-precision image that accumulates flux at world positions.
///
/// Data is stored as (rows, columns) with row 0 at the lowest image y.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    data: Array2<f32>,
    wcs: PixelScaleWcs,
}

impl PixelGrid {
    /// Zero-filled grid
    pub fn new(size: ImageSize, wcs: PixelScaleWcs) -> Self {
        Self {
            data: size.empty_array_f32(),
            wcs,
        }
    }

    pub fn size(&self) -> ImageSize {
        let (height, width) = self.data.dim();
        ImageSize::from_width_height(width, height)
    }

    pub fn wcs(&self) -> &PixelScaleWcs {
        &self.wcs
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn into_data(self) -> Array2<f32> {
        self.data
    }

    /// Add `flux` to the pixel containing a world position.
    ///
    /// Returns false, leaving the grid untouched, when the position is off the image.
    pub fn add_at_world(&mut self, ra: f64, dec: f64, flux: f64) -> bool {
        let (col, row) = self.wcs.world_to_pixel_index(ra, dec);
        if !self.size().contains(col, row) {
            return false;
        }
        self.data[[row as usize, col as usize]] += flux as f32;
        true
    }

    /// Add the same level to every pixel
    pub fn add_constant(&mut self, level: f64) -> Result<(), RenderError> {
        add_constant_background(&mut self.data, level)?;
        Ok(())
    }

    /// Add an independent Poisson draw with mean `mean` to every pixel
    pub fn add_poisson_noise(
        &mut self,
        mean: f64,
        stream: &mut RandomStream,
    ) -> Result<(), RenderError> {
        add_poisson_background(&mut self.data, mean, stream)?;
        Ok(())
    }

    /// Sum of all pixels, accumulated in double precision
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }
}
