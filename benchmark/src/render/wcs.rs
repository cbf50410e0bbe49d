//! Linear pixel-scale world coordinate system

use nalgebra::Vector2;

/// Maps image positions to world coordinates with a uniform pixel scale.
///
/// `world = world_origin + scale * (image - image_origin)`, in degrees, with
/// no rotation and no flip. Image positions follow the one-based convention:
/// the pixel at array column `c`, row `r` is centered on image position
/// `(c + 1, r + 1)` and covers half a pixel either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelScaleWcs {
    /// Degrees per pixel along both axes
    scale: f64,
    image_origin: Vector2<f64>,
    world_origin: Vector2<f64>,
}

impl PixelScaleWcs {
    /// A WCS mapping image position (0, 0) onto `world_origin`
    pub fn new(scale: f64, world_origin: (f64, f64)) -> Self {
        Self {
            scale,
            image_origin: Vector2::zeros(),
            world_origin: Vector2::new(world_origin.0, world_origin.1),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn world_origin(&self) -> (f64, f64) {
        (self.world_origin.x, self.world_origin.y)
    }

    /// Solid angle of one pixel, in square degrees
    pub fn pixel_area(&self) -> f64 {
        self.scale * self.scale
    }

    pub fn image_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        let world = self.world_origin + (Vector2::new(x, y) - self.image_origin) * self.scale;
        (world.x, world.y)
    }

    pub fn world_to_image(&self, ra: f64, dec: f64) -> (f64, f64) {
        let image = self.image_origin + (Vector2::new(ra, dec) - self.world_origin) / self.scale;
        (image.x, image.y)
    }

    /// Array (column, row) of the pixel containing a world position.
    ///
    /// May be negative or beyond the image; callers check bounds.
    pub fn world_to_pixel_index(&self, ra: f64, dec: f64) -> (i64, i64) {
        let (x, y) = self.world_to_image(ra, dec);
        ((x - 0.5).floor() as i64, (y - 0.5).floor() as i64)
    }
}
