//! Where a light source sits on the sky

use super::image_parameters::ImageParameters;

/// Position of a light source, resolved to world coordinates on demand.
///
/// An offset is resolved against the image center at the time of the call,
/// so changing the image dimensions or origin after placing a source moves it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Fixed world coordinates in degrees
    Absolute {
        right_ascension_deg: f64,
        declination_deg: f64,
    },
    /// Displacement in degrees from the image center
    OffsetFromCenter { x_offset_deg: f64, y_offset_deg: f64 },
}

impl Position {
    /// World coordinates (right ascension, declination) in degrees
    pub fn resolve(&self, image_parameters: &ImageParameters) -> (f64, f64) {
        match *self {
            Position::Absolute {
                right_ascension_deg,
                declination_deg,
            } => (right_ascension_deg, declination_deg),
            Position::OffsetFromCenter {
                x_offset_deg,
                y_offset_deg,
            } => {
                let (center_ra, center_dec) = image_parameters.image_center_world_coordinates();
                (center_ra + x_offset_deg, center_dec + y_offset_deg)
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::OffsetFromCenter {
            x_offset_deg: 0.0,
            y_offset_deg: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_absolute_ignores_image() {
        let position = Position::Absolute {
            right_ascension_deg: 0.0101,
            declination_deg: 0.0102,
        };
        let mut params = ImageParameters::default();
        assert_eq!(position.resolve(&params), (0.0101, 0.0102));

        params.width_px = 500;
        params.origin_right_ascension_arcsec = 100.0;
        assert_eq!(position.resolve(&params), (0.0101, 0.0102));
    }

    #[test]
    fn test_default_resolves_to_center() {
        let params = ImageParameters::default();
        let (ra, dec) = Position::default().resolve(&params);
        assert_relative_eq!(ra, 96.0 * 0.396 / 3600.0 / 2.0, epsilon = 1e-15);
        assert_relative_eq!(dec, ra, epsilon = 1e-15);
    }

    #[test]
    fn test_offset_follows_image_changes() {
        let position = Position::OffsetFromCenter {
            x_offset_deg: 1e-3,
            y_offset_deg: -2e-3,
        };
        let mut params = ImageParameters::default();
        params.arcsec_per_pixel = 3.6;
        let (ra, dec) = position.resolve(&params);
        assert_relative_eq!(ra, 0.048 + 1e-3, epsilon = 1e-12);
        assert_relative_eq!(dec, 0.048 - 2e-3, epsilon = 1e-12);

        params.origin_declination_arcsec = 36.0;
        let (_, shifted_dec) = position.resolve(&params);
        assert_relative_eq!(shifted_dec, dec + 0.01, epsilon = 1e-12);
    }
}
