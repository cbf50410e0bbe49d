//! Parametric light profiles and photon-shooting rendering.
//!
//! A [`LightProfile`] is an expression tree: analytic leaves (Gaussian,
//! exponential, de Vaucouleurs) combined by affine transforms (shift, shear),
//! flux-weighted sums and convolutions. Profiles live in world coordinates
//! (degrees) and carry their total flux in detector counts.
//!
//! # Photon shooting
//!
//! Rendering draws discrete photons instead of integrating surface brightness:
//! - Leaves sample a position from their normalized light distribution
//! - Transforms map the sampled position through `jacobian * p + offset`
//! - Sums pick one component with probability proportional to its flux
//! - Convolutions add one independent sample from every factor
//!
//! Each photon lands in the pixel containing it, so pixel response is implicit
//! and no separate pixel convolution is applied.
//!
//! # Radial sampling
//!
//! For a Sérsic profile `I(r) ∝ exp(-b (r/r_e)^(1/n))` the substitution
//! `u = b (r/r_e)^(1/n)` turns the radial density `r I(r) dr` into
//! `u^(2n-1) e^(-u) du`, a Gamma(2n) distribution. Exponential (n = 1) and
//! de Vaucouleurs (n = 4) profiles therefore only need integer-shape Gamma draws.

use std::f64::consts::PI;
use std::ops::Add;

use nalgebra::{Matrix2, Vector2};

use super::grid::PixelGrid;
use super::rng::RandomStream;
use crate::error::RenderError;

/// Sérsic b_n for n = 1: ratio of half-light radius to exponential scale length
const EXPONENTIAL_B: f64 = 1.678_346_990_016_661;
/// Sérsic b_n for n = 4
const DE_VAUCOULEURS_B: f64 = 7.669_249_443_765_938;
/// Γ(2n) for n = 4
const GAMMA_OF_EIGHT: f64 = 5040.0;

/// Reduced-shear matrix for an ellipse of minor/major `axis_ratio` whose
/// major axis lies `beta_deg` degrees counter-clockwise from +x.
///
/// The matrix has unit determinant, so shearing preserves flux and area.
pub fn shear_matrix(axis_ratio: f64, beta_deg: f64) -> Matrix2<f64> {
    debug_assert!(axis_ratio > 0.0 && axis_ratio <= 1.0);
    let g = (1.0 - axis_ratio) / (1.0 + axis_ratio);
    let two_beta = 2.0 * beta_deg.to_radians();
    let g1 = g * two_beta.cos();
    let g2 = g * two_beta.sin();
    let norm = 1.0 / (1.0 - g * g).sqrt();
    Matrix2::new(1.0 + g1, g2, g2, 1.0 - g1) * norm
}

/// What a call to [`LightProfile::draw_photons`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotonDrawSummary {
    /// Photons sampled from the profile
    pub shot: u64,
    /// Photons that landed on the grid
    pub landed: u64,
    /// Flux carried by each photon
    pub photon_flux: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightProfile {
    /// Circular Gaussian with standard deviation `sigma`
    Gaussian { flux: f64, sigma: f64 },
    /// Sérsic n = 1 profile
    Exponential { flux: f64, half_light_radius: f64 },
    /// Sérsic n = 4 profile
    DeVaucouleurs { flux: f64, half_light_radius: f64 },
    /// `inner` mapped through `jacobian * p + offset`
    Transformed {
        inner: Box<LightProfile>,
        jacobian: Matrix2<f64>,
        offset: Vector2<f64>,
    },
    Sum(Vec<LightProfile>),
    Convolution(Vec<LightProfile>),
}

impl LightProfile {
    pub fn gaussian(flux: f64, sigma: f64) -> Self {
        LightProfile::Gaussian { flux, sigma }
    }

    pub fn exponential(flux: f64, half_light_radius: f64) -> Self {
        LightProfile::Exponential {
            flux,
            half_light_radius,
        }
    }

    pub fn de_vaucouleurs(flux: f64, half_light_radius: f64) -> Self {
        LightProfile::DeVaucouleurs {
            flux,
            half_light_radius,
        }
    }

    /// Translate the profile by a world offset
    pub fn shift(self, dx: f64, dy: f64) -> Self {
        let delta = Vector2::new(dx, dy);
        match self {
            LightProfile::Transformed {
                inner,
                jacobian,
                offset,
            } => LightProfile::Transformed {
                inner,
                jacobian,
                offset: offset + delta,
            },
            other => LightProfile::Transformed {
                inner: Box::new(other),
                jacobian: Matrix2::identity(),
                offset: delta,
            },
        }
    }

    /// Apply a linear map about the world origin; any earlier shift is mapped too
    pub fn transform(self, matrix: Matrix2<f64>) -> Self {
        match self {
            LightProfile::Transformed {
                inner,
                jacobian,
                offset,
            } => LightProfile::Transformed {
                inner,
                jacobian: matrix * jacobian,
                offset: matrix * offset,
            },
            other => LightProfile::Transformed {
                inner: Box::new(other),
                jacobian: matrix,
                offset: Vector2::zeros(),
            },
        }
    }

    /// Shear into an ellipse with the given minor/major axis ratio and
    /// major-axis angle in degrees
    pub fn shear(self, axis_ratio: f64, beta_deg: f64) -> Self {
        self.transform(shear_matrix(axis_ratio, beta_deg))
    }

    /// Convolve with another profile; the result's flux is the product of fluxes
    pub fn convolve(self, other: LightProfile) -> Self {
        match self {
            LightProfile::Convolution(mut parts) => {
                parts.push(other);
                LightProfile::Convolution(parts)
            }
            first => LightProfile::Convolution(vec![first, other]),
        }
    }

    /// Total flux in counts
    pub fn flux(&self) -> f64 {
        match self {
            LightProfile::Gaussian { flux, .. }
            | LightProfile::Exponential { flux, .. }
            | LightProfile::DeVaucouleurs { flux, .. } => *flux,
            LightProfile::Transformed { inner, .. } => inner.flux(),
            LightProfile::Sum(parts) => parts.iter().map(LightProfile::flux).sum(),
            LightProfile::Convolution(parts) => parts.iter().map(LightProfile::flux).product(),
        }
    }

    /// Upper bound on surface brightness, in counts per square degree
    pub fn max_surface_brightness(&self) -> f64 {
        match self {
            LightProfile::Gaussian { flux, sigma } => flux / (2.0 * PI * sigma * sigma),
            LightProfile::Exponential {
                flux,
                half_light_radius,
            } => {
                let scale_radius = half_light_radius / EXPONENTIAL_B;
                flux / (2.0 * PI * scale_radius * scale_radius)
            }
            LightProfile::DeVaucouleurs {
                flux,
                half_light_radius,
            } => {
                flux * DE_VAUCOULEURS_B.powi(8)
                    / (8.0 * PI * GAMMA_OF_EIGHT * half_light_radius * half_light_radius)
            }
            LightProfile::Transformed {
                inner, jacobian, ..
            } => inner.max_surface_brightness() / jacobian.determinant().abs(),
            LightProfile::Sum(parts) => parts.iter().map(|p| p.max_surface_brightness()).sum(),
            LightProfile::Convolution(parts) => {
                // Convolving with a kernel of flux F can't raise the peak above peak * F
                (0..parts.len())
                    .map(|i| {
                        let others: f64 = parts
                            .iter()
                            .enumerate()
                            .filter(|(j, _)| *j != i)
                            .map(|(_, p)| p.flux())
                            .product();
                        parts[i].max_surface_brightness() * others
                    })
                    .fold(f64::INFINITY, f64::min)
            }
        }
    }

    /// Sample one photon position from the normalized light distribution
    pub fn shoot_photon(&self, stream: &mut RandomStream) -> Vector2<f64> {
        match self {
            LightProfile::Gaussian { sigma, .. } => Vector2::new(
                sigma * stream.standard_normal(),
                sigma * stream.standard_normal(),
            ),
            LightProfile::Exponential {
                half_light_radius, ..
            } => {
                let radius = half_light_radius / EXPONENTIAL_B * stream.gamma_integer(2);
                polar(radius, stream)
            }
            LightProfile::DeVaucouleurs {
                half_light_radius, ..
            } => {
                let u = stream.gamma_integer(8);
                let radius = half_light_radius * (u / DE_VAUCOULEURS_B).powi(4);
                polar(radius, stream)
            }
            LightProfile::Transformed {
                inner,
                jacobian,
                offset,
            } => jacobian * inner.shoot_photon(stream) + offset,
            LightProfile::Sum(parts) => {
                let total = self.flux();
                let target = stream.uniform() * total;
                let mut cumulative = 0.0;
                for part in parts {
                    cumulative += part.flux();
                    if target < cumulative {
                        return part.shoot_photon(stream);
                    }
                }
                // Rounding can leave target == total; fall back to the last
                // component that carries flux
                match parts.iter().rev().find(|p| p.flux() > 0.0) {
                    Some(part) => part.shoot_photon(stream),
                    None => Vector2::zeros(),
                }
            }
            LightProfile::Convolution(parts) => parts
                .iter()
                .fold(Vector2::zeros(), |sum, part| sum + part.shoot_photon(stream)),
        }
    }

    /// Accumulate a photon-shot realization of this profile onto `grid`.
    ///
    /// The photon count is Poisson distributed around `flux / g`, each photon
    /// carrying flux `g`. When `max_extra_noise` is positive, `g` is raised above
    /// one just enough that the extra variance in the brightest pixel stays
    /// below `max_extra_noise`: `g = 1 + max_extra_noise / peak_pixel_value`.
    pub fn draw_photons(
        &self,
        grid: &mut PixelGrid,
        stream: &mut RandomStream,
        max_extra_noise: f64,
    ) -> Result<PhotonDrawSummary, RenderError> {
        let flux = self.flux();
        if !flux.is_finite() || flux < 0.0 {
            return Err(RenderError::InvalidPhotonMean(flux));
        }

        let peak_pixel_value = self.max_surface_brightness() * grid.wcs().pixel_area();
        let photon_flux = if max_extra_noise > 0.0 && peak_pixel_value > 0.0 {
            1.0 + max_extra_noise / peak_pixel_value
        } else {
            1.0
        };

        let shot = stream.poisson(flux / photon_flux)?;
        let mut landed = 0;
        for _ in 0..shot {
            let position = self.shoot_photon(stream);
            if grid.add_at_world(position.x, position.y, photon_flux) {
                landed += 1;
            }
        }

        Ok(PhotonDrawSummary {
            shot,
            landed,
            photon_flux,
        })
    }
}

fn polar(radius: f64, stream: &mut RandomStream) -> Vector2<f64> {
    let theta = 2.0 * PI * stream.uniform();
    Vector2::new(radius * theta.cos(), radius * theta.sin())
}

impl Add for LightProfile {
    type Output = LightProfile;

    fn add(self, other: LightProfile) -> LightProfile {
        match self {
            LightProfile::Sum(mut parts) => {
                parts.push(other);
                LightProfile::Sum(parts)
            }
            first => LightProfile::Sum(vec![first, other]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::wcs::PixelScaleWcs;
    use approx::assert_relative_eq;
    use shared::ImageSize;

    fn sample(profile: &LightProfile, n: usize, seed: u64) -> Vec<Vector2<f64>> {
        let mut stream = RandomStream::from_seed(seed);
        (0..n).map(|_| profile.shoot_photon(&mut stream)).collect()
    }

    fn fraction_within(points: &[Vector2<f64>], radius: f64) -> f64 {
        points.iter().filter(|p| p.norm() < radius).count() as f64 / points.len() as f64
    }

    #[test]
    fn test_shear_matrix_properties() {
        let m = shear_matrix(0.4, 30.0);
        assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(m[(0, 1)], m[(1, 0)], epsilon = 1e-15);

        // Singular values give the axis lengths, their ratio the axis ratio
        let singular = m.singular_values();
        let ratio = singular.min() / singular.max();
        assert_relative_eq!(ratio, 0.4, epsilon = 1e-12);

        assert_relative_eq!(shear_matrix(1.0, 45.0), Matrix2::identity(), epsilon = 1e-15);
    }

    #[test]
    fn test_flux_of_combinations() {
        let galaxy = LightProfile::exponential(300.0, 1.0).shear(0.5, 10.0).shift(1.0, 2.0)
            + LightProfile::de_vaucouleurs(700.0, 1.0).shift(1.0, 2.0);
        assert_relative_eq!(galaxy.flux(), 1000.0);

        let convolved = galaxy.convolve(LightProfile::gaussian(1.0, 0.5));
        assert_relative_eq!(convolved.flux(), 1000.0);
    }

    #[test]
    fn test_add_and_convolve_flatten() {
        let sum = LightProfile::gaussian(1.0, 1.0)
            + LightProfile::gaussian(2.0, 1.0)
            + LightProfile::gaussian(3.0, 1.0);
        assert!(matches!(&sum, LightProfile::Sum(parts) if parts.len() == 3));

        let conv = LightProfile::gaussian(1.0, 1.0)
            .convolve(LightProfile::gaussian(1.0, 2.0))
            .convolve(LightProfile::gaussian(1.0, 3.0));
        assert!(matches!(&conv, LightProfile::Convolution(parts) if parts.len() == 3));
    }

    #[test]
    fn test_shift_accumulates() {
        let profile = LightProfile::gaussian(1.0, 1.0).shift(1.0, 0.0).shift(0.5, -2.0);
        match profile {
            LightProfile::Transformed { offset, jacobian, .. } => {
                assert_eq!(offset, Vector2::new(1.5, -2.0));
                assert_eq!(jacobian, Matrix2::identity());
            }
            other => panic!("Expected transformed profile, got {other:?}"),
        }
    }

    #[test]
    fn test_gaussian_photon_moments() {
        let points = sample(&LightProfile::gaussian(1.0, 2.0), 20_000, 11);
        let n = points.len() as f64;
        let mean = points.iter().fold(Vector2::zeros(), |a, p| a + p) / n;
        let var_x = points.iter().map(|p| (p.x - mean.x).powi(2)).sum::<f64>() / n;

        assert!(mean.norm() < 0.05);
        assert_relative_eq!(var_x, 4.0, max_relative = 0.03);
    }

    #[test]
    fn test_half_light_radius_encloses_half_the_photons() {
        let exponential = sample(&LightProfile::exponential(1.0, 1.5), 20_000, 12);
        assert_relative_eq!(fraction_within(&exponential, 1.5), 0.5, epsilon = 0.015);

        let de_vaucouleurs = sample(&LightProfile::de_vaucouleurs(1.0, 1.5), 20_000, 13);
        assert_relative_eq!(fraction_within(&de_vaucouleurs, 1.5), 0.5, epsilon = 0.015);
    }

    #[test]
    fn test_sheared_gaussian_axis_ratio() {
        let profile = LightProfile::gaussian(1.0, 1.0).shear(0.5, 90.0);
        let points = sample(&profile, 20_000, 14);
        let n = points.len() as f64;
        let var_x = points.iter().map(|p| p.x * p.x).sum::<f64>() / n;
        let var_y = points.iter().map(|p| p.y * p.y).sum::<f64>() / n;

        // Major axis along y at 90 degrees; sigma ratio equals the axis ratio
        assert_relative_eq!((var_x / var_y).sqrt(), 0.5, max_relative = 0.03);
    }

    #[test]
    fn test_sum_picks_components_by_flux() {
        let profile = LightProfile::gaussian(1.0, 0.01).shift(-10.0, 0.0)
            + LightProfile::gaussian(3.0, 0.01).shift(10.0, 0.0);
        let points = sample(&profile, 10_000, 15);
        let right = points.iter().filter(|p| p.x > 0.0).count() as f64 / points.len() as f64;
        assert_relative_eq!(right, 0.75, epsilon = 0.02);
    }

    #[test]
    fn test_zero_flux_component_never_sampled() {
        let profile = LightProfile::gaussian(0.0, 0.01).shift(-10.0, 0.0)
            + LightProfile::gaussian(5.0, 0.01).shift(10.0, 0.0);
        let points = sample(&profile, 2_000, 16);
        assert!(points.iter().all(|p| p.x > 0.0));
    }

    #[test]
    fn test_max_surface_brightness() {
        let gaussian = LightProfile::gaussian(10.0, 2.0);
        assert_relative_eq!(gaussian.max_surface_brightness(), 10.0 / (8.0 * PI));

        let scaled = gaussian.clone().transform(Matrix2::identity() * 2.0);
        assert_relative_eq!(
            scaled.max_surface_brightness(),
            gaussian.max_surface_brightness() / 4.0
        );

        let convolved = LightProfile::exponential(100.0, 0.1).convolve(gaussian.clone());
        assert!(convolved.max_surface_brightness() <= 100.0 * gaussian.max_surface_brightness());
        assert!(convolved.max_surface_brightness() > 0.0);
    }

    #[test]
    fn test_draw_conserves_flux() {
        let mut grid = PixelGrid::new(
            ImageSize::from_width_height(64, 64),
            PixelScaleWcs::new(1.0, (0.0, 0.0)),
        );
        let profile = LightProfile::gaussian(5000.0, 3.0).shift(32.0, 32.0);
        let mut stream = RandomStream::from_seed(21);

        let summary = profile.draw_photons(&mut grid, &mut stream, 0.0).unwrap();
        assert_eq!(summary.photon_flux, 1.0);
        assert_eq!(summary.landed, summary.shot);
        assert_eq!(grid.sum(), summary.shot as f64);
        // Poisson photon count: sigma ~ 71
        assert_relative_eq!(grid.sum(), 5000.0, epsilon = 400.0);
    }

    #[test]
    fn test_draw_drops_photons_off_grid() {
        let mut grid = PixelGrid::new(
            ImageSize::from_width_height(10, 10),
            PixelScaleWcs::new(1.0, (0.0, 0.0)),
        );
        // Centered on the left edge: about half the light falls off
        let profile = LightProfile::gaussian(4000.0, 1.0).shift(0.5, 5.5);
        let mut stream = RandomStream::from_seed(22);

        let summary = profile.draw_photons(&mut grid, &mut stream, 0.0).unwrap();
        let landed_fraction = summary.landed as f64 / summary.shot as f64;
        assert_relative_eq!(landed_fraction, 0.5, epsilon = 0.05);
        assert_eq!(grid.sum(), summary.landed as f64);
    }

    #[test]
    fn test_extra_noise_raises_photon_flux() {
        let mut grid = PixelGrid::new(
            ImageSize::from_width_height(32, 32),
            PixelScaleWcs::new(1.0, (0.0, 0.0)),
        );
        let profile = LightProfile::gaussian(1000.0, 4.0).shift(16.0, 16.0);
        let mut stream = RandomStream::from_seed(23);

        let summary = profile.draw_photons(&mut grid, &mut stream, 5.0).unwrap();
        let peak = 1000.0 / (2.0 * PI * 16.0);
        assert_relative_eq!(summary.photon_flux, 1.0 + 5.0 / peak, epsilon = 1e-12);
        assert!(summary.shot < 1000);
    }

    #[test]
    fn test_draw_is_deterministic() {
        let profile = (LightProfile::exponential(800.0, 2.0).shear(0.3, 20.0)
            + LightProfile::de_vaucouleurs(200.0, 2.0).shear(0.3, 20.0))
        .shift(16.0, 16.0)
        .convolve(LightProfile::gaussian(1.0, 1.0));

        let render = |seed| {
            let mut grid = PixelGrid::new(
                ImageSize::from_width_height(32, 32),
                PixelScaleWcs::new(1.0, (0.0, 0.0)),
            );
            let mut stream = RandomStream::from_seed(seed);
            profile.draw_photons(&mut grid, &mut stream, 0.0).unwrap();
            grid
        };

        assert_eq!(render(30), render(30));
        assert_ne!(render(30), render(31));
    }

    #[test]
    fn test_negative_flux_rejected() {
        let mut grid = PixelGrid::new(
            ImageSize::from_width_height(4, 4),
            PixelScaleWcs::new(1.0, (0.0, 0.0)),
        );
        let mut stream = RandomStream::from_seed(1);
        let result = LightProfile::gaussian(-1.0, 1.0).draw_photons(&mut grid, &mut stream, 0.0);
        assert!(matches!(result, Err(RenderError::InvalidPhotonMean(_))));
    }
}
