//! Photon-shooting renderer: light profiles, pixel grids, coordinates and randomness

pub mod grid;
pub mod profile;
pub mod rng;
pub mod wcs;

pub use grid::PixelGrid;
pub use profile::{shear_matrix, LightProfile, PhotonDrawSummary};
pub use rng::RandomStream;
pub use wcs::PixelScaleWcs;
