//! Shared components for the benchmark image generator
//!
//! Image sizing, sky background noise, multi-extension FITS writing and the
//! output-file bookkeeping (checksummed names, latest pointers) used by the
//! generator crate.

pub mod image_proc;
pub mod image_size;

#[cfg(feature = "frame-writer")]
pub mod fits;
#[cfg(feature = "frame-writer")]
pub mod output;

pub use image_size::ImageSize;
