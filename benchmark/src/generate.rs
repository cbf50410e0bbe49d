//! Batch driver: render every selected case in every band and store the result
//!
//! All rendering finishes before anything touches the file system. The batch
//! is then written as one multi-extension FITS file, renamed to carry a prefix
//! of its MD5 digest, and recorded in a per-label "latest" pointer file.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use shared::fits::{write_multi_extension_fits, HeaderCard, ImageHdu};
use shared::output::{
    append_md5sum_to_filename, ensure_containing_directory_exists, remove_existing,
    write_latest_filename, OutputError,
};

use crate::cases::TestCaseDefinition;
use crate::constants::{FITS_COMMENT_PREPEND, NUM_BANDS, RANDOM_SEED};
use crate::error::GenerateError;
use crate::render::RandomStream;
use crate::scene::ImageParameters;

/// Directory, relative to the output root, that receives the FITS files
pub const OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Root for `output/` and `latest_filenames/`
    pub output_root: PathBuf,
    /// Case `i` draws from a stream seeded with `base_seed + i`
    pub base_seed: u64,
    pub show_progress: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            base_seed: RANDOM_SEED,
            show_progress: true,
        }
    }
}

/// Where a finished batch ended up
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFiles {
    pub fits_path: PathBuf,
    pub latest_pointer: PathBuf,
    pub hdu_count: usize,
}

impl GeneratedFiles {
    /// Base name of the checksummed FITS file
    pub fn file_name(&self) -> Option<&str> {
        self.fits_path.file_name().and_then(|name| name.to_str())
    }
}

/// Linear WCS cards describing the image's pixel scale and world origin
fn wcs_cards(image_parameters: &ImageParameters) -> Vec<HeaderCard> {
    let scale = image_parameters.degrees_per_pixel();
    let (origin_ra, origin_dec) = image_parameters.world_origin_degrees();
    vec![
        HeaderCard::new("GS_XMIN", 1i64, "image bounds x minimum"),
        HeaderCard::new("GS_YMIN", 1i64, "image bounds y minimum"),
        HeaderCard::new("CTYPE1", "LINEAR", "linear world axis"),
        HeaderCard::new("CTYPE2", "LINEAR", "linear world axis"),
        HeaderCard::new("CRPIX1", 0.0, "reference pixel x"),
        HeaderCard::new("CRPIX2", 0.0, "reference pixel y"),
        HeaderCard::new("CRVAL1", origin_ra, "world x at reference pixel (deg)"),
        HeaderCard::new("CRVAL2", origin_dec, "world y at reference pixel (deg)"),
        HeaderCard::new("CD1_1", scale, "degrees per pixel"),
        HeaderCard::new("CD2_2", scale, "degrees per pixel"),
    ]
}

/// Render all bands of one case into named HDUs carrying WCS and ground truth.
///
/// A single random stream, seeded from `base_seed + case_index`, is threaded
/// through the bands in order.
pub fn render_case(
    case_index: usize,
    definition: &TestCaseDefinition,
    base_seed: u64,
    progress: &ProgressBar,
) -> Result<Vec<ImageHdu>, GenerateError> {
    let case_name = definition.name.to_string();
    let test_case = definition
        .build()
        .map_err(|source| GenerateError::Validation {
            case: case_name.clone(),
            source,
        })?;

    debug!(
        "Case {} has {} sources on a {} image",
        definition.name,
        test_case.light_sources().len(),
        test_case.image_parameters().image_size()
    );

    let mut stream = RandomStream::for_case(base_seed, case_index);
    let mut hdus = Vec::with_capacity(NUM_BANDS);
    for band in 0..NUM_BANDS {
        progress.set_message(format!("{} band {}", definition.name, band + 1));

        let grid = test_case
            .render_band(band, &mut stream)
            .map_err(|source| GenerateError::Render {
                case: case_name.clone(),
                source,
            })?;
        let header = test_case
            .export_ground_truth_header(case_index, band)
            .map_err(|source| GenerateError::Configuration {
                case: case_name.clone(),
                source,
            })?;

        let hdu_name = format!("{}_{}", definition.name, band + 1);
        let mut hdu = ImageHdu::new(hdu_name, grid.into_data());
        for card in wcs_cards(test_case.image_parameters()) {
            hdu.push_card(card);
        }
        for card in header.into_cards() {
            hdu.push_card(HeaderCard {
                comment: format!("{FITS_COMMENT_PREPEND}{}", card.comment),
                ..card
            });
        }
        hdus.push(hdu);
        progress.inc(1);
    }
    Ok(hdus)
}

fn progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::default_bar()
        .template("{msg:32} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ");
    let bar = ProgressBar::new(total);
    bar.set_style(style);
    bar
}

/// Write HDUs to `path`, replacing any earlier file there
fn save_multi_extension_fits(path: &Path, hdus: &[ImageHdu]) -> Result<(), GenerateError> {
    ensure_containing_directory_exists(path)?;
    if remove_existing(path)? {
        info!("Replaced existing {}", path.display());
    }
    write_multi_extension_fits(path, hdus)?;
    Ok(())
}

/// Render `cases` and store them as `output/{label}_{md5}.fits` under the output root.
///
/// # Arguments
/// * `output_label` - Base name of the FITS file and of its latest pointer
/// * `cases` - Test cases in batch order; the position sets each case's seed
/// * `config` - Output location, seed and progress display
pub fn generate_fits_file(
    output_label: &str,
    cases: &[&TestCaseDefinition],
    config: &GenerateConfig,
) -> Result<GeneratedFiles, GenerateError> {
    if cases.is_empty() {
        return Err(GenerateError::NoCases);
    }
    info!("Generating {} test cases", cases.len());

    let progress = progress_bar((cases.len() * NUM_BANDS) as u64, config.show_progress);
    let mut hdus = Vec::with_capacity(cases.len() * NUM_BANDS);
    for (case_index, definition) in cases.iter().enumerate() {
        info!("  Generating case {}", definition.name);
        hdus.extend(render_case(
            case_index,
            definition,
            config.base_seed,
            &progress,
        )?);
    }
    progress.finish_and_clear();

    let image_path = config
        .output_root
        .join(OUTPUT_DIR)
        .join(format!("{output_label}.fits"));
    save_multi_extension_fits(&image_path, &hdus)?;
    let fits_path = append_md5sum_to_filename(&image_path)?;
    info!("Wrote multi-extension FITS file to {}", fits_path.display());

    let file_name = fits_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| OutputError::NoFileName(fits_path.clone()))?
        .to_string();
    let latest_pointer = write_latest_filename(&config.output_root, output_label, &file_name)?;

    Ok(GeneratedFiles {
        fits_path,
        latest_pointer,
        hdu_count: hdus.len(),
    })
}
