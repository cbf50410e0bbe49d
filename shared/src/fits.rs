//! Multi-extension FITS writing for rendered images
//!
//! Writes a sequence of named `f32` images into one FITS file, one IMAGE
//! extension per image after an empty primary HDU. Header cards carry typed
//! values and comments and are written in the order they were pushed.
//!
//! Array rows are written in order, so row 0 of the array is the first FITS
//! row (y = 1). Callers whose arrays are stored top-down must flip first.

use fitsio::compat::fitsfile::FitsFile;
use fitsio::compat::hdu::FitsHdu;
use fitsio::compat::images::{ImageDescription, ImageType, WriteImage};
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing FITS data
#[derive(Error, Debug)]
pub enum FitsError {
    #[error("FITS I/O error: {0}")]
    FitsIo(#[from] fitsio::compat::errors::Error),
    #[error("Header value for {key} cannot be represented: {reason}")]
    InvalidValue { key: String, reason: String },
    #[error("No HDUs to write")]
    Empty,
}

/// A typed header value
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Integer(i64),
    Real(f64),
    Logical(bool),
    Text(String),
    /// Keyword present with no value; written as an empty string
    Undefined,
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Integer(value)
    }
}

impl From<usize> for HeaderValue {
    fn from(value: usize) -> Self {
        HeaderValue::Integer(value as i64)
    }
}

impl From<f64> for HeaderValue {
    fn from(value: f64) -> Self {
        HeaderValue::Real(value)
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        HeaderValue::Logical(value)
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Text(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Text(value)
    }
}

impl<T: Into<HeaderValue>> From<Option<T>> for HeaderValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(HeaderValue::Undefined, Into::into)
    }
}

/// One `key = value / comment` header entry
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCard {
    pub key: String,
    pub value: HeaderValue,
    pub comment: String,
}

impl HeaderCard {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<HeaderValue>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comment: comment.into(),
        }
    }

    fn invalid_value(&self, reason: &str) -> FitsError {
        FitsError::InvalidValue {
            key: self.key.clone(),
            reason: reason.to_string(),
        }
    }

    /// Reject values the file could not carry, before anything is written
    fn check(&self) -> Result<(), FitsError> {
        match &self.value {
            HeaderValue::Real(value) if !value.is_finite() => {
                Err(self.invalid_value("value is not finite"))
            }
            HeaderValue::Text(value) if !value.is_ascii() => {
                Err(self.invalid_value("string is not ASCII"))
            }
            _ => Ok(()),
        }
    }

    fn write(&self, fptr: &mut FitsFile, hdu: &FitsHdu) -> Result<(), FitsError> {
        let key = self.key.as_str();
        let comment = self.comment.as_str();
        match &self.value {
            HeaderValue::Integer(value) => hdu.write_key(fptr, key, (*value, comment))?,
            HeaderValue::Real(value) => hdu.write_key(fptr, key, (*value, comment))?,
            HeaderValue::Logical(value) => hdu.write_key(fptr, key, (*value, comment))?,
            HeaderValue::Text(value) => hdu.write_key(fptr, key, (value.as_str(), comment))?,
            HeaderValue::Undefined => hdu.write_key(fptr, key, ("", comment))?,
        }
        Ok(())
    }
}

/// A named image plus the caller's header cards
#[derive(Debug, Clone)]
pub struct ImageHdu {
    name: String,
    data: Array2<f32>,
    cards: Vec<HeaderCard>,
}

impl ImageHdu {
    /// Create an HDU from an image stored as (rows, columns)
    pub fn new(name: impl Into<String>, data: Array2<f32>) -> Self {
        Self {
            name: name.into(),
            data,
            cards: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn cards(&self) -> &[HeaderCard] {
        &self.cards
    }

    /// Append a header card after the structural keywords
    pub fn push_card(&mut self, card: HeaderCard) {
        self.cards.push(card);
    }

    fn write(&self, fptr: &mut FitsFile) -> Result<(), FitsError> {
        let (height, width) = self.data.dim();
        let image_description = ImageDescription {
            data_type: ImageType::Float,
            dimensions: &[width, height],
        };

        let hdu = fptr.create_image(&self.name, &image_description)?;
        let flat_data: Vec<f32> = self.data.iter().copied().collect();
        f32::write_image(fptr, &hdu, &flat_data)?;
        hdu.write_key(fptr, "EXTNAME", &self.name)?;
        for card in &self.cards {
            card.write(fptr, &hdu)?;
        }
        Ok(())
    }
}

/// Write all HDUs into a single FITS file.
///
/// Every card is checked before the file is created, so an unrepresentable
/// header value never leaves a half-written file behind. An existing file at
/// `path` is replaced.
pub fn write_multi_extension_fits<P: AsRef<Path>>(
    path: P,
    hdus: &[ImageHdu],
) -> Result<(), FitsError> {
    if hdus.is_empty() {
        return Err(FitsError::Empty);
    }
    for hdu in hdus {
        hdu.cards.iter().try_for_each(HeaderCard::check)?;
    }

    let mut fptr = FitsFile::create(&path).overwrite().open()?;
    for hdu in hdus {
        hdu.write(&mut fptr)?;
    }
    Ok(())
}
