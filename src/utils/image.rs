//! Image ingestion helpers.
//!
//! The pipeline core never touches the filesystem except through these
//! helpers (and the model artifact load); an upload layer that already
//! holds decoded images can skip them entirely.

use std::path::Path;

use image::DynamicImage;

use crate::core::errors::{ClassifyError, ClassifyResult};

/// Loads an image from a file path.
///
/// Any format supported by the `image` crate is accepted; the pipeline
/// itself is exercised with JPEG and PNG ultrasound captures.
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidImage`] if the file cannot be opened
/// or decoded into pixel data.
pub fn load_image(path: &Path) -> ClassifyResult<DynamicImage> {
    image::open(path).map_err(|e| {
        ClassifyError::invalid_image_with_source(
            format!("failed to open '{}'", path.display()),
            e,
        )
    })
}

/// Decodes an image from an in-memory byte buffer (e.g. an upload body).
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidImage`] if the bytes do not decode as
/// a supported image format.
pub fn decode_image(bytes: &[u8]) -> ClassifyResult<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| ClassifyError::invalid_image_with_source("failed to decode image bytes", e))
}
