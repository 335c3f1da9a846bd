//! Utility functions for image ingestion.

pub mod image;

pub use image::{decode_image, load_image};
