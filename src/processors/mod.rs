//! Image processing for the classification pipeline.
//!
//! This module turns arbitrary decoded images into the fixed numeric
//! tensor the classifier expects: RGB conversion, resampling to the
//! model input shape, and intensity normalization.

pub mod normalization;
pub mod preprocess;

pub use normalization::{ChannelOrder, NormalizeImage};
pub use preprocess::ImagePreprocessor;
