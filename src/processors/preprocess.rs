//! Image preprocessing: arbitrary decoded images to the fixed model
//! input tensor.

use image::{DynamicImage, imageops::FilterType};
use tracing::debug;

use crate::core::ClassifyResult;
use crate::core::Tensor4D;

use super::normalization::NormalizeImage;

/// Normalizes an arbitrary decoded image into the tensor the classifier
/// expects.
///
/// Every input mode is accepted: alpha channels are dropped, palette and
/// single-channel images are expanded to RGB. The image is resampled to
/// the target shape without preserving aspect ratio: the model was
/// trained on distorted resizes, so no letterboxing or cropping is done.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    /// Target input shape (height, width).
    input_shape: (u32, u32),
    /// Resampling filter used for resizing.
    resize_filter: FilterType,
    /// Intensity normalizer.
    normalizer: NormalizeImage,
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self {
            input_shape: (224, 224),
            resize_filter: FilterType::Lanczos3,
            normalizer: NormalizeImage::unit_scale(),
        }
    }
}

impl ImagePreprocessor {
    /// Creates a preprocessor for the given input shape and filter, with
    /// unit-scale normalization.
    pub fn new(input_shape: (u32, u32), resize_filter: FilterType) -> Self {
        Self {
            input_shape,
            resize_filter,
            normalizer: NormalizeImage::unit_scale(),
        }
    }

    /// Replaces the intensity normalizer.
    pub fn with_normalizer(mut self, normalizer: NormalizeImage) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The target input shape (height, width).
    pub fn input_shape(&self) -> (u32, u32) {
        self.input_shape
    }

    /// Converts a decoded image into a batched float tensor.
    ///
    /// For the default configuration the output is `[1, 224, 224, 3]`
    /// f32 with every value in `[0.0, 1.0]`, regardless of the source
    /// image's dimensions or color mode.
    pub fn preprocess(&self, image: &DynamicImage) -> ClassifyResult<Tensor4D> {
        let rgb = image.to_rgb8();
        let (height, width) = self.input_shape;
        debug!(
            "resizing {}x{} image to {}x{}",
            rgb.width(),
            rgb.height(),
            width,
            height
        );
        let resized = image::imageops::resize(&rgb, width, height, self.resize_filter);
        self.normalizer.normalize_to(&resized)
    }
}
