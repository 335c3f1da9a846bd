//! Pixel intensity normalization.
//!
//! Converts 8-bit RGB pixels to floating point with a per-channel affine
//! transform. The parameters are folded into `alpha = scale / std` and
//! `beta = -mean / std` once at construction so the per-pixel work is a
//! single multiply-add.

use image::RgbImage;
use ndarray::Array4;

use crate::core::errors::{ClassifyError, ClassifyResult, ConfigError};
use crate::core::Tensor4D;

/// Specifies the order of channels in an image tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Channel, Height, Width order (common in PyTorch-trained models).
    CHW,
    /// Height, Width, Channel order (common in TensorFlow-trained models).
    HWC,
}

/// Normalizes RGB images into batched float tensors.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Scaling factors per channel (alpha = scale / std).
    alpha: [f32; 3],
    /// Offset values per channel (beta = -mean / std).
    beta: [f32; 3],
    /// Channel ordering of the produced tensor.
    order: ChannelOrder,
}

impl NormalizeImage {
    /// Creates a normalizer from scale, mean, and standard deviation.
    ///
    /// Defaults: `scale = 1/255`, identity mean/std, HWC order, the
    /// parameters the ultrasound model was trained with, mapping 8-bit
    /// intensities onto `[0.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `scale <= 0` or any standard
    /// deviation is `<= 0`.
    pub fn new(
        scale: Option<f32>,
        mean: Option<[f32; 3]>,
        std: Option<[f32; 3]>,
        order: Option<ChannelOrder>,
    ) -> Result<Self, ConfigError> {
        let scale = scale.unwrap_or(1.0 / 255.0);
        let mean = mean.unwrap_or([0.0, 0.0, 0.0]);
        let std = std.unwrap_or([1.0, 1.0, 1.0]);
        let order = order.unwrap_or(ChannelOrder::HWC);

        if scale <= 0.0 {
            return Err(ConfigError::new(format!(
                "scale must be greater than 0, got {scale}"
            )));
        }
        for (i, &s) in std.iter().enumerate() {
            if s <= 0.0 {
                return Err(ConfigError::new(format!(
                    "standard deviation at index {i} must be greater than 0, got {s}"
                )));
            }
        }

        let mut alpha = [0.0f32; 3];
        let mut beta = [0.0f32; 3];
        for c in 0..3 {
            alpha[c] = scale / std[c];
            beta[c] = -mean[c] / std[c];
        }

        Ok(Self { alpha, beta, order })
    }

    /// A normalizer that scales 8-bit intensities to `[0.0, 1.0]` in HWC
    /// order, with no mean/std adjustment.
    pub fn unit_scale() -> Self {
        Self {
            alpha: [1.0 / 255.0; 3],
            beta: [0.0; 3],
            order: ChannelOrder::HWC,
        }
    }

    /// The channel ordering of tensors this normalizer produces.
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Normalizes a single RGB image into a batched 4D tensor.
    ///
    /// The output shape is `[1, H, W, 3]` for HWC order or
    /// `[1, 3, H, W]` for CHW.
    pub fn normalize_to(&self, img: &RgbImage) -> ClassifyResult<Tensor4D> {
        let (width, height) = img.dimensions();
        let (w, h) = (width as usize, height as usize);
        let channels = 3usize;

        let mut data = vec![0.0f32; channels * h * w];
        match self.order {
            ChannelOrder::HWC => {
                for (i, pixel) in img.pixels().enumerate() {
                    for c in 0..channels {
                        data[i * channels + c] = pixel[c] as f32 * self.alpha[c] + self.beta[c];
                    }
                }
            }
            ChannelOrder::CHW => {
                let plane = h * w;
                for (i, pixel) in img.pixels().enumerate() {
                    for c in 0..channels {
                        data[c * plane + i] = pixel[c] as f32 * self.alpha[c] + self.beta[c];
                    }
                }
            }
        }

        let shape = match self.order {
            ChannelOrder::HWC => (1, h, w, channels),
            ChannelOrder::CHW => (1, channels, h, w),
        };
        Array4::from_shape_vec(shape, data).map_err(|e| {
            ClassifyError::invalid_image_with_source(
                format!("failed to shape normalized tensor for {width}x{height} image"),
                e,
            )
        })
    }
}
