//! Error types for the classification pipeline.
//!
//! The pipeline surfaces a closed, three-kind error taxonomy: input
//! images that cannot be decoded or normalized, model artifacts that
//! cannot be loaded, and forward passes that fail at runtime. Callers
//! match on [`ClassifyError`] exhaustively; no failure is ever replaced
//! with a default result.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Convenient result alias for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Errors produced by the classification pipeline.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The input could not be decoded or normalized into pixel data.
    ///
    /// Upload validation is expected to reject malformed files before
    /// they reach the pipeline; this variant is surfaced if one gets
    /// through anyway.
    #[error("invalid image: {context}")]
    InvalidImage {
        /// What was being done with the image when it failed.
        context: String,
        /// The underlying decode error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The model artifact is missing, corrupt, or incompatible with the
    /// runtime.
    ///
    /// Fatal for classification: the failure is cached by the classifier
    /// and returned unchanged on every subsequent call, without retrying,
    /// until the process restarts with a fixed artifact. The variant
    /// carries the failure as text (rather than a source error) so the
    /// cached outcome can be reproduced identically per call.
    #[error("model load failed for '{}': {context}", .path.display())]
    ModelLoad {
        /// Path of the artifact that failed to load.
        path: PathBuf,
        /// Description of the load failure.
        context: String,
    },

    /// The forward pass failed at runtime.
    ///
    /// Per-call: the cached session stays valid and later calls with
    /// different inputs may still succeed.
    #[error("inference failed for model '{model}': {context}")]
    Inference {
        /// Name of the model that failed.
        model: String,
        /// What the forward pass was doing when it failed.
        context: String,
        /// The underlying runtime error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ClassifyError {
    /// Creates an invalid-image error without an underlying source.
    pub fn invalid_image(context: impl Into<String>) -> Self {
        Self::InvalidImage {
            context: context.into(),
            source: None,
        }
    }

    /// Creates an invalid-image error wrapping an underlying decode or
    /// tensor error.
    pub fn invalid_image_with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidImage {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a model-load error for the given artifact path.
    pub fn model_load(path: &Path, context: impl Into<String>) -> Self {
        Self::ModelLoad {
            path: path.to_path_buf(),
            context: context.into(),
        }
    }

    /// Creates an inference error wrapping an underlying runtime error.
    pub fn inference(
        model: &str,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model: model.to_string(),
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an inference error from context alone.
    pub fn inference_context(model: &str, context: impl Into<String>) -> Self {
        Self::Inference {
            model: model.to_string(),
            context: context.into(),
            source: None,
        }
    }
}

impl From<image::ImageError> for ClassifyError {
    fn from(error: image::ImageError) -> Self {
        Self::invalid_image_with_source("image decode failed", error)
    }
}

/// Error raised when pipeline construction parameters are invalid.
///
/// Kept separate from [`ClassifyError`]: configuration problems are
/// build-time failures, not per-call classification outcomes.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("configuration: {message}")]
pub struct ConfigError {
    /// A message describing the invalid parameter.
    pub message: String,
}

impl ConfigError {
    /// Creates a configuration error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_load_message_includes_path() {
        let err = ClassifyError::model_load(Path::new("models/busi.onnx"), "file not found");
        let message = err.to_string();
        assert!(message.contains("models/busi.onnx"));
        assert!(message.contains("file not found"));
    }

    #[test]
    fn test_invalid_image_from_decode_error() {
        let decode_err = image::ImageError::Unsupported(
            image::error::UnsupportedError::from_format_and_kind(
                image::error::ImageFormatHint::Unknown,
                image::error::UnsupportedErrorKind::GenericFeature("bad".to_string()),
            ),
        );
        let err: ClassifyError = decode_err.into();
        assert!(matches!(err, ClassifyError::InvalidImage { .. }));
    }
}
