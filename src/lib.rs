//! # sono-triage
//!
//! A Rust library that classifies breast ultrasound images into
//! diagnostic categories using ONNX models. Each classification produces
//! a structured, explainable result: the predicted label, a confidence
//! percentage, the full class probability distribution, and a
//! severity-framed follow-up recommendation.
//!
//! ## Features
//!
//! - Fixed-contract preprocessing: any image mode and size to a
//!   `[1, 224, 224, 3]` float tensor in `[0.0, 1.0]`
//! - Lazily-loaded, cached ONNX Runtime session with single-init
//!   guarantees under concurrency
//! - Closed diagnostic label set with an exhaustive recommendation table
//! - Typed, closed error taxonomy; calls fully succeed or fully fail
//!
//! ## Modules
//!
//! * [`core`] - Error handling, tensor aliases, and the ONNX inference engine
//! * [`domain`] - Diagnostic labels, probabilities, and result types
//! * [`pipeline`] - The end-to-end classification pipeline
//! * [`processors`] - Image preprocessing
//! * [`utils`] - Image ingestion helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sono_triage::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = ClassificationPipeline::new("models/busi_mobilenet.onnx");
//!
//! let result = pipeline.classify_path(Path::new("scan.png"))?;
//! println!(
//!     "{} ({:.1}%): {}",
//!     result.label, result.confidence, result.recommendation
//! );
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use sono_triage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{ClassifyError, ClassifyResult, Classifier, OrtClassifier};
    pub use crate::domain::{ClassLabel, ClassificationResult, Probabilities, Severity};
    pub use crate::pipeline::{ClassificationPipeline, ClassificationPipelineBuilder};
    pub use crate::processors::ImagePreprocessor;
    pub use crate::utils::{decode_image, load_image};
}
