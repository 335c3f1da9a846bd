//! Domain types for ultrasound classification.
//!
//! This module contains the diagnostic label enum with its fixed
//! recommendation table, and the result types produced by the pipeline.

pub mod labels;
pub mod result;

pub use labels::{ClassLabel, NUM_CLASSES, Severity};
pub use result::{ClassificationResult, Probabilities};
