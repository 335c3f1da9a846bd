//! Core error handling, tensor aliases, and the ONNX inference engine.

pub mod errors;
pub mod inference;

pub use errors::{ClassifyError, ClassifyResult, ConfigError};
pub use inference::{Classifier, OrtClassifier};

/// 4D `f32` tensor, the batched model input format (`[1, H, W, 3]` for
/// this crate's NHWC-trained model).
pub type Tensor4D = ndarray::Array4<f32>;

/// Initializes the tracing subscriber for logging.
///
/// Sets up the tracing subscriber with an environment filter and
/// formatting layer. Typically called once at the start of an
/// application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
