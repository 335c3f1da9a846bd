//! ONNX Runtime inference engine with lazy, single-initialization
//! session loading.
//!
//! The session is created on the first `predict` call and cached for the
//! lifetime of the classifier. The first-load race is resolved by a
//! `OnceLock`: exactly one caller runs the load, concurrent callers wait
//! for and share the outcome. A failed load is cached too: the artifact
//! is never re-read, so every later call observes the identical
//! [`ClassifyError::ModelLoad`] until the process restarts with a fixed
//! artifact.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::TensorRef;
use tracing::debug;

use crate::core::Tensor4D;
use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::domain::{NUM_CLASSES, Probabilities};

/// A source of class probabilities for preprocessed image tensors.
///
/// The pipeline is generic over this trait so tests and alternative
/// runtimes can substitute for the ONNX-backed classifier.
pub trait Classifier {
    /// Runs the forward pass on a batched input tensor and returns the
    /// class probability distribution.
    fn predict(&self, input: &Tensor4D) -> ClassifyResult<Probabilities>;
}

/// Loaded session state: the ORT session plus its resolved tensor names.
struct LoadedSession {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

/// ONNX Runtime classifier over a single model artifact.
///
/// Construction is cheap and infallible; the artifact is loaded lazily
/// on first use. The handle is read-only after load; no weights are
/// ever mutated.
pub struct OrtClassifier {
    model_path: PathBuf,
    model_name: String,
    input_name: Option<String>,
    output_name: Option<String>,
    slot: OnceLock<Result<LoadedSession, String>>,
}

impl std::fmt::Debug for OrtClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtClassifier")
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .field("loaded", &matches!(self.slot.get(), Some(Ok(_))))
            .finish()
    }
}

impl OrtClassifier {
    /// Creates a classifier for the artifact at `model_path`.
    ///
    /// Input and output tensor names are discovered from the session's
    /// declared tensors on load; use [`with_tensor_names`] to pin them
    /// explicitly.
    ///
    /// [`with_tensor_names`]: OrtClassifier::with_tensor_names
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        let model_path = model_path.into();
        let model_name = model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();
        Self {
            model_path,
            model_name,
            input_name: None,
            output_name: None,
            slot: OnceLock::new(),
        }
    }

    /// Pins the input and output tensor names instead of discovering
    /// them from the session.
    pub fn with_tensor_names(mut self, input: Option<&str>, output: Option<&str>) -> Self {
        self.input_name = input.map(str::to_string);
        self.output_name = output.map(str::to_string);
        self
    }

    /// The path of the model artifact.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// The model name, derived from the artifact's file stem.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Whether the session has been loaded successfully.
    pub fn is_loaded(&self) -> bool {
        matches!(self.slot.get(), Some(Ok(_)))
    }

    fn load(&self) -> Result<LoadedSession, String> {
        debug!("loading model artifact from {:?}", self.model_path);
        let session = Session::builder()
            .and_then(|builder| builder.with_log_level(LogLevel::Error))
            .and_then(|builder| builder.commit_from_file(&self.model_path))
            .map_err(|e| format!("failed to create ONNX session: {e}"))?;

        let input_name = match &self.input_name {
            Some(name) => name.clone(),
            None => session
                .inputs
                .first()
                .map(|input| input.name.clone())
                .ok_or_else(|| "model declares no input tensors".to_string())?,
        };
        let output_name = match &self.output_name {
            Some(name) => name.clone(),
            None => session
                .outputs
                .first()
                .map(|output| output.name.clone())
                .ok_or_else(|| "model declares no output tensors".to_string())?,
        };

        Ok(LoadedSession {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    /// Returns the loaded session, loading it on first use.
    ///
    /// Exactly one caller performs the load; the outcome, success or
    /// failure, is cached for the lifetime of the classifier.
    fn session(&self) -> ClassifyResult<&LoadedSession> {
        match self.slot.get_or_init(|| self.load()) {
            Ok(state) => Ok(state),
            Err(context) => Err(ClassifyError::model_load(&self.model_path, context.clone())),
        }
    }
}

impl Classifier for OrtClassifier {
    fn predict(&self, input: &Tensor4D) -> ClassifyResult<Probabilities> {
        let state = self.session()?;
        let input_shape = input.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(input.view()).map_err(|e| {
            ClassifyError::inference(
                &self.model_name,
                format!("failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;
        let inputs = ort::inputs![state.input_name.as_str() => input_tensor];

        let mut session = state
            .session
            .lock()
            .map_err(|_| ClassifyError::inference_context(&self.model_name, "session lock poisoned"))?;

        let outputs = session.run(inputs).map_err(|e| {
            ClassifyError::inference(
                &self.model_name,
                format!(
                    "forward pass failed with input '{}' and shape {input_shape:?}",
                    state.input_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[state.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifyError::inference(
                    &self.model_name,
                    format!(
                        "failed to extract output tensor '{}' as f32",
                        state.output_name
                    ),
                    e,
                )
            })?;

        if output_shape.len() != 2
            || output_shape[0] != 1
            || output_shape[1] != NUM_CLASSES as i64
        {
            return Err(ClassifyError::inference_context(
                &self.model_name,
                format!("expected output shape [1, {NUM_CLASSES}], got {output_shape:?}"),
            ));
        }
        if output_data.len() != NUM_CLASSES {
            return Err(ClassifyError::inference_context(
                &self.model_name,
                format!(
                    "output data size mismatch: expected {NUM_CLASSES}, got {}",
                    output_data.len()
                ),
            ));
        }

        let mut values = [0.0f32; NUM_CLASSES];
        values.copy_from_slice(&output_data[..NUM_CLASSES]);
        Ok(Probabilities::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn model_input() -> Tensor4D {
        Tensor4D::zeros((1, 224, 224, 3))
    }

    #[test]
    fn test_model_name_derived_from_file_stem() {
        let classifier = OrtClassifier::new("models/busi_mobilenet.onnx");
        assert_eq!(classifier.model_name(), "busi_mobilenet");
        assert!(!classifier.is_loaded());
    }

    #[test]
    fn test_missing_artifact_is_a_model_load_error() {
        let classifier = OrtClassifier::new("definitely/missing/model.onnx");
        match classifier.predict(&model_input()) {
            Err(ClassifyError::ModelLoad { path, .. }) => {
                assert_eq!(path, PathBuf::from("definitely/missing/model.onnx"));
            }
            other => panic!("expected ModelLoad error, got {other:?}"),
        }
        assert!(!classifier.is_loaded());
    }

    #[test]
    fn test_load_failure_is_cached_and_identical() {
        let classifier = OrtClassifier::new("definitely/missing/model.onnx");
        let first = classifier.predict(&model_input()).unwrap_err().to_string();
        let second = classifier.predict(&model_input()).unwrap_err().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_first_calls_share_one_load_outcome() {
        let classifier = Arc::new(OrtClassifier::new("definitely/missing/model.onnx"));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let classifier = Arc::clone(&classifier);
                std::thread::spawn(move || {
                    classifier.predict(&model_input()).unwrap_err().to_string()
                })
            })
            .collect();

        let messages: Vec<String> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        assert!(messages.iter().all(|m| m == &messages[0]));
        assert!(messages[0].contains("model load failed"));
    }
}
