//! The classification pipeline: preprocessing, inference, and result
//! interpretation composed behind a single entry point.

use std::path::{Path, PathBuf};

use image::{DynamicImage, imageops::FilterType};
use tracing::{debug, info};

use crate::core::errors::{ClassifyResult, ConfigError};
use crate::core::inference::{Classifier, OrtClassifier};
use crate::domain::ClassificationResult;
use crate::processors::ImagePreprocessor;
use crate::utils::load_image;

/// Classifies breast ultrasound images end to end.
///
/// Owns the preprocessor and the classifier it was constructed with; the
/// classifier's model handle is shared by every `classify` call and
/// loaded lazily on the first one. Generic over [`Classifier`] so tests
/// can swap the ONNX runtime for a deterministic stub.
#[derive(Debug)]
pub struct ClassificationPipeline<C = OrtClassifier> {
    preprocessor: ImagePreprocessor,
    classifier: C,
}

impl ClassificationPipeline<OrtClassifier> {
    /// Creates a pipeline over the ONNX artifact at `model_path` with
    /// default preprocessing.
    ///
    /// The artifact is not touched until the first classification call.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        let classifier = OrtClassifier::new(model_path);
        info!("initialized pipeline for model '{}'", classifier.model_name());
        Self {
            preprocessor: ImagePreprocessor::default(),
            classifier,
        }
    }

    /// Starts building a pipeline with non-default settings.
    pub fn builder() -> ClassificationPipelineBuilder {
        ClassificationPipelineBuilder::new()
    }
}

impl<C: Classifier> ClassificationPipeline<C> {
    /// Creates a pipeline from explicit parts.
    pub fn with_classifier(preprocessor: ImagePreprocessor, classifier: C) -> Self {
        Self {
            preprocessor,
            classifier,
        }
    }

    /// The classifier this pipeline runs.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Classifies one decoded ultrasound image.
    ///
    /// Preprocessing, the forward pass, and interpretation run in strict
    /// sequence; the first failing stage aborts the call with its typed
    /// error and no partial result is returned.
    pub fn classify(&self, image: &DynamicImage) -> ClassifyResult<ClassificationResult> {
        debug!("preprocessing {}x{} input", image.width(), image.height());
        let tensor = self.preprocessor.preprocess(image)?;

        debug!("running forward pass");
        let probabilities = self.classifier.predict(&tensor)?;

        let result = ClassificationResult::from_probabilities(probabilities);
        debug!(
            label = %result.label,
            confidence = result.confidence,
            "classification complete"
        );
        Ok(result)
    }

    /// Loads an image from disk and classifies it.
    ///
    /// Decode failures surface as [`ClassifyError::InvalidImage`] before
    /// the model is ever consulted.
    ///
    /// [`ClassifyError::InvalidImage`]: crate::core::ClassifyError::InvalidImage
    pub fn classify_path(&self, path: &Path) -> ClassifyResult<ClassificationResult> {
        let image = load_image(path)?;
        self.classify(&image)
    }
}

/// Builder for [`ClassificationPipeline`] with non-default settings.
#[derive(Debug, Default)]
pub struct ClassificationPipelineBuilder {
    model_path: Option<PathBuf>,
    input_shape: Option<(u32, u32)>,
    resize_filter: Option<FilterType>,
    input_name: Option<String>,
    output_name: Option<String>,
}

impl ClassificationPipelineBuilder {
    /// Creates a builder with all settings at their defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model artifact path (required).
    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Sets the model input shape as (height, width).
    pub fn input_shape(mut self, shape: (u32, u32)) -> Self {
        self.input_shape = Some(shape);
        self
    }

    /// Sets the resampling filter used when resizing inputs.
    pub fn resize_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = Some(filter);
        self
    }

    /// Pins the model's input and output tensor names instead of
    /// discovering them from the session.
    pub fn tensor_names(mut self, input: &str, output: &str) -> Self {
        self.input_name = Some(input.to_string());
        self.output_name = Some(output.to_string());
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if no model path was provided.
    pub fn build(self) -> Result<ClassificationPipeline<OrtClassifier>, ConfigError> {
        let model_path = self
            .model_path
            .ok_or_else(|| ConfigError::new("model path is required"))?;

        let preprocessor = ImagePreprocessor::new(
            self.input_shape.unwrap_or((224, 224)),
            self.resize_filter.unwrap_or(FilterType::Lanczos3),
        );
        let classifier = OrtClassifier::new(model_path).with_tensor_names(
            self.input_name.as_deref(),
            self.output_name.as_deref(),
        );

        info!("initialized pipeline for model '{}'", classifier.model_name());
        Ok(ClassificationPipeline {
            preprocessor,
            classifier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ClassifyError;
    use crate::core::Tensor4D;
    use crate::domain::{ClassLabel, Probabilities};
    use image::{Rgb, RgbImage};

    /// Classifier stub returning a fixed distribution.
    struct FixedClassifier(Probabilities);

    impl Classifier for FixedClassifier {
        fn predict(&self, _input: &Tensor4D) -> ClassifyResult<Probabilities> {
            Ok(self.0)
        }
    }

    /// Classifier stub that records the input shape it was handed.
    struct ShapeProbe(std::sync::Mutex<Vec<usize>>);

    impl Classifier for ShapeProbe {
        fn predict(&self, input: &Tensor4D) -> ClassifyResult<Probabilities> {
            *self.0.lock().unwrap() = input.shape().to_vec();
            Ok(Probabilities::new([1.0, 0.0, 0.0]))
        }
    }

    fn ultrasound_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(512, 384, Rgb([90, 90, 90])))
    }

    #[test]
    fn test_round_trip_with_mock_classifier() {
        let pipeline = ClassificationPipeline::with_classifier(
            ImagePreprocessor::default(),
            FixedClassifier(Probabilities::new([0.05, 0.05, 0.90])),
        );

        let result = pipeline.classify(&ultrasound_image()).unwrap();
        assert_eq!(result.label, ClassLabel::Normal);
        assert_eq!(result.confidence, 90.0);
        assert_eq!(result.recommendation, ClassLabel::Normal.recommendation());
        assert_eq!(result.probabilities.as_array(), &[0.05, 0.05, 0.90]);
    }

    #[test]
    fn test_classifier_receives_model_shaped_tensor() {
        let pipeline = ClassificationPipeline::with_classifier(
            ImagePreprocessor::default(),
            ShapeProbe(std::sync::Mutex::new(Vec::new())),
        );

        pipeline.classify(&ultrasound_image()).unwrap();
        assert_eq!(&*pipeline.classifier().0.lock().unwrap(), &[1, 224, 224, 3]);
    }

    #[test]
    fn test_classifier_failure_aborts_the_call() {
        struct FailingClassifier;
        impl Classifier for FailingClassifier {
            fn predict(&self, _input: &Tensor4D) -> ClassifyResult<Probabilities> {
                Err(ClassifyError::inference_context("stub", "forced failure"))
            }
        }

        let pipeline = ClassificationPipeline::with_classifier(
            ImagePreprocessor::default(),
            FailingClassifier,
        );
        let err = pipeline.classify(&ultrasound_image()).unwrap_err();
        assert!(matches!(err, ClassifyError::Inference { .. }));
    }

    #[test]
    fn test_classify_path_rejects_unreadable_input() {
        let pipeline = ClassificationPipeline::with_classifier(
            ImagePreprocessor::default(),
            FixedClassifier(Probabilities::new([1.0, 0.0, 0.0])),
        );
        let err = pipeline
            .classify_path(Path::new("no/such/scan.png"))
            .unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidImage { .. }));
    }

    #[test]
    fn test_builder_requires_model_path() {
        assert!(ClassificationPipeline::builder().build().is_err());
    }

    #[test]
    fn test_builder_with_settings() {
        let pipeline = ClassificationPipeline::builder()
            .model_path("models/busi_mobilenet.onnx")
            .input_shape((224, 224))
            .resize_filter(FilterType::Triangle)
            .tensor_names("input_1", "dense_2")
            .build()
            .unwrap();
        assert_eq!(pipeline.classifier().model_name(), "busi_mobilenet");
    }
}
