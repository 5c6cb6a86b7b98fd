use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::decode::score_at;
use super::error::ClassifierError;
use super::labels::{labels_from_metadata, LabelSource};
use super::locator::{find_tensor, find_tensor_index};
use super::options::ClassifierOptions;
use super::{ClassifierInfo, LabelSourceKind};
use crate::engine::{EngineLoader, InferenceEngine, ModelSource, Tensor, TensorType};
use crate::metadata::ModelMetadata;

/// One classification outcome: a label and its score, in tensor-index
/// order. Results are not sorted by score; ranking is a caller concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub score: f32,
}

/// A text classifier bound to a loaded model.
///
/// Construction validates the whole model contract: the input tensor must
/// be string-typed, the output score tensor must be one of the supported
/// numeric types, and a label source is selected once (metadata label file,
/// explicit label tensor, or positional indices). A successfully
/// constructed classifier therefore classifies any text, including the
/// empty string.
///
/// `classify` takes `&mut self` because each call writes the engine's input
/// buffers; the resolved bindings themselves never change after
/// construction.
///
/// # Example
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use wernicke::{Classifier, Tensor};
/// use wernicke::testing::StaticEngine;
///
/// let engine = StaticEngine::new(
///     vec![Tensor::string_input("INPUT")],
///     vec![Tensor::from_f32("OUTPUT_SCORE", vec![1, 3], &[0.1, 0.7, 0.2])],
/// );
/// let mut classifier = Classifier::builder()
///     .with_engine(Box::new(engine))
///     .build()?;
///
/// let categories = classifier.classify("this is great")?;
/// assert_eq!(categories.len(), 3);
/// assert_eq!(categories[1].label, "1");
/// assert_eq!(categories[1].score, 0.7);
/// # Ok(())
/// # }
/// ```
pub struct Classifier {
    engine: Box<dyn InferenceEngine>,
    metadata: ModelMetadata,
    options: ClassifierOptions,
    labels: LabelSource,
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("options", &self.options)
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Binds the model contract described by `options` against the engine's
    /// tensors and the model's metadata.
    ///
    /// # Errors
    /// * `InputTensorNotFound` / `InvalidInputTensorType` - no input tensor
    ///   matches the selector, or it is not string-typed
    /// * `OutputTensorNotFound` / `InvalidOutputTensorType` - no score
    ///   tensor matches the selector, or its type is unsupported; also
    ///   raised when an explicit label tensor is found but not string-typed
    pub fn new(
        mut engine: Box<dyn InferenceEngine>,
        metadata: ModelMetadata,
        options: ClassifierOptions,
    ) -> Result<Self, ClassifierError> {
        {
            let inputs = engine.input_tensors();
            let input = find_tensor(
                inputs,
                metadata.input_tensor_metadata(),
                &options.input_tensor_name,
                Some(options.input_tensor_index),
            )
            .ok_or_else(|| ClassifierError::InputTensorNotFound {
                name: options.input_tensor_name.clone(),
                index: options.input_tensor_index,
            })?;
            if input.tensor_type() != TensorType::String {
                return Err(ClassifierError::InvalidInputTensorType {
                    name: input.name().to_owned(),
                    found: input.tensor_type(),
                });
            }
        }

        let labels = {
            let outputs = engine.output_tensors();
            let scores = find_tensor(
                outputs,
                metadata.output_tensor_metadata(),
                &options.output_score_tensor_name,
                Some(options.output_score_tensor_index),
            )
            .ok_or_else(|| ClassifierError::OutputTensorNotFound {
                name: options.output_score_tensor_name.clone(),
                index: options.output_score_tensor_index,
            })?;
            match scores.tensor_type() {
                TensorType::UInt8
                | TensorType::Int8
                | TensorType::Int16
                | TensorType::Float32
                | TensorType::Float64 => {}
                other => {
                    return Err(ClassifierError::InvalidOutputTensorType {
                        name: scores.name().to_owned(),
                        requested: "one of UINT8/INT8/INT16/FLOAT32/FLOAT64",
                        found: other,
                    });
                }
            }
            resolve_label_source(outputs, &metadata, &options)?
        };

        info!(
            "classifier initialized with {} labels",
            match &labels {
                LabelSource::Eager(list) => format!("{} metadata", list.len()),
                LabelSource::Lazy => "tensor-backed".to_string(),
                LabelSource::Positional => "positional".to_string(),
            }
        );

        Ok(Self {
            engine,
            metadata,
            options,
            labels,
        })
    }

    /// Loads an engine from `source` and binds the contract, mirroring
    /// construction from a model buffer, file path or descriptor.
    pub fn from_loader(
        loader: &dyn EngineLoader,
        source: ModelSource<'_>,
        metadata: ModelMetadata,
        options: ClassifierOptions,
    ) -> Result<Self, ClassifierError> {
        let engine = loader.load(source)?;
        Self::new(engine, metadata, options)
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// Returns information about the classifier's resolved bindings
    pub fn info(&self) -> ClassifierInfo {
        let outputs = self.engine.output_tensors();
        let scores = self.score_tensor(outputs);
        ClassifierInfo {
            output_score_tensor: scores.name().to_owned(),
            category_count: category_count(scores),
            label_source: match &self.labels {
                LabelSource::Eager(_) => LabelSourceKind::Metadata,
                LabelSource::Lazy => LabelSourceKind::LabelTensor,
                LabelSource::Positional => LabelSourceKind::Positional,
            },
        }
    }

    /// Classifies `text`, returning one `(label, score)` pair per output
    /// category in tensor-index order.
    ///
    /// # Errors
    /// Only the engine's `run` can fail here; preprocessing and
    /// postprocessing never do once construction has succeeded.
    pub fn classify(&mut self, text: &str) -> Result<Vec<Category>, ClassifierError> {
        self.preprocess(text);
        self.engine.run()?;
        Ok(self.postprocess())
    }

    fn preprocess(&mut self, text: &str) {
        let metadata = self.metadata.input_tensor_metadata();
        let inputs = self.engine.input_tensors();
        if let Some(index) = find_tensor_index(
            inputs,
            metadata,
            &self.options.input_tensor_name,
            Some(self.options.input_tensor_index),
        ) {
            inputs[index].set_string(text);
        }
    }

    fn postprocess(&self) -> Vec<Category> {
        let outputs = self.engine.output_tensors();
        let output_metadata = self.metadata.output_tensor_metadata();
        let scores = self.score_tensor(outputs);
        let label_tensor = match self.labels {
            LabelSource::Lazy => find_tensor(
                outputs,
                output_metadata,
                &self.options.output_label_tensor_name,
                self.options.output_label_tensor_index,
            ),
            _ => None,
        };

        let categories = category_count(scores);
        let mut predictions = Vec::with_capacity(categories);
        for index in 0..categories {
            let label = match &self.labels {
                LabelSource::Eager(list) => list
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| index.to_string()),
                LabelSource::Lazy => label_tensor
                    .and_then(|tensor| tensor.string_at(index))
                    .map(str::to_owned)
                    .unwrap_or_else(|| index.to_string()),
                LabelSource::Positional => index.to_string(),
            };
            predictions.push(Category {
                label,
                score: score_at(scores, index),
            });
        }
        predictions
    }

    fn score_tensor<'a>(&self, outputs: &'a [Tensor]) -> &'a Tensor {
        match find_tensor(
            outputs,
            self.metadata.output_tensor_metadata(),
            &self.options.output_score_tensor_name,
            Some(self.options.output_score_tensor_index),
        ) {
            Some(tensor) => tensor,
            None => unreachable!("score tensor binding is validated at initialization"),
        }
    }
}

/// Some models emit scores with transposed shape [1, categories].
fn category_count(scores: &Tensor) -> usize {
    let dims = scores.dims();
    if dims.len() == 2 {
        dims[1]
    } else {
        dims[0]
    }
}

/// Selects the label source, in priority order: a label file declared in
/// output-tensor metadata (only trusted when the metadata tensor count
/// matches the runtime output count), then an explicit string-typed label
/// tensor, then positional indices.
fn resolve_label_source(
    outputs: &[Tensor],
    metadata: &ModelMetadata,
    options: &ClassifierOptions,
) -> Result<LabelSource, ClassifierError> {
    if let Some(output_metadata) = metadata.output_tensor_metadata() {
        if output_metadata.len() == outputs.len() {
            for entry in output_metadata {
                if entry.name.as_deref() == Some(options.output_score_tensor_name.as_str()) {
                    match labels_from_metadata(Some(entry), metadata) {
                        Ok(list) => {
                            info!("loaded {} labels from model metadata", list.len());
                            return Ok(LabelSource::Eager(list));
                        }
                        Err(err) => {
                            debug!("metadata labels unavailable for {:?}: {}", entry.name, err)
                        }
                    }
                }
            }
        } else {
            debug!(
                "metadata declares {} output tensors but the model has {}; skipping metadata label resolution",
                output_metadata.len(),
                outputs.len()
            );
        }
    }

    if let Some(label_tensor) = find_tensor(
        outputs,
        metadata.output_tensor_metadata(),
        &options.output_label_tensor_name,
        options.output_label_tensor_index,
    ) {
        if label_tensor.tensor_type() != TensorType::String {
            return Err(ClassifierError::InvalidOutputTensorType {
                name: label_tensor.name().to_owned(),
                requested: "STRING",
                found: label_tensor.tensor_type(),
            });
        }
        info!("using output label tensor {:?}", label_tensor.name());
        return Ok(LabelSource::Lazy);
    }

    debug!("no label source available; falling back to positional labels");
    Ok(LabelSource::Positional)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{AssociatedFile, AssociatedFileKind, TensorMetadata};
    use crate::testing::StaticEngine;

    fn float_engine() -> StaticEngine {
        StaticEngine::new(
            vec![Tensor::string_input("INPUT")],
            vec![Tensor::from_f32("OUTPUT_SCORE", vec![3], &[0.2, 0.5, 0.3])],
        )
    }

    #[test]
    fn test_positional_labels_without_metadata() {
        let mut classifier = Classifier::new(
            Box::new(float_engine()),
            ModelMetadata::empty(),
            ClassifierOptions::default(),
        )
        .unwrap();

        let categories = classifier.classify("hello").unwrap();
        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].label, "0");
        assert_eq!(categories[2].label, "2");
        assert_eq!(categories[1].score, 0.5);
    }

    #[test]
    fn test_metadata_labels_load_eagerly() {
        let metadata = ModelMetadata::empty()
            .with_output_tensor_metadata(vec![TensorMetadata::named("OUTPUT_SCORE")
                .with_associated_file(AssociatedFile::new(
                    "labels.txt",
                    AssociatedFileKind::TensorAxisLabels,
                ))])
            .with_associated_file("labels.txt", b"negative\nneutral\npositive\n".to_vec());

        let mut classifier = Classifier::new(
            Box::new(float_engine()),
            metadata,
            ClassifierOptions::default(),
        )
        .unwrap();

        assert_eq!(classifier.info().label_source, LabelSourceKind::Metadata);
        let categories = classifier.classify("so good").unwrap();
        let labels: Vec<&str> = categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["negative", "neutral", "positive"]);
    }

    #[test]
    fn test_engine_run_failure_propagates() {
        let mut classifier = Classifier::new(
            Box::new(StaticEngine::failing(
                vec![Tensor::string_input("INPUT")],
                vec![Tensor::from_f32("OUTPUT_SCORE", vec![2], &[0.0, 0.0])],
            )),
            ModelMetadata::empty(),
            ClassifierOptions::default(),
        )
        .unwrap();

        let err = classifier.classify("text").unwrap_err();
        assert_eq!(err.code(), "ENGINE_ERROR");
    }

    #[test]
    fn test_info_reports_bindings() {
        let classifier = Classifier::new(
            Box::new(float_engine()),
            ModelMetadata::empty(),
            ClassifierOptions::default(),
        )
        .unwrap();

        let info = classifier.info();
        assert_eq!(info.output_score_tensor, "OUTPUT_SCORE");
        assert_eq!(info.category_count, 3);
        assert_eq!(info.label_source, LabelSourceKind::Positional);
    }
}
