use std::fmt;

use log::info;

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::options::ClassifierOptions;
use crate::engine::{EngineLoader, InferenceEngine, ModelSource};
use crate::metadata::ModelMetadata;

/// A builder for constructing a Classifier with a fluent interface.
///
/// The engine is mandatory; metadata defaults to
/// [`ModelMetadata::empty`] (a legacy model with no metadata) and options
/// default to the conventional selectors.
///
/// # Example
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use wernicke::{Classifier, Tensor};
/// use wernicke::testing::StaticEngine;
///
/// let engine = StaticEngine::new(
///     vec![Tensor::string_input("text")],
///     vec![Tensor::from_f32("probabilities", vec![2], &[0.9, 0.1])],
/// );
/// let classifier = Classifier::builder()
///     .with_engine(Box::new(engine))
///     .with_input_tensor("text", 0)
///     .with_output_score_tensor("probabilities", 0)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ClassifierBuilder {
    engine: Option<Box<dyn InferenceEngine>>,
    metadata: Option<ModelMetadata>,
    options: ClassifierOptions,
}

impl fmt::Debug for ClassifierBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierBuilder")
            .field("engine", &self.engine.is_some())
            .field("metadata", &self.metadata)
            .field("options", &self.options)
            .finish()
    }
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder with default selectors
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an already-loaded inference engine
    pub fn with_engine(mut self, engine: Box<dyn InferenceEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Loads the engine from a model source through `loader`
    ///
    /// # Errors
    /// * `Build` if an engine was already set
    /// * `Engine` if the loader fails to load the model
    pub fn with_loader(
        mut self,
        loader: &dyn EngineLoader,
        source: ModelSource<'_>,
    ) -> Result<Self, ClassifierError> {
        if self.engine.is_some() {
            return Err(ClassifierError::Build("engine already set".to_string()));
        }
        let engine = loader.load(source)?;
        info!("engine loaded from model source");
        self.engine = Some(engine);
        Ok(self)
    }

    /// Sets the model's declarative metadata, as produced by an external
    /// metadata extractor
    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Replaces the full option set at once
    pub fn with_options(mut self, options: ClassifierOptions) -> Self {
        self.options = options;
        self
    }

    /// Selects the input text tensor by name and fallback index
    pub fn with_input_tensor(mut self, name: impl Into<String>, index: usize) -> Self {
        self.options.input_tensor_name = name.into();
        self.options.input_tensor_index = index;
        self
    }

    /// Selects the output score tensor by name and fallback index
    pub fn with_output_score_tensor(mut self, name: impl Into<String>, index: usize) -> Self {
        self.options.output_score_tensor_name = name.into();
        self.options.output_score_tensor_index = index;
        self
    }

    /// Selects the optional output label tensor by name and fallback index
    pub fn with_output_label_tensor(
        mut self,
        name: impl Into<String>,
        index: Option<usize>,
    ) -> Self {
        self.options.output_label_tensor_name = name.into();
        self.options.output_label_tensor_index = index;
        self
    }

    /// Builds the final Classifier, running full contract validation
    ///
    /// # Errors
    /// * `Build` if no engine was provided
    /// * Any initialization error from [`Classifier::new`]
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        let engine = self.engine.ok_or_else(|| {
            ClassifierError::Build("an inference engine must be set".to_string())
        })?;
        let metadata = self.metadata.unwrap_or_else(ModelMetadata::empty);
        Classifier::new(engine, metadata, self.options)
    }
}
