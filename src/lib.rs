//! A typed natural-language classification layer over metadata-described
//! inference models.
//!
//! Given raw text, a [`Classifier`] returns an ordered list of
//! [`Category`] (label, score) pairs. Inference itself is delegated to an
//! [`engine::InferenceEngine`] collaborator; this crate owns the
//! model-contract resolution: discovering, validating and binding the
//! input/output tensors and their label data from the declarative metadata
//! embedded in the model package, with graceful fallback when metadata is
//! absent or incomplete.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use wernicke::{Classifier, ModelMetadata, Tensor};
//! use wernicke::metadata::{AssociatedFile, AssociatedFileKind, TensorMetadata};
//! use wernicke::testing::StaticEngine;
//!
//! // A real deployment would load an engine through an `EngineLoader`;
//! // a pre-seeded engine shows the contract end to end.
//! let engine = StaticEngine::new(
//!     vec![Tensor::string_input("INPUT")],
//!     vec![Tensor::from_f32("OUTPUT_SCORE", vec![1, 2], &[0.8, 0.2])],
//! );
//! let metadata = ModelMetadata::empty()
//!     .with_output_tensor_metadata(vec![TensorMetadata::named("OUTPUT_SCORE")
//!         .with_associated_file(AssociatedFile::new(
//!             "labels.txt",
//!             AssociatedFileKind::TensorAxisLabels,
//!         ))])
//!     .with_associated_file("labels.txt", b"positive\nnegative\n".to_vec());
//!
//! let mut classifier = Classifier::builder()
//!     .with_engine(Box::new(engine))
//!     .with_metadata(metadata)
//!     .build()?;
//!
//! let categories = classifier.classify("This is a great movie!")?;
//! assert_eq!(categories[0].label, "positive");
//! assert_eq!(categories[0].score, 0.8);
//! # Ok(())
//! # }
//! ```
//!
//! # Degraded modes
//!
//! Models without usable label metadata still classify: an explicit
//! string-typed label tensor is read per call if one is configured, and
//! failing that, categories are labeled by their position (`"0"`, `"1"`,
//! ...). Which mode is in effect is reported by
//! [`Classifier::info`](classifier::Classifier::info).

pub mod classifier;
pub mod engine;
pub mod metadata;
pub mod model_manager;
pub mod testing;

pub use classifier::{
    Category, Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, ClassifierOptions,
    LabelSourceKind,
};
pub use engine::{
    EngineError, EngineLoader, InferenceEngine, ModelSource, QuantParams, Tensor, TensorData,
    TensorType,
};
pub use metadata::{AssociatedFile, AssociatedFileKind, ModelMetadata, TensorMetadata};
pub use model_manager::{ModelError, ModelManager, PackageInfo};

pub fn init_logger() {
    env_logger::init();
}
