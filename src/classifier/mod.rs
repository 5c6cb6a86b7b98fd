use serde::{Deserialize, Serialize};

mod classifier;
mod decode;
mod error;
mod labels;
mod locator;
mod options;
pub mod builder;

pub use builder::ClassifierBuilder;
pub use classifier::{Category, Classifier};
pub use error::ClassifierError;
pub use options::ClassifierOptions;

/// Which label source a classifier selected at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelSourceKind {
    /// Labels loaded once from a metadata-declared label file.
    Metadata,
    /// Labels read per call from a string-typed output tensor.
    LabelTensor,
    /// No labels available; categories are labeled "0", "1", ...
    Positional,
}

/// Information about the resolved bindings of a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierInfo {
    /// Name of the resolved output score tensor
    pub output_score_tensor: String,
    /// Number of output categories, derived from the score tensor's shape
    pub category_count: usize,
    /// The label source in effect for every classification call
    pub label_source: LabelSourceKind,
}
