//! Read-only view of a model package's declarative metadata.
//!
//! The metadata is embedded in the model file by whoever authored it and is
//! parsed by an external extractor; this crate only consumes the result.
//! Legacy models may carry no metadata at all, which is modeled as
//! [`ModelMetadata::empty`] rather than as an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The declared purpose of a file bundled with the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssociatedFileKind {
    Unknown,
    Descriptions,
    /// Labels for the elements along a tensor axis, one per line.
    TensorAxisLabels,
    TensorValueLabels,
    TensorAxisScores,
    Vocabulary,
}

/// A named blob bundled in the model package, resolved to bytes on demand
/// via [`ModelMetadata::associated_file`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedFile {
    pub name: String,
    pub kind: AssociatedFileKind,
}

impl AssociatedFile {
    pub fn new(name: impl Into<String>, kind: AssociatedFileKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Descriptive record for one tensor. Every field is optional in the wire
/// schema, so absence is the common case for hand-converted models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TensorMetadata {
    pub name: Option<String>,
    pub associated_files: Vec<AssociatedFile>,
}

impl TensorMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            associated_files: Vec::new(),
        }
    }

    pub fn with_associated_file(mut self, file: AssociatedFile) -> Self {
        self.associated_files.push(file);
        self
    }
}

/// Everything the metadata extractor exposes about a loaded model: the
/// per-tensor metadata lists (index-aligned with the engine's tensor lists
/// when present and consistent) and the bundled file contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    input_tensor_metadata: Option<Vec<TensorMetadata>>,
    output_tensor_metadata: Option<Vec<TensorMetadata>>,
    associated_files: HashMap<String, Vec<u8>>,
}

impl ModelMetadata {
    /// Metadata for a model that carries none.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_input_tensor_metadata(mut self, metadata: Vec<TensorMetadata>) -> Self {
        self.input_tensor_metadata = Some(metadata);
        self
    }

    pub fn with_output_tensor_metadata(mut self, metadata: Vec<TensorMetadata>) -> Self {
        self.output_tensor_metadata = Some(metadata);
        self
    }

    pub fn with_associated_file(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.associated_files.insert(name.into(), bytes);
        self
    }

    pub fn input_tensor_metadata(&self) -> Option<&[TensorMetadata]> {
        self.input_tensor_metadata.as_deref()
    }

    pub fn output_tensor_metadata(&self) -> Option<&[TensorMetadata]> {
        self.output_tensor_metadata.as_deref()
    }

    pub fn associated_file(&self, name: &str) -> Option<&[u8]> {
        self.associated_files.get(name).map(Vec::as_slice)
    }
}
