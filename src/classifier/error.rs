use crate::engine::{EngineError, TensorType};

/// Errors raised while binding the model contract or running a
/// classification.
///
/// Initialization failures are terminal for the classifier instance under
/// construction. `MetadataNotFound` and `MissingLabels` additionally drive
/// the label-fallback paths inside initialization and only surface as hard
/// errors when label resolution is invoked standalone.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("no input tensor found with name {name:?} or at index {index}")]
    InputTensorNotFound { name: String, index: usize },
    #[error("type mismatch for input tensor {name:?}: requested STRING, got {found}")]
    InvalidInputTensorType { name: String, found: TensorType },
    #[error("no output score tensor found with name {name:?} or at index {index}")]
    OutputTensorNotFound { name: String, index: usize },
    #[error("type mismatch for output tensor {name:?}: requested {requested}, got {found}")]
    InvalidOutputTensorType {
        name: String,
        requested: &'static str,
        found: TensorType,
    },
    #[error("metadata not found for output tensor")]
    MetadataNotFound,
    #[error("no usable label file found in tensor metadata")]
    MissingLabels,
    #[error("build error: {0}")]
    Build(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ClassifierError {
    /// Machine-readable code for the failure, stable across message changes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InputTensorNotFound { .. } => "INPUT_TENSOR_NOT_FOUND",
            Self::InvalidInputTensorType { .. } => "INVALID_INPUT_TENSOR_TYPE",
            Self::OutputTensorNotFound { .. } => "OUTPUT_TENSOR_NOT_FOUND",
            Self::InvalidOutputTensorType { .. } => "INVALID_OUTPUT_TENSOR_TYPE",
            Self::MetadataNotFound => "METADATA_NOT_FOUND",
            Self::MissingLabels => "METADATA_MISSING_LABELS",
            Self::Build(_) => "BUILD_ERROR",
            Self::Engine(_) => "ENGINE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_messages() {
        let err = ClassifierError::InputTensorNotFound {
            name: "INPUT".to_string(),
            index: 0,
        };
        assert_eq!(err.code(), "INPUT_TENSOR_NOT_FOUND");
        assert!(err.to_string().contains("INPUT"));

        let err = ClassifierError::InvalidOutputTensorType {
            name: "OUTPUT_SCORE".to_string(),
            requested: "UINT8/INT8/INT16/FLOAT32/FLOAT64",
            found: TensorType::Bool,
        };
        assert_eq!(err.code(), "INVALID_OUTPUT_TENSOR_TYPE");
        assert!(err.to_string().contains("BOOL"));

        assert_eq!(ClassifierError::MissingLabels.code(), "METADATA_MISSING_LABELS");
    }

    #[test]
    fn test_engine_error_propagates() {
        let err = ClassifierError::from(EngineError::Run("bad buffer".to_string()));
        assert_eq!(err.code(), "ENGINE_ERROR");
        assert!(err.to_string().contains("bad buffer"));
    }
}
