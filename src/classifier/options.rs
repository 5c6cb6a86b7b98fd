use serde::{Deserialize, Serialize};

/// Per-classifier tensor selectors.
///
/// Each logical tensor role (input text, output scores, output labels) is
/// selected by an optional name and a positional index. When the model
/// carries tensor metadata the name is tried first; the index is the
/// fallback and the default convention. The defaults below describe the
/// conventional contract of single-input text classification models.
///
/// # Example
/// ```
/// use wernicke::ClassifierOptions;
///
/// let options = ClassifierOptions::default();
/// assert_eq!(options.input_tensor_name, "INPUT");
/// assert_eq!(options.output_score_tensor_index, 0);
/// assert!(options.output_label_tensor_index.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    /// Name of the input text tensor; may be empty to force index lookup.
    pub input_tensor_name: String,
    pub input_tensor_index: usize,
    /// Name of the output score tensor; also the name metadata entries are
    /// matched against when resolving an embedded label file.
    pub output_score_tensor_name: String,
    pub output_score_tensor_index: usize,
    /// Name of an optional output label tensor holding one string per
    /// category.
    pub output_label_tensor_name: String,
    /// Positional fallback for the label tensor; `None` means the model has
    /// no label tensor unless one is found by name.
    pub output_label_tensor_index: Option<usize>,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            input_tensor_name: "INPUT".to_string(),
            input_tensor_index: 0,
            output_score_tensor_name: "OUTPUT_SCORE".to_string(),
            output_score_tensor_index: 0,
            output_label_tensor_name: "OUTPUT_LABEL".to_string(),
            output_label_tensor_index: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors() {
        let options = ClassifierOptions::default();
        assert_eq!(options.input_tensor_name, "INPUT");
        assert_eq!(options.input_tensor_index, 0);
        assert_eq!(options.output_score_tensor_name, "OUTPUT_SCORE");
        assert_eq!(options.output_score_tensor_index, 0);
        assert_eq!(options.output_label_tensor_name, "OUTPUT_LABEL");
        assert_eq!(options.output_label_tensor_index, None);
    }
}
