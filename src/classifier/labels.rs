use log::debug;

use super::error::ClassifierError;
use crate::metadata::{AssociatedFileKind, ModelMetadata, TensorMetadata};

/// Where classification labels come from, fixed at initialization.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LabelSource {
    /// Label list loaded once from a metadata-declared label file.
    Eager(Vec<String>),
    /// A string-typed output tensor read per classification call.
    Lazy,
    /// No labels available; categories are labeled by their index.
    Positional,
}

/// Parses label-file bytes into an ordered label list, one label per line.
///
/// Lines are whitespace-trimmed; order is preserved and duplicates are
/// permitted (vocabulary-file convention).
pub(crate) fn parse_label_file(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(|line| line.trim().to_owned())
        .collect()
}

/// Attempts to load the label list declared by an output tensor's metadata.
///
/// Fails with `MetadataNotFound` when the tensor has no metadata entry, and
/// with `MissingLabels` when no associated file is declared, the first file
/// is not of the tensor-axis-labels kind, or its bytes cannot be resolved.
/// A wrong file kind is deliberately indistinguishable from absence.
pub(crate) fn labels_from_metadata(
    metadata: Option<&TensorMetadata>,
    model: &ModelMetadata,
) -> Result<Vec<String>, ClassifierError> {
    let metadata = metadata.ok_or(ClassifierError::MetadataNotFound)?;
    let file = metadata
        .associated_files
        .first()
        .ok_or(ClassifierError::MissingLabels)?;
    if file.kind != AssociatedFileKind::TensorAxisLabels {
        debug!(
            "associated file {:?} has kind {:?}, not tensor-axis labels",
            file.name, file.kind
        );
        return Err(ClassifierError::MissingLabels);
    }
    let bytes = model
        .associated_file(&file.name)
        .ok_or(ClassifierError::MissingLabels)?;
    Ok(parse_label_file(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::AssociatedFile;

    fn labeled_metadata() -> (TensorMetadata, ModelMetadata) {
        let tensor = TensorMetadata::named("OUTPUT_SCORE").with_associated_file(
            AssociatedFile::new("labels.txt", AssociatedFileKind::TensorAxisLabels),
        );
        let model = ModelMetadata::empty()
            .with_associated_file("labels.txt", b"positive\nnegative\nneutral\n".to_vec());
        (tensor, model)
    }

    #[test]
    fn test_labels_load_in_order() {
        let (tensor, model) = labeled_metadata();
        let labels = labels_from_metadata(Some(&tensor), &model).unwrap();
        assert_eq!(labels, vec!["positive", "negative", "neutral"]);
    }

    #[test]
    fn test_missing_metadata() {
        let model = ModelMetadata::empty();
        let err = labels_from_metadata(None, &model).unwrap_err();
        assert_eq!(err.code(), "METADATA_NOT_FOUND");
    }

    #[test]
    fn test_no_associated_files() {
        let tensor = TensorMetadata::named("OUTPUT_SCORE");
        let model = ModelMetadata::empty();
        let err = labels_from_metadata(Some(&tensor), &model).unwrap_err();
        assert_eq!(err.code(), "METADATA_MISSING_LABELS");
    }

    #[test]
    fn test_wrong_file_kind_reads_as_missing() {
        let tensor = TensorMetadata::named("OUTPUT_SCORE").with_associated_file(
            AssociatedFile::new("vocab.txt", AssociatedFileKind::Vocabulary),
        );
        let model =
            ModelMetadata::empty().with_associated_file("vocab.txt", b"a\nb\n".to_vec());
        let err = labels_from_metadata(Some(&tensor), &model).unwrap_err();
        assert_eq!(err.code(), "METADATA_MISSING_LABELS");
    }

    #[test]
    fn test_unresolvable_file_reads_as_missing() {
        let tensor = TensorMetadata::named("OUTPUT_SCORE").with_associated_file(
            AssociatedFile::new("gone.txt", AssociatedFileKind::TensorAxisLabels),
        );
        let model = ModelMetadata::empty();
        let err = labels_from_metadata(Some(&tensor), &model).unwrap_err();
        assert_eq!(err.code(), "METADATA_MISSING_LABELS");
    }

    #[test]
    fn test_label_file_trimming_and_duplicates() {
        let labels = parse_label_file(b"  spam \nham\r\nspam\n\nham");
        assert_eq!(labels, vec!["spam", "ham", "spam", "", "ham"]);
    }

    #[test]
    fn test_trailing_newline_adds_no_label() {
        assert_eq!(parse_label_file(b"only\n"), vec!["only"]);
        assert!(parse_label_file(b"").is_empty());
    }
}
