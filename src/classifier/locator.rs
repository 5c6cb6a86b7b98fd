use crate::engine::Tensor;
use crate::metadata::TensorMetadata;

/// Resolves a tensor by metadata name first, positional index second.
///
/// The metadata list, when present, is index-aligned with `tensors`: a
/// metadata entry whose declared name equals `name` selects the tensor at
/// the same position. With no metadata, an empty name, or no name match,
/// the lookup falls back to `index` if it lies within bounds. Absence is a
/// recoverable outcome, not an error.
pub(crate) fn find_tensor_index(
    tensors: &[Tensor],
    metadata: Option<&[TensorMetadata]>,
    name: &str,
    index: Option<usize>,
) -> Option<usize> {
    if !name.is_empty() {
        if let Some(metadata) = metadata {
            for (position, entry) in metadata.iter().enumerate() {
                if entry.name.as_deref() == Some(name) && position < tensors.len() {
                    return Some(position);
                }
            }
        }
    }
    match index {
        Some(index) if index < tensors.len() => Some(index),
        _ => None,
    }
}

pub(crate) fn find_tensor<'a>(
    tensors: &'a [Tensor],
    metadata: Option<&[TensorMetadata]>,
    name: &str,
    index: Option<usize>,
) -> Option<&'a Tensor> {
    find_tensor_index(tensors, metadata, name, index).map(|i| &tensors[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Tensor;
    use crate::metadata::TensorMetadata;

    fn tensors() -> Vec<Tensor> {
        vec![
            Tensor::from_f32("serving_default_scores", vec![3], &[0.0, 0.0, 0.0]),
            Tensor::from_strings("serving_default_labels", vec!["a".into(), "b".into()]),
        ]
    }

    fn metadata() -> Vec<TensorMetadata> {
        vec![
            TensorMetadata::named("OUTPUT_SCORE"),
            TensorMetadata::named("OUTPUT_LABEL"),
        ]
    }

    #[test]
    fn test_find_by_metadata_name() {
        let tensors = tensors();
        let metadata = metadata();
        let found = find_tensor(&tensors, Some(&metadata), "OUTPUT_LABEL", Some(0));
        assert_eq!(found.map(Tensor::name), Some("serving_default_labels"));
    }

    #[test]
    fn test_name_miss_falls_back_to_index() {
        let tensors = tensors();
        let metadata = metadata();
        let found = find_tensor(&tensors, Some(&metadata), "NO_SUCH_NAME", Some(1));
        assert_eq!(found.map(Tensor::name), Some("serving_default_labels"));
    }

    #[test]
    fn test_no_metadata_uses_index() {
        let tensors = tensors();
        let found = find_tensor(&tensors, None, "OUTPUT_SCORE", Some(0));
        assert_eq!(found.map(Tensor::name), Some("serving_default_scores"));
    }

    #[test]
    fn test_empty_name_skips_metadata_scan() {
        let tensors = tensors();
        let metadata = metadata();
        let found = find_tensor(&tensors, Some(&metadata), "", Some(1));
        assert_eq!(found.map(Tensor::name), Some("serving_default_labels"));
    }

    #[test]
    fn test_out_of_bounds_index_is_not_found() {
        let tensors = tensors();
        assert!(find_tensor(&tensors, None, "", Some(5)).is_none());
        assert!(find_tensor(&tensors, None, "", None).is_none());
    }

    #[test]
    fn test_metadata_position_beyond_tensor_list_is_skipped() {
        let tensors = vec![Tensor::from_f32("scores", vec![1], &[0.0])];
        let metadata = vec![
            TensorMetadata::named("other"),
            TensorMetadata::named("OUTPUT_SCORE"),
        ];
        // The name matches at position 1 but only one runtime tensor exists.
        let found = find_tensor(&tensors, Some(&metadata), "OUTPUT_SCORE", Some(0));
        assert_eq!(found.map(Tensor::name), Some("scores"));
    }

    #[test]
    fn test_lookup_is_stable() {
        let tensors = tensors();
        let metadata = metadata();
        let first = find_tensor_index(&tensors, Some(&metadata), "OUTPUT_SCORE", Some(1));
        let second = find_tensor_index(&tensors, Some(&metadata), "OUTPUT_SCORE", Some(1));
        assert_eq!(first, second);
        assert_eq!(first, Some(0));
    }
}
