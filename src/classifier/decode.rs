use crate::engine::{Tensor, TensorType};

/// Whether scores of this storage type need dequantization.
pub(crate) fn is_quantized(tensor_type: TensorType) -> bool {
    matches!(
        tensor_type,
        TensorType::UInt8 | TensorType::Int8 | TensorType::Int16
    )
}

/// Reads the score at `index`, dequantizing with the tensor's embedded
/// quantization parameters when the storage type is a quantized integer
/// kind. Storage types are validated at classifier initialization and are
/// not re-checked here.
pub(crate) fn score_at(tensor: &Tensor, index: usize) -> f32 {
    match tensor.tensor_type() {
        TensorType::UInt8 => dequantize(tensor, tensor.u8_at(index) as i32),
        TensorType::Int8 => dequantize(tensor, tensor.i8_at(index) as i32),
        TensorType::Int16 => dequantize(tensor, tensor.i16_at(index) as i32),
        TensorType::Float32 => tensor.f32_at(index),
        TensorType::Float64 => tensor.f64_at(index) as f32,
        other => unreachable!("score tensor type {other} is rejected at initialization"),
    }
}

fn dequantize(tensor: &Tensor, raw: i32) -> f32 {
    let params = tensor.quantization().unwrap_or_default();
    (raw - params.zero_point) as f32 * params.scale
}
