//! The inference-engine collaborator boundary.
//!
//! The classifier never executes a graph itself; it talks to an engine
//! through [`InferenceEngine`] and obtains one through [`EngineLoader`].
//! Tensors are exchanged as owned [`Tensor`] handles carrying the name,
//! storage type, shape, raw buffer and (for quantized types) quantization
//! parameters that the contract-resolution logic inspects.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Storage type of a tensor, as declared by the loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TensorType {
    String,
    Bool,
    UInt8,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TensorType::String => "STRING",
            TensorType::Bool => "BOOL",
            TensorType::UInt8 => "UINT8",
            TensorType::Int8 => "INT8",
            TensorType::Int16 => "INT16",
            TensorType::Int32 => "INT32",
            TensorType::Int64 => "INT64",
            TensorType::Float32 => "FLOAT32",
            TensorType::Float64 => "FLOAT64",
        };
        f.write_str(name)
    }
}

/// Quantization parameters attached to a quantized tensor.
///
/// A dequantized value is `(raw - zero_point) * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantParams {
    pub scale: f32,
    pub zero_point: i32,
}

impl Default for QuantParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            zero_point: 0,
        }
    }
}

/// Backing storage of a tensor: a little-endian byte buffer for numeric
/// types, or a string table for `STRING` tensors.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    Raw(Vec<u8>),
    Strings(Vec<String>),
}

/// An owned tensor handle exchanged with the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    name: String,
    tensor_type: TensorType,
    dims: Vec<usize>,
    data: TensorData,
    quant: Option<QuantParams>,
}

impl Tensor {
    pub fn new(
        name: impl Into<String>,
        tensor_type: TensorType,
        dims: Vec<usize>,
        data: TensorData,
    ) -> Self {
        Self {
            name: name.into(),
            tensor_type,
            dims,
            data,
            quant: None,
        }
    }

    /// Attaches quantization parameters; only meaningful for the quantized
    /// integer storage types.
    pub fn with_quantization(mut self, scale: f32, zero_point: i32) -> Self {
        self.quant = Some(QuantParams { scale, zero_point });
        self
    }

    /// An empty `STRING` input slot, the shape text is written into before a
    /// run.
    pub fn string_input(name: impl Into<String>) -> Self {
        Self::new(
            name,
            TensorType::String,
            vec![1],
            TensorData::Strings(vec![String::new()]),
        )
    }

    /// A `STRING` tensor holding one string per element.
    pub fn from_strings(name: impl Into<String>, values: Vec<String>) -> Self {
        let dims = vec![values.len()];
        Self::new(name, TensorType::String, dims, TensorData::Strings(values))
    }

    pub fn from_f32(name: impl Into<String>, dims: Vec<usize>, values: &[f32]) -> Self {
        let raw = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(name, TensorType::Float32, dims, TensorData::Raw(raw))
    }

    pub fn from_f64(name: impl Into<String>, dims: Vec<usize>, values: &[f64]) -> Self {
        let raw = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(name, TensorType::Float64, dims, TensorData::Raw(raw))
    }

    pub fn from_u8(name: impl Into<String>, dims: Vec<usize>, values: &[u8]) -> Self {
        Self::new(name, TensorType::UInt8, dims, TensorData::Raw(values.to_vec()))
    }

    pub fn from_i8(name: impl Into<String>, dims: Vec<usize>, values: &[i8]) -> Self {
        let raw = values.iter().map(|v| *v as u8).collect();
        Self::new(name, TensorType::Int8, dims, TensorData::Raw(raw))
    }

    pub fn from_i16(name: impl Into<String>, dims: Vec<usize>, values: &[i16]) -> Self {
        let raw = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::new(name, TensorType::Int16, dims, TensorData::Raw(raw))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tensor_type(&self) -> TensorType {
        self.tensor_type
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn quantization(&self) -> Option<QuantParams> {
        self.quant
    }

    /// The raw byte buffer; empty for `STRING` tensors.
    pub fn raw(&self) -> &[u8] {
        match &self.data {
            TensorData::Raw(bytes) => bytes,
            TensorData::Strings(_) => &[],
        }
    }

    /// Replaces the tensor's contents with a single string value.
    pub fn set_string(&mut self, value: &str) {
        match &mut self.data {
            TensorData::Strings(values) => {
                values.clear();
                values.push(value.to_owned());
            }
            TensorData::Raw(_) => {
                self.data = TensorData::Strings(vec![value.to_owned()]);
            }
        }
    }

    /// The string stored at `index`, for `STRING` tensors.
    pub fn string_at(&self, index: usize) -> Option<&str> {
        match &self.data {
            TensorData::Strings(values) => values.get(index).map(String::as_str),
            TensorData::Raw(_) => None,
        }
    }

    pub fn u8_at(&self, index: usize) -> u8 {
        self.raw()[index]
    }

    pub fn i8_at(&self, index: usize) -> i8 {
        self.raw()[index] as i8
    }

    pub fn i16_at(&self, index: usize) -> i16 {
        let mut buf = [0u8; 2];
        buf.copy_from_slice(&self.raw()[index * 2..index * 2 + 2]);
        i16::from_le_bytes(buf)
    }

    pub fn f32_at(&self, index: usize) -> f32 {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.raw()[index * 4..index * 4 + 4]);
        f32::from_le_bytes(buf)
    }

    pub fn f64_at(&self, index: usize) -> f64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.raw()[index * 8..index * 8 + 8]);
        f64::from_le_bytes(buf)
    }
}

/// Errors surfaced by an engine implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("failed to load model: {0}")]
    Load(String),
    #[error("inference run failed: {0}")]
    Run(String),
}

/// A loaded model ready for synchronous inference.
///
/// Implementations own the graph and its buffers; the classifier only writes
/// input tensors, calls [`run`](InferenceEngine::run) and reads output
/// tensors. One instance must not be shared unsynchronized across threads.
pub trait InferenceEngine {
    fn input_tensors(&mut self) -> &mut [Tensor];
    fn output_tensors(&self) -> &[Tensor];
    fn run(&mut self) -> Result<(), EngineError>;
}

/// Where model bytes come from.
#[derive(Debug, Clone, Copy)]
pub enum ModelSource<'a> {
    Buffer(&'a [u8]),
    Path(&'a Path),
    Descriptor(i32),
}

/// Produces an engine from a model source.
///
/// Kernel/op registration is configuration of the concrete loader; this
/// crate never inspects it.
pub trait EngineLoader {
    fn load(&self, source: ModelSource<'_>) -> Result<Box<dyn InferenceEngine>, EngineError>;
}
