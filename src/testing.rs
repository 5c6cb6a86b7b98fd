//! In-memory engine doubles for tests, doctests and benchmarks.
//!
//! Contract resolution only inspects tensor shapes, types and metadata, so
//! an engine with pre-seeded output buffers exercises every code path
//! without a real model.

use crate::engine::{EngineError, EngineLoader, InferenceEngine, ModelSource, Tensor};

/// An engine holding fixed tensors. `run` is a no-op that leaves the
/// pre-seeded outputs in place, or fails when built with
/// [`StaticEngine::failing`].
#[derive(Debug, Clone)]
pub struct StaticEngine {
    inputs: Vec<Tensor>,
    outputs: Vec<Tensor>,
    fail_on_run: bool,
}

impl StaticEngine {
    pub fn new(inputs: Vec<Tensor>, outputs: Vec<Tensor>) -> Self {
        Self {
            inputs,
            outputs,
            fail_on_run: false,
        }
    }

    /// An engine whose `run` always fails, for exercising error paths.
    pub fn failing(inputs: Vec<Tensor>, outputs: Vec<Tensor>) -> Self {
        Self {
            inputs,
            outputs,
            fail_on_run: true,
        }
    }
}

impl InferenceEngine for StaticEngine {
    fn input_tensors(&mut self) -> &mut [Tensor] {
        &mut self.inputs
    }

    fn output_tensors(&self) -> &[Tensor] {
        &self.outputs
    }

    fn run(&mut self) -> Result<(), EngineError> {
        if self.fail_on_run {
            Err(EngineError::Run("scripted failure".to_string()))
        } else {
            Ok(())
        }
    }
}

/// A loader that hands out clones of a template engine, ignoring the model
/// source.
#[derive(Debug, Clone)]
pub struct StaticLoader {
    engine: StaticEngine,
}

impl StaticLoader {
    pub fn new(engine: StaticEngine) -> Self {
        Self { engine }
    }
}

impl EngineLoader for StaticLoader {
    fn load(&self, _source: ModelSource<'_>) -> Result<Box<dyn InferenceEngine>, EngineError> {
        Ok(Box::new(self.engine.clone()))
    }
}
