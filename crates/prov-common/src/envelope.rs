//! Step envelope and the remote-step boundary
//!
//! Every remote operation answers with the same `{error, result}` wrapper.
//! A null `error` with a present `result` is success; any non-null `error`
//! aborts the calling saga step.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Uniform response wrapper for every remote operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepEnvelope {
    /// Human-readable failure text, or null on success.
    pub error: Option<String>,
    /// Opaque step output. Shape is defined per operation.
    #[serde(default)]
    pub result: Value,
}

impl StepEnvelope {
    /// Successful envelope carrying `result`.
    pub fn ok(result: Value) -> Self {
        Self { error: None, result }
    }

    /// Failed envelope carrying only the error text.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            result: Value::Null,
        }
    }

    /// The step output, or the error text. A success passes `result`
    /// through exactly as received.
    pub fn into_result(self) -> Result<Value, String> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.result),
        }
    }
}

/// Faults of the dispatch layer itself, as opposed to failures reported by
/// the remote side inside the envelope.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The request never produced an envelope.
    #[error("transport error: {0}")]
    Transport(String),
    /// No handler serves this operation name.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}

/// Performs one named remote operation.
///
/// The transport behind this trait is out of scope; the contract is the
/// operation names in [`crate::ops`] plus the envelope.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    /// Dispatch `operation` with `payload` and return its envelope.
    async fn execute(&self, operation: &str, payload: Value) -> Result<StepEnvelope, ExecutorError>;
}
