//! HTTP step-executor bridge
//!
//! Posts `{operation, payload}` to the RPC gateway and decodes the step
//! envelope. Transport faults are executor errors; remote failures ride
//! the envelope's `error` field.

use async_trait::async_trait;
use prov_common::envelope::{ExecutorError, StepEnvelope, StepExecutor};
use serde_json::{json, Value};

/// Step executor backed by an HTTP RPC gateway.
pub struct HttpStepExecutor {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpStepExecutor {
    /// Create an executor posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: None,
        }
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[async_trait]
impl StepExecutor for HttpStepExecutor {
    async fn execute(&self, operation: &str, payload: Value) -> Result<StepEnvelope, ExecutorError> {
        let body = json!({ "operation": operation, "payload": payload });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExecutorError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ExecutorError::Transport(format!(
                "gateway returned {}",
                response.status()
            )));
        }

        response
            .json::<StepEnvelope>()
            .await
            .map_err(|e| ExecutorError::Transport(e.to_string()))
    }
}
