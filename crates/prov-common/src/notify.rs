//! Operator notifications
//!
//! Fire-and-forget progress text posted to an operator channel. Post
//! failures are logged by the caller and never escalated.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One message destined for an operator channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Destination channel.
    pub channel: String,
    /// Human-readable message.
    pub text: String,
}

/// Notification post failure.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The message could not be delivered.
    #[error("post failed: {0}")]
    Post(String),
}

/// Posts human-readable text to an operator channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post `text` to `channel`. No acknowledgement is tracked.
    async fn post(&self, channel: &str, text: &str) -> Result<(), NotifyError>;
}

/// Webhook-backed notifier for chat gateways that accept
/// `{channel, text}` posts.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
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
impl Notifier for WebhookNotifier {
    async fn post(&self, channel: &str, text: &str) -> Result<(), NotifyError> {
        let event = NotificationEvent {
            channel: channel.to_string(),
            text: text.to_string(),
        };

        let mut request = self.client.post(&self.url).json(&event);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotifyError::Post(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Post(format!(
                "gateway returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// In-memory notifier for testing and development.
#[derive(Default)]
pub struct InMemoryNotifier {
    events: parking_lot::Mutex<Vec<NotificationEvent>>,
}

impl InMemoryNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything posted so far, in order.
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn post(&self, channel: &str, text: &str) -> Result<(), NotifyError> {
        self.events.lock().push(NotificationEvent {
            channel: channel.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
