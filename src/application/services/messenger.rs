use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    errors::BotError,
    models::{Event, OutboundMessage},
};

/// Client for a messaging platform bound to one set of channel credentials.
#[async_trait]
pub trait BotClient: Send + Sync {
    /// Verifies the request signature and decodes the event batch.
    fn parse_request(&self, signature: Option<&str>, body: &[u8])
    -> Result<Vec<Event>, BotError>;

    async fn push_message(&self, message: &OutboundMessage) -> Result<(), BotError>;
}

/// Builds a fresh client per request. Construction fails when the
/// credentials are missing.
pub trait BotClientFactory: Send + Sync {
    fn build(&self) -> Result<Arc<dyn BotClient>, BotError>;
}

/// Fire-and-forget delivery. The webhook is acknowledged regardless of the
/// outcome, so a failed push is only logged and never retried.
pub async fn send_best_effort(client: &dyn BotClient, message: &OutboundMessage) {
    tracing::debug!(user_id = %message.user_id, text = %message.text, "pushing message");
    if let Err(err) = client.push_message(message).await {
        tracing::debug!(user_id = %message.user_id, error = %err, "push failed");
    }
}
