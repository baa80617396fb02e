use std::sync::Arc;

use thiserror::Error;

use crate::{
    application::{
        handlers::message_dispatcher::{Action, MessageDispatchHandler},
        services::{
            event_bus::TaskQueue,
            messenger::{BotClientFactory, send_best_effort},
        },
    },
    domain::errors::BotError,
};

#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("bot client unavailable: {0}")]
    ClientUnavailable(#[source] BotError),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("failed to parse callback: {0}")]
    Unparseable(#[source] BotError),
}

pub struct CallbackRequest<'a> {
    pub signature: Option<&'a str>,
    pub body: &'a [u8],
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CallbackSummary {
    pub events: usize,
    pub pushed: usize,
    pub enqueued: usize,
}

pub struct HandleCallbackUseCase {
    bots: Arc<dyn BotClientFactory>,
    dispatcher: Arc<MessageDispatchHandler>,
    queue: Arc<dyn TaskQueue>,
}

impl HandleCallbackUseCase {
    pub fn new(
        bots: Arc<dyn BotClientFactory>,
        dispatcher: Arc<MessageDispatchHandler>,
        queue: Arc<dyn TaskQueue>,
    ) -> Self {
        Self {
            bots,
            dispatcher,
            queue,
        }
    }

    /// Handles one webhook delivery. Individual push or enqueue failures do
    /// not fail the callback.
    pub async fn execute(
        &self,
        request: CallbackRequest<'_>,
    ) -> Result<CallbackSummary, CallbackError> {
        let bot = self.bots.build().map_err(CallbackError::ClientUnavailable)?;

        let events = bot
            .parse_request(request.signature, request.body)
            .map_err(|err| {
                if err.is_invalid_signature() {
                    CallbackError::InvalidSignature
                } else {
                    CallbackError::Unparseable(err)
                }
            })?;

        let mut summary = CallbackSummary {
            events: events.len(),
            ..Default::default()
        };

        for event in &events {
            tracing::debug!(
                webhook_event_id = event.webhook_event_id.as_deref().unwrap_or("-"),
                kind = event.kind.as_str(),
                source = event.source.as_str(),
                timestamp = %event.timestamp,
                "dispatching event"
            );
            match self.dispatcher.dispatch(event).await {
                Some(Action::Push(message)) => {
                    send_best_effort(bot.as_ref(), &message).await;
                    summary.pushed += 1;
                }
                Some(Action::Enqueue(task)) => {
                    let path = task.path();
                    match self.queue.enqueue(task).await {
                        Ok(()) => summary.enqueued += 1,
                        Err(err) => {
                            tracing::error!(task = path, error = %err, "failed to enqueue task");
                        }
                    }
                }
                None => {}
            }
        }

        Ok(summary)
    }
}
