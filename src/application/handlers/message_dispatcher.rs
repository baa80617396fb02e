use std::str::FromStr;

use crate::{
    application::services::analyzer::AnalysisService,
    domain::models::{DeferredTask, Event, EventKind, MessagePayload, OutboundMessage},
};

pub const IMAGE_REPLY: &str = "Got image!!";
pub const MESSAGE_REPLY: &str = "Got message!!";
pub const POSTBACK_REPLY: &str = "Got PostBack!!";
pub const BEACON_REPLY: &str = "Got beacon!!";

/// How text messages are answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyMode {
    /// Reply with the text itself.
    #[default]
    Echo,
    /// Reply with the morphological analysis before the callback is answered.
    Analyze,
    /// Hand the analysis, and every non-text event, to the task queue.
    Deferred,
}

impl ReplyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyMode::Echo => "echo",
            ReplyMode::Analyze => "analyze",
            ReplyMode::Deferred => "deferred",
        }
    }

}

impl FromStr for ReplyMode {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "echo" => Ok(ReplyMode::Echo),
            "analyze" => Ok(ReplyMode::Analyze),
            "deferred" => Ok(ReplyMode::Deferred),
            _ => Err("REPLY_MODE must be one of echo, analyze, deferred"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Push(OutboundMessage),
    Enqueue(DeferredTask),
}

pub struct MessageDispatchHandler {
    mode: ReplyMode,
    analysis: AnalysisService,
}

impl MessageDispatchHandler {
    pub fn new(mode: ReplyMode, analysis: AnalysisService) -> Self {
        Self { mode, analysis }
    }

    /// Decides the single reaction to `event`, if any.
    pub async fn dispatch(&self, event: &Event) -> Option<Action> {
        let Some(user_id) = event.source.direct_user() else {
            tracing::debug!(
                source = event.source.as_str(),
                kind = event.kind.as_str(),
                "ignoring event from non-user source"
            );
            return None;
        };

        match &event.kind {
            EventKind::Message(payload) => self.on_message(user_id, payload).await,
            EventKind::Postback { .. } => Some(self.fixed_reply(user_id, POSTBACK_REPLY)),
            EventKind::Beacon { .. } => Some(self.fixed_reply(user_id, BEACON_REPLY)),
            EventKind::Other(kind) => match self.mode {
                ReplyMode::Deferred => Some(Self::unsupported(user_id)),
                ReplyMode::Echo | ReplyMode::Analyze => {
                    tracing::debug!(kind = %kind, "no reply for event type");
                    None
                }
            },
        }
    }

    async fn on_message(&self, user_id: &str, payload: &MessagePayload) -> Option<Action> {
        match payload {
            MessagePayload::Text { text, .. } => match self.mode {
                ReplyMode::Echo => Some(Action::Push(OutboundMessage::new(user_id, text.clone()))),
                ReplyMode::Analyze => match self.analysis.describe(text).await {
                    Ok(description) => {
                        Some(Action::Push(OutboundMessage::new(user_id, description)))
                    }
                    Err(err) => {
                        tracing::error!(
                            user_id = %user_id,
                            error = %err,
                            "morphological analysis failed"
                        );
                        None
                    }
                },
                ReplyMode::Deferred => Some(Action::Enqueue(DeferredTask::Analysis {
                    user_id: user_id.to_string(),
                    text: text.clone(),
                })),
            },
            MessagePayload::Image { .. } => Some(self.fixed_reply(user_id, IMAGE_REPLY)),
            MessagePayload::Other { .. } => Some(self.fixed_reply(user_id, MESSAGE_REPLY)),
        }
    }

    fn fixed_reply(&self, user_id: &str, text: &str) -> Action {
        match self.mode {
            ReplyMode::Deferred => Self::unsupported(user_id),
            ReplyMode::Echo | ReplyMode::Analyze => {
                Action::Push(OutboundMessage::new(user_id, text))
            }
        }
    }

    fn unsupported(user_id: &str) -> Action {
        Action::Enqueue(DeferredTask::Unsupported {
            user_id: user_id.to_string(),
        })
    }
}
