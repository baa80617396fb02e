//! Fakes shared by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    application::{
        handlers::message_dispatcher::{MessageDispatchHandler, ReplyMode},
        services::{
            analyzer::{AnalysisService, MorphologicalAnalyzer},
            event_bus::TaskQueue,
            messenger::{BotClient, BotClientFactory},
        },
        usecases::{
            deliver_analysis::DeliverAnalysisUseCase, handle_callback::HandleCallbackUseCase,
            notify_unsupported::NotifyUnsupportedUseCase,
        },
    },
    domain::{
        errors::BotError,
        models::{
            DeferredTask, Event, EventKind, EventSource, MessagePayload, Morpheme, MorphemeClass,
            OutboundMessage,
        },
    },
    presentation::http::endpoints::root::ApiState,
};

/// Wires the HTTP state around the given client factory and queue, with the
/// fixed analyzer.
pub fn api_state(
    bots: Arc<dyn BotClientFactory>,
    queue: Arc<dyn TaskQueue>,
    mode: ReplyMode,
) -> Arc<ApiState> {
    let analysis = AnalysisService::new(Arc::new(FixedAnalyzer));
    let dispatcher = Arc::new(MessageDispatchHandler::new(mode, analysis.clone()));

    Arc::new(ApiState {
        handle_callback_usecase: Arc::new(HandleCallbackUseCase::new(
            bots.clone(),
            dispatcher,
            queue,
        )),
        deliver_analysis_usecase: Arc::new(DeliverAnalysisUseCase::new(bots.clone(), analysis)),
        notify_unsupported_usecase: Arc::new(NotifyUnsupportedUseCase::new(bots)),
        qr_code_url: "https://qr.example/bot.png".to_string(),
    })
}

pub fn user(user_id: &str) -> EventSource {
    EventSource::User {
        user_id: user_id.to_string(),
    }
}

pub fn event_from(source: EventSource, kind: EventKind) -> Event {
    Event {
        kind,
        source,
        reply_token: None,
        webhook_event_id: None,
        timestamp: Utc::now(),
    }
}

pub fn text_event(user_id: &str, text: &str) -> Event {
    event_from(
        user(user_id),
        EventKind::Message(MessagePayload::Text {
            id: "m1".to_string(),
            text: text.to_string(),
        }),
    )
}

#[derive(Default)]
pub struct RecordingBot {
    events: Mutex<Vec<Event>>,
    pushed: Mutex<Vec<OutboundMessage>>,
    fail_push: bool,
    reject_signature: bool,
}

impl RecordingBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_events(events: Vec<Event>) -> Arc<Self> {
        let bot = Self::new();
        bot.set_events(events);
        bot
    }

    pub fn failing_push() -> Arc<Self> {
        Arc::new(Self {
            fail_push: true,
            ..Default::default()
        })
    }

    pub fn rejecting_signature() -> Arc<Self> {
        Arc::new(Self {
            reject_signature: true,
            ..Default::default()
        })
    }

    pub fn set_events(&self, events: Vec<Event>) {
        *self.events.lock().unwrap() = events;
    }

    pub fn pushed(&self) -> Vec<OutboundMessage> {
        self.pushed.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotClient for RecordingBot {
    fn parse_request(
        &self,
        _signature: Option<&str>,
        _body: &[u8],
    ) -> Result<Vec<Event>, BotError> {
        if self.reject_signature {
            return Err(BotError::InvalidSignature);
        }
        Ok(self.events.lock().unwrap().clone())
    }

    async fn push_message(&self, message: &OutboundMessage) -> Result<(), BotError> {
        self.pushed.lock().unwrap().push(message.clone());
        if self.fail_push {
            return Err(BotError::Api {
                status: 429,
                message: "rate limited".to_string(),
            });
        }
        Ok(())
    }
}

pub struct StaticFactory {
    bot: Option<Arc<RecordingBot>>,
}

impl StaticFactory {
    pub fn new(bot: Arc<RecordingBot>) -> Self {
        Self { bot: Some(bot) }
    }

    pub fn unavailable() -> Self {
        Self { bot: None }
    }
}

impl BotClientFactory for StaticFactory {
    fn build(&self) -> Result<Arc<dyn BotClient>, BotError> {
        match &self.bot {
            Some(bot) => Ok(bot.clone() as Arc<dyn BotClient>),
            None => Err(BotError::MissingCredential("channel secret")),
        }
    }
}

#[derive(Default)]
pub struct RecordingQueue {
    tasks: Mutex<Vec<DeferredTask>>,
    fail: bool,
}

impl RecordingQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn tasks(&self) -> Vec<DeferredTask> {
        self.tasks.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskQueue for RecordingQueue {
    async fn enqueue(&self, task: DeferredTask) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("queue unavailable");
        }
        self.tasks.lock().unwrap().push(task);
        Ok(())
    }
}

const LEXICON: [&str; 5] = ["すもも", "もも", "うち", "も", "の"];

/// Greedy longest match over a tiny lexicon, bracketed like a real lattice
/// path.
pub struct FixedAnalyzer;

impl MorphologicalAnalyzer for FixedAnalyzer {
    fn analyze(&self, text: &str) -> anyhow::Result<Vec<Morpheme>> {
        let mut morphemes = vec![Morpheme::boundary("BOS")];
        let mut rest = text;
        while let Some(first) = rest.chars().next() {
            let (surface, class) = LEXICON
                .iter()
                .find(|word| rest.starts_with(**word))
                .map(|word| (word.to_string(), MorphemeClass::Known))
                .unwrap_or_else(|| (first.to_string(), MorphemeClass::Unknown));
            rest = &rest[surface.len()..];
            morphemes.push(Morpheme {
                surface,
                features: vec!["名詞".to_string(), "一般".to_string()],
                class,
            });
        }
        morphemes.push(Morpheme::boundary("EOS"));
        Ok(morphemes)
    }
}

pub struct FailingAnalyzer;

impl MorphologicalAnalyzer for FailingAnalyzer {
    fn analyze(&self, _text: &str) -> anyhow::Result<Vec<Morpheme>> {
        anyhow::bail!("dictionary not loaded")
    }
}
