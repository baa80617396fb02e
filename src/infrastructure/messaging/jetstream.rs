use std::sync::Arc;
use std::time::Duration;

use async_nats::jetstream::{
    self,
    consumer::{AckPolicy, PullConsumer, pull},
};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

use crate::{
    application::services::event_bus::TaskQueue,
    domain::{events::TaskEnvelope, models::DeferredTask},
    infrastructure::messaging::task_delivery::HttpTaskDelivery,
};

#[derive(Clone)]
pub struct JetstreamConfig {
    pub url: String,
    pub stream: String,
    pub subject: String,
    pub durable: String,
    pub pull_batch: usize,
    pub ack_wait_seconds: u64,
    pub max_deliver: i64,
    pub max_attempts: u32,
}

pub struct JetstreamTaskQueue {
    context: jetstream::Context,
    subject: String,
    max_attempts: u32,
}

impl JetstreamTaskQueue {
    pub async fn new(config: &JetstreamConfig) -> anyhow::Result<(Arc<Self>, JetstreamWorker)> {
        let client = async_nats::connect(&config.url).await?;
        let context = jetstream::new(client);

        let stream = context
            .get_or_create_stream(jetstream::stream::Config {
                name: config.stream.clone(),
                subjects: vec![config.subject.clone()],
                ..Default::default()
            })
            .await?;

        let consumer = stream
            .get_or_create_consumer(
                &config.durable,
                pull::Config {
                    durable_name: Some(config.durable.clone()),
                    ack_policy: AckPolicy::Explicit,
                    ack_wait: Duration::from_secs(config.ack_wait_seconds),
                    max_deliver: config.max_deliver,
                    ..Default::default()
                },
            )
            .await?;

        let queue = Arc::new(Self {
            context,
            subject: config.subject.clone(),
            max_attempts: config.max_attempts.max(1),
        });

        let worker = JetstreamWorker {
            consumer,
            pull_batch: config.pull_batch,
        };

        Ok((queue, worker))
    }

    async fn publish(&self, envelope: &TaskEnvelope) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(envelope)?;
        self.context
            .publish(self.subject.clone(), payload.into())
            .await?
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TaskQueue for JetstreamTaskQueue {
    async fn enqueue(&self, task: DeferredTask) -> anyhow::Result<()> {
        let envelope = TaskEnvelope::new(task, self.max_attempts);
        self.publish(&envelope).await?;
        tracing::debug!(
            event_id = %envelope.event_id,
            task = envelope.task.path(),
            "task published"
        );
        Ok(())
    }
}

pub struct JetstreamWorker {
    consumer: PullConsumer,
    pull_batch: usize,
}

impl JetstreamWorker {
    pub fn spawn(
        self,
        delivery: HttpTaskDelivery,
        queue: Arc<JetstreamTaskQueue>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(err) = self.run(delivery, queue).await {
                tracing::error!(error = ?err, "jetstream worker stopped");
            }
        })
    }

    async fn run(
        self,
        delivery: HttpTaskDelivery,
        queue: Arc<JetstreamTaskQueue>,
    ) -> anyhow::Result<()> {
        loop {
            let mut batch = self
                .consumer
                .batch()
                .max_messages(self.pull_batch)
                .messages()
                .await?;
            while let Some(message) = batch.next().await {
                match message {
                    Ok(msg) => {
                        if let Err(err) = Self::process_message(msg, &delivery, &queue).await {
                            tracing::error!(error = ?err, "failed to process task message");
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = ?err, "jetstream batch error");
                    }
                }
            }
        }
    }

    async fn process_message(
        message: jetstream::Message,
        delivery: &HttpTaskDelivery,
        queue: &JetstreamTaskQueue,
    ) -> anyhow::Result<()> {
        let envelope: TaskEnvelope = match serde_json::from_slice(&message.payload) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(error = %err, "discarding undecodable task message");
                return Self::ack(&message).await;
            }
        };

        if let Err(err) = delivery.deliver(&envelope.task).await {
            if envelope.is_exhausted() {
                tracing::warn!(
                    event_id = %envelope.event_id,
                    task = envelope.task.path(),
                    attempts = envelope.attempt,
                    error = %err,
                    "dropping task after last attempt"
                );
            } else {
                tracing::debug!(
                    event_id = %envelope.event_id,
                    attempt = envelope.attempt,
                    error = %err,
                    "task delivery failed, requeueing"
                );
                queue.publish(&envelope.next_attempt()).await?;
            }
        }

        Self::ack(&message).await
    }

    async fn ack(message: &jetstream::Message) -> anyhow::Result<()> {
        message
            .ack()
            .await
            .map_err(|e| anyhow::anyhow!("failed to ack message: {}", e))
    }
}
