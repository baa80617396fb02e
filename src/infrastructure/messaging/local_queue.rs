use std::time::Duration;

use async_trait::async_trait;

use crate::{
    application::services::event_bus::TaskQueue,
    domain::{events::TaskEnvelope, models::DeferredTask},
    infrastructure::messaging::task_delivery::HttpTaskDelivery,
};

/// In-process queue: every task is delivered from its own tokio task.
pub struct LocalTaskQueue {
    delivery: HttpTaskDelivery,
    max_attempts: u32,
    retry_delay: Duration,
}

impl LocalTaskQueue {
    pub fn new(delivery: HttpTaskDelivery, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            delivery,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    async fn run(delivery: HttpTaskDelivery, mut envelope: TaskEnvelope, retry_delay: Duration) {
        loop {
            match delivery.deliver(&envelope.task).await {
                Ok(()) => return,
                Err(err) if envelope.is_exhausted() => {
                    tracing::warn!(
                        event_id = %envelope.event_id,
                        task = envelope.task.path(),
                        attempts = envelope.attempt,
                        error = %err,
                        "dropping task after last attempt"
                    );
                    return;
                }
                Err(err) => {
                    tracing::debug!(
                        event_id = %envelope.event_id,
                        attempt = envelope.attempt,
                        error = %err,
                        "task delivery failed, retrying"
                    );
                    tokio::time::sleep(retry_delay).await;
                    envelope = envelope.next_attempt();
                }
            }
        }
    }
}

#[async_trait]
impl TaskQueue for LocalTaskQueue {
    async fn enqueue(&self, task: DeferredTask) -> anyhow::Result<()> {
        let envelope = TaskEnvelope::new(task, self.max_attempts);
        tracing::debug!(
            event_id = %envelope.event_id,
            task = envelope.task.path(),
            user_id = envelope.task.user_id(),
            "task enqueued"
        );
        tokio::spawn(Self::run(
            self.delivery.clone(),
            envelope,
            self.retry_delay,
        ));
        Ok(())
    }
}
