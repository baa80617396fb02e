use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::DeferredTask;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEnvelope {
    pub event_id: Uuid,
    pub task: DeferredTask,
    pub attempt: u32,
    pub max_attempts: u32,
    pub enqueued_at: DateTime<Utc>,
}

impl TaskEnvelope {
    pub fn new(task: DeferredTask, max_attempts: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            task,
            attempt: 1,
            max_attempts,
            enqueued_at: Utc::now(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    pub fn next_attempt(mut self) -> Self {
        self.attempt += 1;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_survives_queue_serialization() {
        let envelope = TaskEnvelope::new(
            DeferredTask::Analysis {
                user_id: "U1".to_string(),
                text: "すもも".to_string(),
            },
            3,
        );

        let payload = serde_json::to_vec(&envelope).unwrap();
        let decoded: TaskEnvelope = serde_json::from_slice(&payload).unwrap();

        assert_eq!(decoded.event_id, envelope.event_id);
        assert_eq!(decoded.task, envelope.task);
        assert_eq!(decoded.attempt, 1);
    }

    #[test]
    fn attempts_run_out_at_the_configured_maximum() {
        let envelope = TaskEnvelope::new(
            DeferredTask::Unsupported {
                user_id: "U1".to_string(),
            },
            2,
        );
        assert!(!envelope.is_exhausted());

        let retried = envelope.next_attempt();
        assert_eq!(retried.attempt, 2);
        assert!(retried.is_exhausted());
    }
}
