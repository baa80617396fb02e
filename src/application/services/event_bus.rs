use async_trait::async_trait;

use crate::domain::models::DeferredTask;

/// Asynchronous task queue. Accepted tasks are delivered at least once to
/// the endpoint named by [`DeferredTask::path`], in no particular order.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue(&self, task: DeferredTask) -> anyhow::Result<()>;
}
