use std::sync::Arc;

use crate::{
    application::services::{
        analyzer::AnalysisService,
        messenger::{BotClientFactory, send_best_effort},
    },
    domain::models::OutboundMessage,
};

pub struct DeliverAnalysisRequest {
    pub user_id: String,
    pub text: String,
}

pub struct DeliverAnalysisUseCase {
    bots: Arc<dyn BotClientFactory>,
    analysis: AnalysisService,
}

impl DeliverAnalysisUseCase {
    pub fn new(bots: Arc<dyn BotClientFactory>, analysis: AnalysisService) -> Self {
        Self { bots, analysis }
    }

    /// Errors cover client construction and analysis only; the push itself
    /// is best-effort.
    pub async fn execute(&self, request: DeliverAnalysisRequest) -> anyhow::Result<()> {
        let bot = self.bots.build()?;
        let description = self.analysis.describe(&request.text).await?;

        // LINE rejects empty text messages.
        if description.is_empty() {
            tracing::info!(user_id = %request.user_id, "nothing to analyze, push skipped");
            return Ok(());
        }

        send_best_effort(
            bot.as_ref(),
            &OutboundMessage::new(request.user_id, description),
        )
        .await;

        Ok(())
    }
}
