use std::sync::Arc;

use crate::{
    application::services::messenger::{BotClientFactory, send_best_effort},
    domain::models::OutboundMessage,
};

pub const UNSUPPORTED_NOTICE: &str = "テキスト以外のメッセージには対応していません";

pub struct NotifyUnsupportedUseCase {
    bots: Arc<dyn BotClientFactory>,
}

impl NotifyUnsupportedUseCase {
    pub fn new(bots: Arc<dyn BotClientFactory>) -> Self {
        Self { bots }
    }

    pub async fn execute(&self, user_id: String) -> anyhow::Result<()> {
        let bot = self.bots.build()?;
        send_best_effort(
            bot.as_ref(),
            &OutboundMessage::new(user_id, UNSUPPORTED_NOTICE),
        )
        .await;
        Ok(())
    }
}
