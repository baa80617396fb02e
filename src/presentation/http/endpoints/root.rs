use std::sync::Arc;

use poem_openapi::Tags;

use crate::application::usecases::{
    deliver_analysis::DeliverAnalysisUseCase, handle_callback::HandleCallbackUseCase,
    notify_unsupported::NotifyUnsupportedUseCase,
};

#[derive(Clone)]
pub struct ApiState {
    pub handle_callback_usecase: Arc<HandleCallbackUseCase>,
    pub deliver_analysis_usecase: Arc<DeliverAnalysisUseCase>,
    pub notify_unsupported_usecase: Arc<NotifyUnsupportedUseCase>,
    pub qr_code_url: String,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Webhook,
    Tasks,
    Usage,
}
