use std::sync::Arc;

use poem_openapi::{OpenApi, param::Header};

use crate::{
    application::usecases::handle_callback::{CallbackError, CallbackRequest},
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        responses::CallbackResponse,
    },
};

#[derive(Clone)]
pub struct CallbackEndpoints {
    state: Arc<ApiState>,
}

impl CallbackEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl CallbackEndpoints {
    /// LINE webhook receiver
    #[oai(path = "/callback", method = "post", tag = EndpointsTags::Webhook)]
    pub async fn callback(
        &self,
        #[oai(name = "X-Line-Signature")] signature: Header<Option<String>>,
        body: Vec<u8>,
    ) -> CallbackResponse {
        let request = CallbackRequest {
            signature: signature.0.as_deref(),
            body: &body,
        };

        match self.state.handle_callback_usecase.execute(request).await {
            Ok(summary) => {
                tracing::info!(
                    events = summary.events,
                    pushed = summary.pushed,
                    enqueued = summary.enqueued,
                    "callback handled"
                );
                CallbackResponse::Ok
            }
            Err(CallbackError::ClientUnavailable(err)) => {
                tracing::error!(error = %err, "bot client init error");
                CallbackResponse::InternalError
            }
            Err(CallbackError::InvalidSignature) => {
                tracing::error!("invalid signature");
                CallbackResponse::InvalidSignature
            }
            Err(CallbackError::Unparseable(err)) => {
                tracing::error!(error = %err, "error on parse request");
                CallbackResponse::InternalError
            }
        }
    }
}
