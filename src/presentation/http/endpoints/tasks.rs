use std::sync::Arc;

use poem::web::Form;
use poem_openapi::OpenApi;

use crate::{
    application::usecases::deliver_analysis::DeliverAnalysisRequest,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        requests::TaskRequestDto,
        responses::TaskResponse,
    },
};

/// Endpoints invoked by the task queue, never by end users.
#[derive(Clone)]
pub struct TaskEndpoints {
    state: Arc<ApiState>,
}

impl TaskEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl TaskEndpoints {
    #[oai(
        path = "/task/morphological-analysis",
        method = "post",
        tag = EndpointsTags::Tasks,
    )]
    pub async fn morphological_analysis(&self, form: Form<TaskRequestDto>) -> TaskResponse {
        let Form(request) = form;
        let user_id = request.mid.clone();

        // Failures are not reported back, so the queue never redelivers.
        if let Err(err) = self
            .state
            .deliver_analysis_usecase
            .execute(DeliverAnalysisRequest {
                user_id: request.mid,
                text: request.text,
            })
            .await
        {
            tracing::error!(
                user_id = %user_id,
                error = format!("{err:#}"),
                "analysis task dropped"
            );
        }

        TaskResponse::Ok
    }

    #[oai(path = "/task/unsupported", method = "post", tag = EndpointsTags::Tasks)]
    pub async fn unsupported(&self, form: Form<TaskRequestDto>) -> TaskResponse {
        let Form(request) = form;
        let user_id = request.mid.clone();

        if let Err(err) = self
            .state
            .notify_unsupported_usecase
            .execute(request.mid)
            .await
        {
            tracing::error!(
                user_id = %user_id,
                error = format!("{err:#}"),
                "unsupported notice dropped"
            );
        }

        TaskResponse::Ok
    }
}
