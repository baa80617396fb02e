pub mod endpoints;
pub mod requests;
pub mod responses;

use std::sync::Arc;

use poem::Route;
use poem_openapi::OpenApiService;

use crate::presentation::http::endpoints::{
    callback::CallbackEndpoints, health::HealthEndpoints, root::ApiState, tasks::TaskEndpoints,
    usage::UsageEndpoints,
};

/// The complete route table of the service.
pub fn routes(state: Arc<ApiState>, server_url: &str) -> Route {
    let api_service = OpenApiService::new(
        (
            CallbackEndpoints::new(state.clone()),
            TaskEndpoints::new(state.clone()),
            UsageEndpoints::new(state),
            HealthEndpoints,
        ),
        "LINE Bot",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url.to_string());
    let ui = api_service.swagger_ui();

    Route::new().nest("/docs", ui).nest("/", api_service)
}
