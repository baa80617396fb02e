use poem_openapi::ApiResponse;

/// Webhook acknowledgement. The platform only looks at the status.
#[derive(ApiResponse, Debug, PartialEq, Eq)]
pub enum CallbackResponse {
    /// Every event was handled (replies are best-effort)
    #[oai(status = 200)]
    Ok,
    /// The `X-Line-Signature` header did not match the body
    #[oai(status = 400)]
    InvalidSignature,
    /// Missing credentials or an undecodable body
    #[oai(status = 500)]
    InternalError,
}

/// Task queue acknowledgement. Failures are logged, not reported.
#[derive(ApiResponse, Debug, PartialEq, Eq)]
pub enum TaskResponse {
    #[oai(status = 200)]
    Ok,
}
