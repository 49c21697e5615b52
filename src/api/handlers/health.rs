use crate::types::MessageResponse;
use axum::Json;

/// Liveness check
#[utoipa::path(
    get,
    path = "/api/v1/ping",
    responses(
        (status = 200, description = "Service is up", body = MessageResponse)
    ),
    tag = "ping"
)]
pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::new("hello world"))
}
