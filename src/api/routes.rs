use axum::{
    routing::post,
    Router,
    extract::{Json, State},
};
use tower_http::cors::{CorsLayer, Any};
use chrono::Utc;

use crate::error::AppError;
use crate::api::models::{ActionRequest, ActionResponse};
use crate::api::response::{self, Reply};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/action", post(action_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn action_handler(
    State(state): State<AppState>,
    Json(req): Json<ActionRequest>,
) -> Result<Reply<ActionResponse>, AppError> {
    let start_time = std::time::Instant::now();

    if req.url.trim().is_empty() {
        let err = AppError::RequestError("url must not be empty".to_string());
        tracing::warn!("rejected toolbar action: {}", err);
        return Err(err);
    }

    tracing::info!(url = %req.url, "toolbar action");
    let result = state
        .background
        .handle_action_click(&req.url)
        .await
        .inspect_err(|err| tracing::error!("toolbar action failed: {}", err))?;
    tracing::debug!(elapsed = ?start_time.elapsed(), "toolbar action handled");

    let message = Some(result.notification.message.clone());
    Ok(response::success(
        ActionResponse {
            url: req.url,
            outcome: result.outcome,
            notification: result.notification,
            open_settings: result.opened_settings,
            handled_at: Utc::now(),
        },
        message,
    ))
}
