use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};

/// Envelope for every daemon reply; `data` is absent on errors.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Error,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: ReplyStatus,
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
    pub message: Option<String>,
}

impl ResponseMeta {
    fn new(status: ReplyStatus, code: StatusCode, message: Option<String>) -> Self {
        Self {
            status,
            status_code: code.as_u16(),
            timestamp: Utc::now(),
            message,
        }
    }
}

pub type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn success<T: Serialize>(data: T, message: Option<String>) -> Reply<T> {
    let meta = ResponseMeta::new(ReplyStatus::Success, StatusCode::OK, message);
    (StatusCode::OK, Json(ApiResponse { data: Some(data), meta }))
}

pub fn error<T>(status: StatusCode, message: String) -> Reply<T> {
    let meta = ResponseMeta::new(ReplyStatus::Error, status, Some(message));
    (status, Json(ApiResponse { data: None, meta }))
}
