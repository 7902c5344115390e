use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedBody {
    pub success: bool,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub success: bool,
    pub message: String,
}

pub fn success<T>(data: T, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    let body = ApiResponse {
        success: true,
        data: Some(data),
        message: Some(message.into()),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// `201 {success, id}` for a newly stored record.
pub fn created(id: impl Into<String>) -> Response {
    let body = CreatedBody {
        success: true,
        id: id.into(),
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

/// `200 {success, message}` acknowledging a mutation.
pub fn acknowledged(message: impl Into<String>) -> Response {
    let body = MessageBody {
        success: true,
        message: message.into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub fn record<T>(record: T) -> Response
where
    T: Serialize,
{
    (StatusCode::OK, Json(record)).into_response()
}

/// `200` with the records, or `204` when there are none.
pub fn records<T>(records: Vec<T>) -> Response
where
    T: Serialize,
{
    let status = if records.is_empty() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    };
    (status, Json(records)).into_response()
}
