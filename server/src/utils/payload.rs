//! Extractors that hand raw input to the schema validator.
//!
//! Framework rejections (bad JSON, wrong content type, undecodable query
//! strings) surface as validation failures so every client error shares one
//! response shape.

use std::collections::HashMap;

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Json, Query, Request};
use axum::http::request::Parts;
use serde_json::{Map, Value};

use super::error::ApiError;

/// A JSON request body that must be an object.
#[derive(Debug)]
pub struct JsonObject(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;

        match value {
            Value::Object(fields) => Ok(JsonObject(fields)),
            _ => Err(ApiError::Validation(vec![
                "\"value\" must be of type object".to_string(),
            ])),
        }
    }
}

/// Query string parameters as a string-valued object.
#[derive(Debug)]
pub struct QueryObject(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequestParts<S> for QueryObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;

        Ok(QueryObject(
            params
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        ))
    }
}
