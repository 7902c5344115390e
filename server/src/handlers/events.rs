//! Event handlers. Each one runs validate → store call → response, issuing at
//! most one store call per request.

use axum::extract::State;
use axum::response::Response;
use axum::Extension;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::auth::Claims;
use crate::models::{take_id, Event, EventChanges, EventFilter, NewEvent, Stamped};
use crate::routes::AppState;
use crate::store::{to_fields, Document, StoreError};
use crate::utils::error::{ApiError, StoreContext};
use crate::utils::payload::{JsonObject, QueryObject};
use crate::utils::response::{acknowledged, created, record, records};
use crate::validation::schemas::{
    CREATE_EVENT, DELETE_EVENT, FILTER_EVENTS, GET_EVENT_BY_ID, UPDATE_EVENT,
};
use crate::validation::Schema;

fn validate(schema: &Schema, input: &Map<String, Value>) -> Result<Map<String, Value>, ApiError> {
    schema.validate(input).map_err(|errors| {
        debug!(schema = schema.name, count = errors.len(), "Rejected input");
        ApiError::Validation(errors)
    })
}

fn decode<T: DeserializeOwned>(
    context: &'static str,
    fields: Map<String, Value>,
) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| ApiError::Internal {
        context,
        message: e.to_string(),
    })
}

fn required_id(context: &'static str, fields: &mut Map<String, Value>) -> Result<String, ApiError> {
    take_id(fields).ok_or_else(|| ApiError::Internal {
        context,
        message: "validated input is missing id".to_string(),
    })
}

fn into_events(documents: Vec<Document>) -> Result<Vec<Event>, StoreError> {
    documents.into_iter().map(Event::try_from).collect()
}

#[instrument(skip_all, fields(user = %claims.sub))]
pub async fn create_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    JsonObject(body): JsonObject,
) -> Result<Response, ApiError> {
    let fields = validate(&CREATE_EVENT, &body)?;
    let event: NewEvent = decode("createEvent", fields)?;

    let stamped = Stamped::created(event, Utc::now());
    let id = state
        .events()
        .add(to_fields(&stamped).context("createEvent")?)
        .await
        .context("createEvent")?;

    info!(event_id = %id, "Event created");
    Ok(created(id))
}

#[instrument(skip_all)]
pub async fn get_all_events(State(state): State<AppState>) -> Result<Response, ApiError> {
    let documents = state.events().list_all().await.context("getAllEvents")?;
    let events = into_events(documents).context("getAllEvents")?;

    info!(count = events.len(), "Retrieved events");
    Ok(records(events))
}

#[instrument(skip_all, fields(user = %claims.sub))]
pub async fn get_event_by_id(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    QueryObject(query): QueryObject,
) -> Result<Response, ApiError> {
    let mut fields = validate(&GET_EVENT_BY_ID, &query)?;
    let id = required_id("getEventById", &mut fields)?;

    let document = state
        .events()
        .get(&id)
        .await
        .context("getEventById")?
        .ok_or(ApiError::NotFound)?;
    let event = Event::try_from(document).context("getEventById")?;

    info!(event_id = %id, "Event retrieved");
    Ok(record(event))
}

#[instrument(skip_all, fields(user = %claims.sub))]
pub async fn update_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    JsonObject(body): JsonObject,
) -> Result<Response, ApiError> {
    let mut fields = validate(&UPDATE_EVENT, &body)?;
    let id = required_id("updateEvent", &mut fields)?;
    let changes: EventChanges = decode("updateEvent", fields)?;

    let stamped = Stamped::updated(changes, Utc::now());
    let found = state
        .events()
        .update(&id, to_fields(&stamped).context("updateEvent")?)
        .await
        .context("updateEvent")?;

    if !found {
        return Err(ApiError::NotFound);
    }

    info!(event_id = %id, "Event updated");
    Ok(acknowledged("Event updated successfully"))
}

#[instrument(skip_all, fields(user = %claims.sub))]
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    QueryObject(query): QueryObject,
) -> Result<Response, ApiError> {
    let mut fields = validate(&DELETE_EVENT, &query)?;
    let id = required_id("deleteEvent", &mut fields)?;

    let found = state.events().delete(&id).await.context("deleteEvent")?;
    if !found {
        return Err(ApiError::NotFound);
    }

    info!(event_id = %id, "Event deleted");
    Ok(acknowledged("Event deleted successfully"))
}

#[instrument(skip_all)]
pub async fn filter_events(
    State(state): State<AppState>,
    QueryObject(query): QueryObject,
) -> Result<Response, ApiError> {
    let fields = validate(&FILTER_EVENTS, &query)?;
    let filter: EventFilter = decode("filterEvents", fields)?;

    let documents = state
        .events()
        .query(&filter.conditions())
        .await
        .context("filterEvents")?;
    let events = into_events(documents).context("filterEvents")?;

    info!(
        event_type = ?filter.event_type,
        start_date = ?filter.start_date,
        end_date = ?filter.end_date,
        count = events.len(),
        "Filtered events"
    );
    Ok(records(events))
}
