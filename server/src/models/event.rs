use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::{Condition, Document, FieldValue, StoreError};

/// Collection holding every event document.
pub const EVENTS_COLLECTION: &str = "events";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Conference,
    Meetup,
    Workshop,
    Webinar,
}

impl EventType {
    /// Wire names of every variant, in declaration order.
    pub const NAMES: &'static [&'static str] = &["Conference", "Meetup", "Workshop", "Webinar"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Conference => "Conference",
            EventType::Meetup => "Meetup",
            EventType::Workshop => "Workshop",
            EventType::Webinar => "Webinar",
        }
    }
}

/// A stored event as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub organizer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Document> for Event {
    type Error = StoreError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        let Document { id, mut fields } = document;
        fields.insert("id".to_string(), Value::String(id.clone()));

        serde_json::from_value(Value::Object(fields))
            .map_err(|source| StoreError::Corrupt { id, source })
    }
}

/// Fields accepted by the create operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub organizer: String,
}

/// Partial field set accepted by the update operation. `id` is never part of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
}

/// A field set carrying server-assigned timestamps.
///
/// `created_at` is only written on creation so that updates merge without
/// touching it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamped<T> {
    #[serde(flatten)]
    pub fields: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl<T> Stamped<T> {
    pub fn created(fields: T, now: DateTime<Utc>) -> Self {
        Self {
            fields,
            created_at: Some(now),
            updated_at: now,
        }
    }

    pub fn updated(fields: T, now: DateTime<Utc>) -> Self {
        Self {
            fields,
            created_at: None,
            updated_at: now,
        }
    }
}

/// Optional predicates of the filter operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    #[serde(default)]
    pub event_type: Option<EventType>,
    /// Inclusive lower bound on `date`.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `date`.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl EventFilter {
    /// Conjunction of the predicates that are set.
    pub fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::with_capacity(3);

        if let Some(event_type) = self.event_type {
            conditions.push(Condition::eq(
                "eventType",
                FieldValue::Text(event_type.as_str().to_string()),
            ));
        }
        if let Some(start) = self.start_date {
            conditions.push(Condition::gte("date", FieldValue::Timestamp(start)));
        }
        if let Some(end) = self.end_date {
            conditions.push(Condition::lte("date", FieldValue::Timestamp(end)));
        }

        conditions
    }
}

/// Reads `id` out of a validated field set, leaving the remaining fields.
pub fn take_id(fields: &mut Map<String, Value>) -> Option<String> {
    match fields.remove("id") {
        Some(Value::String(id)) => Some(id),
        _ => None,
    }
}
