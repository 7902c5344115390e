//! Per-operation schemas for the events API.

use super::{Constraint, FieldRule, Schema};
use crate::models::EventType;

const EVENT_TYPE: Constraint = Constraint::OneOf(EventType::NAMES);

const CREATE_RULES: &[FieldRule] = &[
    FieldRule::required("title", Constraint::Text),
    FieldRule::required("eventType", EVENT_TYPE),
    FieldRule::required("date", Constraint::IsoDate),
    FieldRule::required("location", Constraint::Text),
    FieldRule::optional("description", Constraint::Text),
    FieldRule::required("organizer", Constraint::Text),
];

const UPDATE_RULES: &[FieldRule] = &[
    FieldRule::required("id", Constraint::Text),
    FieldRule::optional("title", Constraint::Text),
    FieldRule::optional("eventType", EVENT_TYPE),
    FieldRule::optional("date", Constraint::IsoDate),
    FieldRule::optional("location", Constraint::Text),
    FieldRule::optional("description", Constraint::Text),
    FieldRule::optional("organizer", Constraint::Text),
];

const ID_RULES: &[FieldRule] = &[FieldRule::required("id", Constraint::Text)];

const FILTER_RULES: &[FieldRule] = &[
    FieldRule::optional("eventType", EVENT_TYPE),
    FieldRule::optional("startDate", Constraint::IsoDate),
    FieldRule::optional("endDate", Constraint::IsoDate),
];

pub const CREATE_EVENT: Schema = Schema::new("createEvent", CREATE_RULES);
pub const UPDATE_EVENT: Schema = Schema::new("updateEvent", UPDATE_RULES);
pub const DELETE_EVENT: Schema = Schema::new("deleteEvent", ID_RULES);
pub const GET_EVENT_BY_ID: Schema = Schema::new("getEventById", ID_RULES);
pub const FILTER_EVENTS: Schema = Schema::new("filterEvents", FILTER_RULES);
