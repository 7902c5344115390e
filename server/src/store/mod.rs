//! Record store adapter.
//!
//! [`DocumentStore`] is the seam to the external document database: schema-less
//! JSON records grouped in named collections, with store-assigned ids, atomic
//! partial updates and conjunctive equality/range queries. [`Collection`]
//! binds a store to one collection name for handlers.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the backing store.
///
/// `Display` is a coarse summary that is safe to hand to callers; the driver
/// detail lives in `source()`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store is unavailable")]
    Connection(#[source] sqlx::Error),

    #[error("document store query failed")]
    Query(#[source] sqlx::Error),

    #[error("document store returned a malformed record")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("record could not be encoded for the document store")]
    Encode(#[source] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => StoreError::Connection(err),
            _ => StoreError::Query(err),
        }
    }
}

/// A record together with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
        }
    }

    fn holds(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;

        match self {
            Operator::Eq => ordering == Equal,
            Operator::Gt => ordering == Greater,
            Operator::Gte => ordering != Less,
            Operator::Lt => ordering == Less,
            Operator::Lte => ordering != Greater,
        }
    }
}

/// Operand of a condition. The variant decides how the stored field is read.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// One predicate of a conjunctive query.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: FieldValue,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Operator, value: FieldValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    pub fn eq(field: impl Into<String>, value: FieldValue) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn gt(field: impl Into<String>, value: FieldValue) -> Self {
        Self::new(field, Operator::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: FieldValue) -> Self {
        Self::new(field, Operator::Gte, value)
    }

    pub fn lt(field: impl Into<String>, value: FieldValue) -> Self {
        Self::new(field, Operator::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: FieldValue) -> Self {
        Self::new(field, Operator::Lte, value)
    }

    /// Evaluates the predicate against a record. Records missing the field,
    /// or holding a value of another kind, never match.
    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        let Some(stored) = fields.get(&self.field).and_then(Value::as_str) else {
            return false;
        };

        match &self.value {
            FieldValue::Text(expected) => self.op.holds(stored.cmp(expected.as_str())),
            FieldValue::Timestamp(expected) => DateTime::parse_from_rfc3339(stored)
                .map(|stored| self.op.holds(stored.with_timezone(&Utc).cmp(expected)))
                .unwrap_or(false),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a record and returns its freshly assigned id.
    async fn add(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String>;

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Merges `fields` into the record. Returns `false` if no record has `id`.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<bool>;

    /// Removes the record. Returns `false` if no record has `id`.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;

    /// Records matching every condition. No conditions means every record.
    async fn query(&self, collection: &str, conditions: &[Condition])
        -> StoreResult<Vec<Document>>;
}

/// A store handle scoped to one collection.
#[derive(Clone)]
pub struct Collection {
    store: Arc<dyn DocumentStore>,
    name: &'static str,
}

impl Collection {
    pub fn new(store: Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self { store, name }
    }

    pub async fn add(&self, fields: Map<String, Value>) -> StoreResult<String> {
        self.store.add(self.name, fields).await
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<Document>> {
        self.store.get(self.name, id).await
    }

    pub async fn list_all(&self) -> StoreResult<Vec<Document>> {
        self.store.list_all(self.name).await
    }

    pub async fn update(&self, id: &str, fields: Map<String, Value>) -> StoreResult<bool> {
        self.store.update(self.name, id, fields).await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        self.store.delete(self.name, id).await
    }

    pub async fn query(&self, conditions: &[Condition]) -> StoreResult<Vec<Document>> {
        self.store.query(self.name, conditions).await
    }
}

/// Serializes a value into a record field set.
pub fn to_fields<T: Serialize>(value: &T) -> StoreResult<Map<String, Value>> {
    match serde_json::to_value(value).map_err(StoreError::Encode)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(StoreError::Encode(<serde_json::Error as serde::ser::Error>::custom(
            "record must serialize to an object",
        ))),
    }
}

/// Generates an id for a new record.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
