use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{FromRow, Postgres, QueryBuilder};

use super::{new_id, Condition, Document, DocumentStore, FieldValue, StoreError, StoreResult};

/// [`DocumentStore`] over a PostgreSQL `documents` table holding one JSONB
/// body per `(collection, id)`.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Map<String, Value>>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            fields: row.data.0,
        }
    }
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(StoreError::Connection)?;

        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

/// Compiles a conjunctive query. Field names and operands are bound as
/// parameters; only operators are spliced into the SQL text.
fn select_matching<'a>(
    collection: &'a str,
    conditions: &'a [Condition],
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("SELECT id, data FROM documents WHERE collection = ");
    builder.push_bind(collection);

    for condition in conditions {
        match &condition.value {
            FieldValue::Text(value) => {
                builder.push(" AND data->>");
                builder.push_bind(condition.field.as_str());
                builder.push(format!(" {} ", condition.op.as_sql()));
                builder.push_bind(value.as_str());
            }
            FieldValue::Timestamp(value) => {
                builder.push(" AND (data->>");
                builder.push_bind(condition.field.as_str());
                builder.push(format!(")::timestamptz {} ", condition.op.as_sql()));
                builder.push_bind(*value);
            }
        }
    }

    builder.push(" ORDER BY id");
    builder
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn add(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        let id = new_id();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(fields))
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn list_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.query(collection, &[]).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(fields))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn query(
        &self,
        collection: &str,
        conditions: &[Condition],
    ) -> StoreResult<Vec<Document>> {
        let mut builder = select_matching(collection, conditions);
        let rows = builder
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }
}
