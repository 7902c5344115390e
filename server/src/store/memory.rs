use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{new_id, Condition, Document, DocumentStore, StoreResult};

type Records = BTreeMap<String, Map<String, Value>>;

/// In-process [`DocumentStore`] with the same semantics as the database
/// backend. Records are kept ordered by id. Intended for tests and for wiring
/// the API without a database.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Records>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn documents<'a>(
        records: Option<&'a Records>,
        conditions: &'a [Condition],
    ) -> impl Iterator<Item = Document> + 'a {
        records
            .into_iter()
            .flat_map(|records| records.iter())
            .filter(move |(_, fields)| conditions.iter().all(|c| c.matches(fields)))
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        let id = new_id();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|records| records.get(id))
            .map(|fields| Document {
                id: id.to_string(),
                fields: fields.clone(),
            }))
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
        let mut collections = self.collections.write().await;
        let Some(record) = collections
            .get_mut(collection)
            .and_then(|records| records.get_mut(id))
        else {
            return Ok(false);
        };

        record.extend(fields);
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .and_then(|records| records.remove(id))
            .is_some())
    }

    async fn query(
        &self,
        collection: &str,
        conditions: &[Condition],
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(Self::documents(collections.get(collection), conditions).collect())
    }
}
