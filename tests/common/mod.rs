#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::doc;
use notifylog_setup::{
    models::{IndexDefinition, IndexSpec},
    services::store::SchemaStore,
    Result, SetupError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateCollection(String),
    CreateIndex(String, String),
}

/// In-memory stand-in for a MongoDB database.
#[derive(Default)]
pub struct MemoryStore {
    pub collections: Mutex<Vec<(String, Vec<IndexDefinition>)>>,
    pub calls: Mutex<Vec<Call>>,
    pub unreachable: bool,
    /// `create_collection` on this name fails with `Permission`.
    pub deny_create: Option<String>,
    /// Names taken by views: listed as collections, but carry no indexes.
    pub views: Vec<String>,
}

fn id_index() -> IndexDefinition {
    IndexDefinition {
        name: "_id_".into(),
        keys: doc! { "_id": 1 },
        unique: false,
        extra_options: Vec::new(),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a collection with `_id_` plus the given indexes.
    pub fn with_collection(self, name: &str, extra: Vec<IndexDefinition>) -> Self {
        let mut indexes = vec![id_index()];
        indexes.extend(extra);
        self.collections.lock().unwrap().push((name.to_string(), indexes));
        self
    }

    pub fn with_view(mut self, name: &str) -> Self {
        self.views.push(name.to_string());
        self
    }

    fn check_not_view(&self, name: &str) -> Result<()> {
        if self.views.iter().any(|v| v == name) {
            return Err(SetupError::CollectionConflict {
                collection: name.to_string(),
                detail: "name is taken by a view".into(),
            });
        }
        Ok(())
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.collections
            .lock()
            .unwrap()
            .iter()
            .map(|(n, _)| n.clone())
            .collect()
    }

    pub fn indexes_of(&self, name: &str) -> Vec<IndexDefinition> {
        self.collections
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, i)| i.clone())
            .unwrap_or_default()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable {
            return Err(SetupError::Connection("server selection timeout".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SchemaStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        self.check_reachable()
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        self.check_reachable()?;
        let mut names = self.collection_names();
        names.extend(self.views.iter().cloned());
        Ok(names)
    }

    async fn create_collection(&self, name: &str) -> Result<()> {
        self.check_reachable()?;
        if self.deny_create.as_deref() == Some(name) {
            return Err(SetupError::Permission(format!("not authorized to create {name}")));
        }
        self.calls
            .lock()
            .unwrap()
            .push(Call::CreateCollection(name.to_string()));

        let mut cols = self.collections.lock().unwrap();
        if !cols.iter().any(|(n, _)| n == name) {
            cols.push((name.to_string(), vec![id_index()]));
        }
        Ok(())
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDefinition>> {
        self.check_reachable()?;
        self.check_not_view(collection)?;
        Ok(self.indexes_of(collection))
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<()> {
        self.check_reachable()?;
        self.check_not_view(collection)?;
        self.calls
            .lock()
            .unwrap()
            .push(Call::CreateIndex(collection.to_string(), index.name.to_string()));

        let mut cols = self.collections.lock().unwrap();
        if !cols.iter().any(|(n, _)| n == collection) {
            cols.push((collection.to_string(), vec![id_index()]));
        }
        let (_, indexes) = cols.iter_mut().find(|(n, _)| n == collection).unwrap();

        if let Some(found) = indexes.iter().find(|i| i.name == index.name) {
            if found.is_equivalent_to(index) {
                return Ok(());
            }
            return Err(SetupError::IndexConflict {
                collection: collection.to_string(),
                index: index.name.to_string(),
                detail: "index with this name already exists with different options".into(),
            });
        }

        indexes.push(IndexDefinition {
            name: index.name.to_string(),
            keys: index.keys_doc(),
            unique: index.unique,
            extra_options: Vec::new(),
        });
        Ok(())
    }
}
