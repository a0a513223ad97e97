use async_trait::async_trait;

use crate::{
    error::Result,
    models::{IndexDefinition, IndexSpec},
};

/// The schema operations setup needs from a database.
///
/// `MongoStore` talks to a real server; tests use an in-memory double.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Round trip to the server. Fails with `Connection` when unreachable.
    async fn ping(&self) -> Result<()>;

    async fn list_collection_names(&self) -> Result<Vec<String>>;

    /// Creating a collection that already exists is not an error.
    async fn create_collection(&self, name: &str) -> Result<()>;

    /// Indexes of `collection`, `_id_` included. Empty if the collection is missing.
    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDefinition>>;

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<()>;
}
