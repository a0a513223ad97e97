use async_trait::async_trait;
use futures_util::StreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{Error, ErrorKind},
    options::IndexOptions,
    Database, IndexModel,
};

use crate::{
    error::{Result, SetupError},
    models::{IndexDefinition, IndexSpec},
};

use super::store::SchemaStore;

// server error codes we act on
const UNAUTHORIZED: i32 = 13;
const NAMESPACE_NOT_FOUND: i32 = 26;
const NAMESPACE_EXISTS: i32 = 48;
const INDEX_OPTIONS_CONFLICT: i32 = 85;
const INDEX_KEY_SPECS_CONFLICT: i32 = 86;
const COMMAND_NOT_SUPPORTED_ON_VIEW: i32 = 166;

/// `SchemaStore` over one MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Options we never declare, rendered one per entry.
///
/// `background` and `v` are left out; the server ignores the first and sets
/// the second on every index.
pub fn extra_options(opts: &IndexOptions) -> Vec<String> {
    let mut out = Vec::new();
    if opts.sparse == Some(true) {
        out.push("sparse".to_string());
    }
    if opts.hidden == Some(true) {
        out.push("hidden".to_string());
    }
    if let Some(filter) = &opts.partial_filter_expression {
        out.push(format!("partialFilterExpression={filter}"));
    }
    if let Some(ttl) = opts.expire_after {
        out.push(format!("expireAfterSeconds={}", ttl.as_secs()));
    }
    if let Some(collation) = &opts.collation {
        out.push(format!("collation={}", collation.locale));
    }
    if let Some(projection) = &opts.wildcard_projection {
        out.push(format!("wildcardProjection={projection}"));
    }
    out
}

fn view_conflict(collection: &str, e: Error) -> SetupError {
    SetupError::CollectionConflict {
        collection: collection.to_string(),
        detail: format!("name is taken by a view: {e}"),
    }
}

fn command_code(e: &Error) -> Option<i32> {
    match e.kind.as_ref() {
        ErrorKind::Command(c) => Some(c.code),
        _ => None,
    }
}

/// Maps a driver error onto the setup taxonomy, keeping the driver message.
pub fn classify(e: Error) -> SetupError {
    let msg = e.to_string();
    match e.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => SetupError::Connection(msg),
        ErrorKind::Authentication { .. } => SetupError::Permission(msg),
        ErrorKind::Command(c) if c.code == UNAUTHORIZED => SetupError::Permission(msg),
        _ => SetupError::Database(msg),
    }
}

#[async_trait]
impl SchemaStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        self.db.list_collection_names(None).await.map_err(classify)
    }

    async fn create_collection(&self, name: &str) -> Result<()> {
        match self.db.create_collection(name, None).await {
            Ok(()) => Ok(()),
            // created concurrently between our listing and this call
            Err(e) if command_code(&e) == Some(NAMESPACE_EXISTS) => Ok(()),
            Err(e) => Err(classify(e)),
        }
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDefinition>> {
        let col = self.db.collection::<Document>(collection);

        let mut cursor = match col.list_indexes(None).await {
            Ok(c) => c,
            Err(e) if command_code(&e) == Some(NAMESPACE_NOT_FOUND) => return Ok(Vec::new()),
            // `listCollections` reports views too, so this is where one shows up
            Err(e) if command_code(&e) == Some(COMMAND_NOT_SUPPORTED_ON_VIEW) => {
                return Err(view_conflict(collection, e));
            }
            Err(e) => return Err(classify(e)),
        };

        let mut out = Vec::new();
        while let Some(item) = cursor.next().await {
            let model = item.map_err(classify)?;
            let opts = model.options.unwrap_or_default();
            let extras = extra_options(&opts);
            out.push(IndexDefinition {
                name: opts.name.unwrap_or_default(),
                keys: model.keys,
                unique: opts.unique.unwrap_or(false),
                extra_options: extras,
            });
        }

        Ok(out)
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<()> {
        let col = self.db.collection::<Document>(collection);
        let model = IndexModel::builder()
            .keys(index.keys_doc())
            .options(
                IndexOptions::builder()
                    .name(index.name.to_string())
                    .unique(index.unique)
                    .build(),
            )
            .build();

        match col.create_index(model, None).await {
            Ok(_) => Ok(()),
            Err(e)
                if matches!(
                    command_code(&e),
                    Some(INDEX_OPTIONS_CONFLICT) | Some(INDEX_KEY_SPECS_CONFLICT)
                ) =>
            {
                Err(SetupError::IndexConflict {
                    collection: collection.to_string(),
                    index: index.name.to_string(),
                    detail: e.to_string(),
                })
            }
            Err(e) if command_code(&e) == Some(COMMAND_NOT_SUPPORTED_ON_VIEW) => {
                Err(view_conflict(collection, e))
            }
            Err(e) => Err(classify(e)),
        }
    }
}
