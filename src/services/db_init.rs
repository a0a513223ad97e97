use serde::Serialize;
use tracing::{info, warn};

use crate::{
    error::{Result, SetupError},
    models::{CollectionSpec, IndexDefinition, IndexSpec},
};

use super::store::SchemaStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Plan and log every step without issuing create calls.
    pub dry_run: bool,
}

/// What one setup run did (or, in a dry run, would do).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
    pub collections_created: usize,
    pub collections_existing: usize,
    pub indexes_created: usize,
    pub indexes_existing: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexAction {
    Create,
    /// An equivalent index is already there, possibly under another name.
    AlreadyPresent { existing_name: String },
}

/// Decides what to do with one declared index given what the collection has.
///
/// A same-named index must match exactly. Failing that, an index over the
/// same key pattern must agree on uniqueness and carry no other options.
/// Anything else gets created.
pub fn plan_index(
    collection: &str,
    spec: &IndexSpec,
    existing: &[IndexDefinition],
) -> Result<IndexAction> {
    if let Some(found) = existing.iter().find(|e| e.name == spec.name) {
        if found.is_equivalent_to(spec) {
            return Ok(IndexAction::AlreadyPresent {
                existing_name: found.name.clone(),
            });
        }
        return Err(SetupError::IndexConflict {
            collection: collection.to_string(),
            index: spec.name.to_string(),
            detail: format!(
                "existing index has keys {} unique={}{}, declared keys {} unique={}",
                found.keys,
                found.unique,
                options_suffix(found),
                spec.keys_doc(),
                spec.unique
            ),
        });
    }

    let pattern = spec.key_pattern();
    if let Some(found) = existing.iter().find(|e| e.key_pattern() == pattern) {
        if found.is_equivalent_to(spec) {
            return Ok(IndexAction::AlreadyPresent {
                existing_name: found.name.clone(),
            });
        }
        return Err(SetupError::IndexConflict {
            collection: collection.to_string(),
            index: spec.name.to_string(),
            detail: format!(
                "index {} over the same keys has unique={}{}, declared unique={}",
                found.name,
                found.unique,
                options_suffix(found),
                spec.unique
            ),
        });
    }

    Ok(IndexAction::Create)
}

fn options_suffix(found: &IndexDefinition) -> String {
    if found.extra_options.is_empty() {
        String::new()
    } else {
        format!(" {}", found.extra_options.join(" "))
    }
}

/// Ensures every collection in `schema` exists with its declared indexes.
///
/// Steps run strictly in order and the first error aborts the run.
pub async fn ensure_schema<S: SchemaStore + ?Sized>(
    store: &S,
    schema: &[CollectionSpec],
    opts: ApplyOptions,
) -> Result<ApplySummary> {
    store.ping().await?;

    let mut summary = ApplySummary::default();

    for spec in schema {
        info!("setting up collection {}", spec.name);
        ensure_collection(store, spec, opts, &mut summary).await?;
        info!("collection {} done", spec.name);
    }

    info!(
        "schema setup finished: {} collections created, {} already present; {} indexes created, {} already present",
        summary.collections_created,
        summary.collections_existing,
        summary.indexes_created,
        summary.indexes_existing
    );

    Ok(summary)
}

async fn ensure_collection<S: SchemaStore + ?Sized>(
    store: &S,
    spec: &CollectionSpec,
    opts: ApplyOptions,
    summary: &mut ApplySummary,
) -> Result<()> {
    let present = store
        .list_collection_names()
        .await?
        .iter()
        .any(|n| n == spec.name);

    if present {
        summary.collections_existing += 1;
    } else {
        if opts.dry_run {
            info!("[dry-run] would create collection {}", spec.name);
        } else {
            store.create_collection(spec.name).await?;
            info!("created collection {}", spec.name);
        }
        summary.collections_created += 1;
    }

    let existing = store.list_indexes(spec.name).await?;

    for index in spec.indexes {
        match plan_index(spec.name, index, &existing)? {
            IndexAction::AlreadyPresent { existing_name } => {
                if existing_name != index.name {
                    warn!(
                        "{}.{}: equivalent index already present as {}",
                        spec.name, index.name, existing_name
                    );
                }
                summary.indexes_existing += 1;
            }
            IndexAction::Create => {
                if opts.dry_run {
                    info!("[dry-run] would create index {}.{}", spec.name, index.name);
                } else {
                    store.create_index(spec.name, index).await?;
                    info!("created index {}.{}", spec.name, index.name);
                }
                summary.indexes_created += 1;
            }
        }
    }

    Ok(())
}
