//! Verification report printed after setup.

use std::fmt;

use serde::Serialize;

use crate::{
    error::{Result, SetupError},
    models::{normalized_keys_doc, CollectionSpec, IndexDefinition},
    services::{db_init::ApplySummary, store::SchemaStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(SetupError::Config(format!(
                "unknown report format {other:?}, expected text or json"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionIndexes {
    pub collection: String,
    pub indexes: Vec<IndexDefinition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    pub database: String,
    pub dry_run: bool,
    pub summary: ApplySummary,
    pub collections: Vec<String>,
    pub indexes: Vec<CollectionIndexes>,
}

/// Reads back what the database now holds for the managed collections.
pub async fn collect<S: SchemaStore + ?Sized>(
    store: &S,
    database: &str,
    schema: &[CollectionSpec],
    summary: ApplySummary,
    dry_run: bool,
) -> Result<SchemaReport> {
    let collections = store.list_collection_names().await?;

    let mut indexes = Vec::with_capacity(schema.len());
    for spec in schema {
        let mut found = store.list_indexes(spec.name).await?;
        // shell-created indexes come back as `1.0` / `-1.0`
        for idx in &mut found {
            idx.keys = normalized_keys_doc(&idx.keys);
        }
        indexes.push(CollectionIndexes {
            collection: spec.name.to_string(),
            indexes: found,
        });
    }

    Ok(SchemaReport {
        database: database.to_string(),
        dry_run,
        summary,
        collections,
        indexes,
    })
}

impl SchemaReport {
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| SetupError::Database(format!("report serialization: {e}"))),
        }
    }
}

// `{"message_id":1,"user_id":1}`, field order as stored
fn key_pattern_json(idx: &IndexDefinition) -> String {
    let keys = normalized_keys_doc(&idx.keys);
    serde_json::to_string(&keys).unwrap_or_else(|_| keys.to_string())
}

impl fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            writeln!(f, "(dry run, nothing was created)")?;
        }

        writeln!(f, "collections in {}:", self.database)?;
        for name in &self.collections {
            writeln!(f, "  - {name}")?;
        }

        writeln!(f)?;
        writeln!(f, "indexes per collection:")?;
        for entry in &self.indexes {
            writeln!(f, "{} ({} indexes):", entry.collection, entry.indexes.len())?;
            for idx in &entry.indexes {
                let unique = if idx.unique { " unique" } else { "" };
                write!(f, "  - {} {}{}", key_pattern_json(idx), idx.name, unique)?;
                if !idx.extra_options.is_empty() {
                    write!(f, " [{}]", idx.extra_options.join(", "))?;
                }
                writeln!(f)?;
            }
        }

        writeln!(f)?;
        write!(
            f,
            "collections created: {}, already present: {}; indexes created: {}, already present: {}",
            self.summary.collections_created,
            self.summary.collections_existing,
            self.summary.indexes_created,
            self.summary.indexes_existing
        )
    }
}
