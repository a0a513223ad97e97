use mongodb::bson::{Bson, Document};
use serde::Serialize;

/// Sort direction of one field inside an index key pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_i32(self) -> i32 {
        match self {
            Direction::Asc => 1,
            Direction::Desc => -1,
        }
    }
}

/// One declared index on a managed collection.
#[derive(Debug, Clone, Copy)]
pub struct IndexSpec {
    pub name: &'static str,
    pub keys: &'static [(&'static str, Direction)],
    pub unique: bool,
}

impl IndexSpec {
    /// Key pattern as the driver expects it, e.g. `{ "push_time": -1 }`.
    pub fn keys_doc(&self) -> Document {
        let mut doc = Document::new();
        for (field, dir) in self.keys {
            doc.insert(*field, dir.as_i32());
        }
        doc
    }

    pub fn key_pattern(&self) -> Vec<(String, Bson)> {
        normalize_keys(&self.keys_doc())
    }
}

/// A managed collection and the indexes it must carry.
#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub indexes: &'static [IndexSpec],
}

/// An index as the database reports it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDefinition {
    pub name: String,
    pub keys: Document,
    pub unique: bool,
    /// Options we never declare (`sparse`, `partialFilterExpression=...`),
    /// one entry each. Any entry makes the index differ from every spec.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_options: Vec<String>,
}

impl IndexDefinition {
    pub fn key_pattern(&self) -> Vec<(String, Bson)> {
        normalize_keys(&self.keys)
    }

    /// Same ordered key pattern, same uniqueness and no other options.
    pub fn is_equivalent_to(&self, spec: &IndexSpec) -> bool {
        self.unique == spec.unique
            && self.extra_options.is_empty()
            && self.key_pattern() == spec.key_pattern()
    }
}

/// Ordered key pattern with integral directions folded to `Int32`.
///
/// The server may hand back `1`, `1i64` or `1.0` for the same direction
/// depending on which client created the index. Non-numeric values
/// (`"text"`, `"2dsphere"`, ...) are kept as they are.
pub fn normalize_keys(keys: &Document) -> Vec<(String, Bson)> {
    keys.iter()
        .map(|(field, value)| {
            let value = match value {
                Bson::Int64(n) if i32::try_from(*n).is_ok() => Bson::Int32(*n as i32),
                Bson::Double(f) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => {
                    Bson::Int32(*f as i32)
                }
                other => other.clone(),
            };
            (field.clone(), value)
        })
        .collect()
}

/// `normalize_keys` folded back into a document, for display.
pub fn normalized_keys_doc(keys: &Document) -> Document {
    normalize_keys(keys).into_iter().collect()
}
