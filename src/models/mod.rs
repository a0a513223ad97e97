pub mod index_spec;

pub use index_spec::{normalize_keys, normalized_keys_doc, CollectionSpec, Direction, IndexDefinition, IndexSpec};
