//! Per-entity statement catalog.
//!
//! # Invariants
//! - Parameter order of every statement matches the order the mapper binds:
//!   insert `[id, columns...]`, update `[(included, value) per column..., id]`,
//!   everything else `[id]`.
//! - Collection selects order by ordinality ascending.

use super::quote_name;
use crate::repo::entity::{
    EntitySchema, COLLECTION_ID_COLUMN, COLLECTION_ORDINALITY_COLUMN, COLLECTION_VALUE_COLUMN,
};

/// Placeholder tuple of one collection row: `(id, ordinality, value)`.
pub const COLLECTION_TUPLE: &str = "(?, ?, ?)";

/// SQL text for one child collection table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStatements {
    pub field: &'static str,
    /// Batch insert text up to the first tuple; see `with_tuples`.
    pub insert_prefix: String,
    pub select: String,
    pub delete: String,
}

/// SQL text for one entity, derived once from its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityStatements {
    pub insert: String,
    pub select: String,
    pub exists: String,
    /// `None` when the entity has no scalar columns besides its id.
    pub update: Option<String>,
    pub delete: String,
    pub collections: Vec<CollectionStatements>,
}

impl EntityStatements {
    pub fn for_schema(schema: &EntitySchema) -> Self {
        let table = quote_name(schema.table);
        let id = quote_name(schema.id_column);
        let mut all_columns = vec![id.clone()];
        all_columns.extend(schema.columns.iter().map(|c| quote_name(c.column)));

        let placeholders = vec!["?"; all_columns.len()].join(", ");
        let insert = format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders});",
            all_columns.join(", ")
        );
        let select = format!(
            "SELECT {} FROM {table} WHERE {id} = ?;",
            all_columns.join(", ")
        );
        let exists = format!("SELECT NULL FROM {table} WHERE {id} = ?;");

        let update = if schema.columns.is_empty() {
            None
        } else {
            let assignments = schema
                .columns
                .iter()
                .map(|c| {
                    let column = quote_name(c.column);
                    format!("{column} = CASE WHEN ? THEN ? ELSE {column} END")
                })
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!("UPDATE {table} SET {assignments} WHERE {id} = ?;"))
        };
        let delete = format!("DELETE FROM {table} WHERE {id} = ?;");

        let collections = schema
            .collections
            .iter()
            .map(|collection| {
                let table = quote_name(collection.table);
                let id = quote_name(COLLECTION_ID_COLUMN);
                let ordinality = quote_name(COLLECTION_ORDINALITY_COLUMN);
                let value = quote_name(COLLECTION_VALUE_COLUMN);
                CollectionStatements {
                    field: collection.field,
                    insert_prefix: format!(
                        "INSERT INTO {table} ({id}, {ordinality}, {value}) VALUES "
                    ),
                    select: format!(
                        "SELECT {value} FROM {table} WHERE {id} = ? ORDER BY {ordinality} ASC;"
                    ),
                    delete: format!("DELETE FROM {table} WHERE {id} = ?;"),
                }
            })
            .collect();

        Self {
            insert,
            select,
            exists,
            update,
            delete,
            collections,
        }
    }
}
