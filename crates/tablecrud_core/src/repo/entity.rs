//! Declarative entity shape consumed by the generic mapper.
//!
//! # Responsibility
//! - Describe the parent table, scalar columns, and child collections of one
//!   entity type.
//! - Bridge typed entity fields to ordered storage values.
//!
//! # Invariants
//! - `encode_columns` and `decode_row` follow `EntitySchema::columns` order;
//!   `decode_row` additionally expects the id as column 0.
//! - Collection indexes refer to positions in `EntitySchema::collections`.
//! - Every collection table has the columns `(id, ordinality, value)`.

use crate::codec::{CodecResult, SqlValue};

/// Join key column of every collection table.
pub const COLLECTION_ID_COLUMN: &str = "id";
/// Zero-based element position column of every collection table.
pub const COLLECTION_ORDINALITY_COLUMN: &str = "ordinality";
/// Element value column of every collection table.
pub const COLLECTION_VALUE_COLUMN: &str = "value";

/// One scalar field stored in the parent table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field name as it appears in field masks.
    pub field: &'static str,
    pub column: &'static str,
}

/// One repeated field stored in its own ordered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    /// Field name as it appears in field masks.
    pub field: &'static str,
    pub table: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub table: &'static str,
    pub id_column: &'static str,
    /// Scalar columns other than the id.
    pub columns: &'static [Column],
    pub collections: &'static [Collection],
}

/// Record type that can be mapped onto an `EntitySchema`.
pub trait Entity: Sized {
    fn schema() -> &'static EntitySchema;

    fn id(&self) -> &str;

    /// Encoded scalar values in `schema().columns` order.
    fn encode_columns(&self) -> Vec<SqlValue>;

    /// Builds an entity from a parent row laid out as `[id, columns...]`.
    /// Collections start empty.
    fn decode_row(row: &[SqlValue]) -> CodecResult<Self>;

    /// Encoded elements of collection `index`, in iteration order.
    fn encode_collection(&self, index: usize) -> Vec<SqlValue>;

    /// Replaces collection `index` with decoded `values`, keeping their order.
    fn decode_collection(&mut self, index: usize, values: &[SqlValue]) -> CodecResult<()>;
}
