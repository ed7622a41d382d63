//! Generic create/read/update/delete mapper for one entity type.
//!
//! # Responsibility
//! - Run each operation as one transaction of sequential statements.
//! - Encode entities through the scalar codec and rebuild them on read.
//!
//! # Invariants
//! - Every body error is followed by a rollback attempt; a rollback failure
//!   is combined with the body error, never dropped.
//! - Update leaves unmasked scalar columns and collections untouched.
//! - Collection rows are written with contiguous ordinals from 0.
//! - Errors are returned to the caller, not logged here.

use crate::codec::{column, encode_text, SqlValue};
use crate::db::{ensure_connection_ready, ensure_entity_tables, DbResult};
use crate::error::{CompositeError, CrudError, CrudResult};
use crate::mask::FieldMask;
use crate::repo::entity::Entity;
use crate::sql::{with_tuples, CollectionStatements, EntityStatements, COLLECTION_TUPLE};
use crate::store::{
    CancelToken, Database, RowCursor, SqliteDatabase, StatementError, Transaction,
};
use log::debug;
use rusqlite::Connection;
use std::marker::PhantomData;
use std::time::Instant;

/// Repository interface for one entity type.
pub trait EntityRepository<E: Entity> {
    /// Writes the entity and all non-empty collections.
    fn create(&self, cancel: &CancelToken, entity: &E) -> CrudResult<()>;
    /// Reads the entity with `id`, failing with `NotFound` when absent.
    fn read(&self, cancel: &CancelToken, id: &str) -> CrudResult<E>;
    /// Overwrites the fields of `entity` that `mask` includes.
    fn update(&self, cancel: &CancelToken, entity: &E, mask: &FieldMask) -> CrudResult<()>;
    /// Removes the entity with `id`; missing ids are not an error.
    fn delete(&self, cancel: &CancelToken, id: &str) -> CrudResult<()>;
}

/// Statement-driven mapper over any `Database`.
pub struct EntityMapper<D, E> {
    db: D,
    statements: EntityStatements,
    _entity: PhantomData<fn() -> E>,
}

impl<D: Database, E: Entity> EntityMapper<D, E> {
    pub fn new(db: D) -> Self {
        Self {
            db,
            statements: EntityStatements::for_schema(E::schema()),
            _entity: PhantomData,
        }
    }

    pub fn statements(&self) -> &EntityStatements {
        &self.statements
    }

    /// Runs `body` inside one transaction.
    ///
    /// Commits when `body` succeeds and the token is still live. Any failure,
    /// including a failed commit, is followed by a rollback whose own error is
    /// reported together with the failure.
    fn in_transaction<'a, T, F>(&'a self, cancel: &CancelToken, body: F) -> CrudResult<T>
    where
        F: FnOnce(&mut D::Tx<'a>) -> CrudResult<T>,
    {
        let mut tx = self.db.begin(cancel)?;
        let outcome = body(&mut tx).and_then(|value| {
            cancel.check()?;
            tx.commit()?;
            Ok(value)
        });

        outcome.map_err(|primary| with_rollback(primary, tx.rollback().err()))
    }
}

impl<'conn, E: Entity> EntityMapper<SqliteDatabase<'conn>, E> {
    /// Builds a SQLite-backed mapper after checking the schema version and
    /// that every table and column of `E` exists.
    pub fn for_sqlite(conn: &'conn Connection) -> DbResult<Self> {
        ensure_connection_ready(conn)?;
        ensure_entity_tables(conn, E::schema())?;
        Ok(Self::new(SqliteDatabase::new(conn)))
    }
}

impl<D: Database, E: Entity> EntityRepository<E> for EntityMapper<D, E> {
    fn create(&self, cancel: &CancelToken, entity: &E) -> CrudResult<()> {
        let started_at = Instant::now();
        self.in_transaction(cancel, |tx| {
            let id = encode_text(entity.id());
            let mut params = Vec::with_capacity(E::schema().columns.len() + 1);
            params.push(id.clone());
            params.extend(entity.encode_columns());
            tx.execute(&self.statements.insert, &params)?;

            for (index, collection) in self.statements.collections.iter().enumerate() {
                insert_collection(tx, collection, &id, entity.encode_collection(index))?;
            }
            Ok(())
        })?;

        debug!(
            "event=entity_create module=repo status=ok table={} duration_ms={}",
            E::schema().table,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn read(&self, cancel: &CancelToken, id: &str) -> CrudResult<E> {
        let started_at = Instant::now();
        let entity = self.in_transaction(cancel, |tx| {
            let id_value = encode_text(id);
            let mut cursor = tx.query(&self.statements.select, std::slice::from_ref(&id_value))?;
            if !cursor.advance()? {
                return Err(not_found::<E>(id));
            }
            let mut entity = E::decode_row(cursor.scan()?)?;
            cursor.close();

            for (index, collection) in self.statements.collections.iter().enumerate() {
                let mut cursor = tx.query(&collection.select, std::slice::from_ref(&id_value))?;
                let mut values = Vec::new();
                while cursor.advance()? {
                    values.push(column(cursor.scan()?, 0)?.clone());
                }
                cursor.close();
                entity.decode_collection(index, &values)?;
            }
            Ok(entity)
        })?;

        debug!(
            "event=entity_read module=repo status=ok table={} duration_ms={}",
            E::schema().table,
            started_at.elapsed().as_millis()
        );
        Ok(entity)
    }

    fn update(&self, cancel: &CancelToken, entity: &E, mask: &FieldMask) -> CrudResult<()> {
        let started_at = Instant::now();
        let schema = E::schema();
        self.in_transaction(cancel, |tx| {
            let id = encode_text(entity.id());
            let mut cursor = tx.query(&self.statements.exists, std::slice::from_ref(&id))?;
            if !cursor.advance()? {
                return Err(not_found::<E>(entity.id()));
            }
            cursor.close();

            if let Some(update) = &self.statements.update {
                let mut params = Vec::with_capacity(schema.columns.len() * 2 + 1);
                for (column, value) in schema.columns.iter().zip(entity.encode_columns()) {
                    params.push(SqlValue::from(mask.included(column.field)));
                    params.push(value);
                }
                params.push(id.clone());
                tx.execute(update, &params)?;
            }

            for (index, collection) in self.statements.collections.iter().enumerate() {
                if !mask.included(collection.field) {
                    continue;
                }
                tx.execute(&collection.delete, std::slice::from_ref(&id))?;
                insert_collection(tx, collection, &id, entity.encode_collection(index))?;
            }
            Ok(())
        })?;

        debug!(
            "event=entity_update module=repo status=ok table={} masked={} duration_ms={}",
            schema.table,
            !mask.is_all(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn delete(&self, cancel: &CancelToken, id: &str) -> CrudResult<()> {
        let started_at = Instant::now();
        self.in_transaction(cancel, |tx| {
            let id_value = encode_text(id);
            for collection in &self.statements.collections {
                tx.execute(&collection.delete, std::slice::from_ref(&id_value))?;
            }
            tx.execute(&self.statements.delete, std::slice::from_ref(&id_value))?;
            Ok(())
        })?;

        debug!(
            "event=entity_delete module=repo status=ok table={} duration_ms={}",
            E::schema().table,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// Batch-inserts `values` as `(id, ordinality, value)` rows. Empty input
/// writes nothing.
fn insert_collection<T: Transaction>(
    tx: &mut T,
    collection: &CollectionStatements,
    id: &SqlValue,
    values: Vec<SqlValue>,
) -> CrudResult<()> {
    if values.is_empty() {
        return Ok(());
    }

    let count = values.len();
    let mut params = Vec::with_capacity(count * 3);
    for (ordinality, value) in (0_i64..).zip(values) {
        params.push(id.clone());
        params.push(SqlValue::Integer(ordinality));
        params.push(value);
    }
    tx.execute(
        &with_tuples(&collection.insert_prefix, COLLECTION_TUPLE, count),
        &params,
    )?;
    Ok(())
}

fn not_found<E: Entity>(id: &str) -> CrudError {
    CrudError::NotFound {
        table: E::schema().table,
        id: id.to_string(),
    }
}

/// Keeps `primary` as is when the rollback succeeded; otherwise reports both.
fn with_rollback(primary: CrudError, rollback: Option<StatementError>) -> CrudError {
    match rollback {
        None => primary,
        Some(rollback) => CompositeError::with_primary(primary, [Some(rollback.into())]).into(),
    }
}
