//! SQLite implementation of the storage boundary.
//!
//! # Invariants
//! - Transactions are opened with `BEGIN IMMEDIATE` so writers take the
//!   reserved lock up front instead of failing on lock upgrade.
//! - `commit` issues `COMMIT` directly; if it fails the transaction may still
//!   be open and `rollback` ends it explicitly.
//! - Query results are fetched fully before the cursor is returned; the
//!   cancel token is checked per fetched row and per cursor advance.

use super::{BufferedRows, CancelToken, Database, StatementResult, Transaction};
use crate::codec::SqlValue;
use crate::db::{ensure_connection_ready, DbResult};
use rusqlite::{params_from_iter, Connection, TransactionBehavior};

/// Borrowed handle over a migrated SQLite connection.
#[derive(Debug, Clone, Copy)]
pub struct SqliteDatabase<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDatabase<'conn> {
    /// Wraps `conn` without checking its schema.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps `conn` after verifying migrations have been applied.
    pub fn try_new(conn: &'conn Connection) -> DbResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self::new(conn))
    }
}

impl<'conn> Database for SqliteDatabase<'conn> {
    type Tx<'a>
        = SqliteTransaction<'a>
    where
        Self: 'a;

    fn begin(&self, cancel: &CancelToken) -> StatementResult<SqliteTransaction<'_>> {
        cancel.check()?;
        let tx = rusqlite::Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        Ok(SqliteTransaction {
            tx,
            cancel: cancel.clone(),
        })
    }
}

/// Open SQLite transaction; rolls back on drop unless committed.
pub struct SqliteTransaction<'conn> {
    tx: rusqlite::Transaction<'conn>,
    cancel: CancelToken,
}

impl Transaction for SqliteTransaction<'_> {
    type Cursor = BufferedRows;

    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> StatementResult<usize> {
        self.cancel.check()?;
        let changed = self.tx.execute(sql, params_from_iter(params.iter()))?;
        Ok(changed)
    }

    fn query(&mut self, sql: &str, params: &[SqlValue]) -> StatementResult<BufferedRows> {
        self.cancel.check()?;
        let mut stmt = self.tx.prepare(sql)?;
        let width = stmt.column_count();
        let mut rows = stmt.query(params_from_iter(params.iter()))?;

        let mut fetched = Vec::new();
        while let Some(row) = rows.next()? {
            self.cancel.check()?;
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                values.push(SqlValue::from(row.get_ref(index)?));
            }
            fetched.push(values);
        }

        Ok(BufferedRows::new(fetched, self.cancel.clone()))
    }

    fn commit(&mut self) -> StatementResult<()> {
        self.cancel.check()?;
        // Leaves `self.tx` in autocommit mode, which makes its drop a no-op.
        self.tx.execute_batch("COMMIT;")?;
        Ok(())
    }

    fn rollback(self) -> StatementResult<()> {
        if self.tx.is_autocommit() {
            return Ok(());
        }
        self.tx.rollback()?;
        Ok(())
    }
}
