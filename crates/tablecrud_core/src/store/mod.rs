//! Storage boundary consumed by entity mappers.
//!
//! # Responsibility
//! - Define the narrow statement-execution and row-iteration contract the
//!   mapper depends on.
//! - Carry cancellation into every statement and row advance.
//!
//! # Invariants
//! - A transaction ends by a successful `commit` or by `rollback`; a failed
//!   `commit` leaves the handle usable so the caller can still roll back.
//!   Dropping an unfinished transaction rolls it back.
//! - `commit` and `rollback` failures are returned, never swallowed.

mod cancel;
pub mod sqlite;

use crate::codec::SqlValue;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use cancel::CancelToken;
pub use sqlite::{SqliteDatabase, SqliteTransaction};

pub type StatementResult<T> = Result<T, StatementError>;

/// The storage engine rejected or could not run a statement.
#[derive(Debug)]
pub enum StatementError {
    Sqlite(rusqlite::Error),
    Cancelled,
    DeadlineExceeded,
    NoCurrentRow,
    /// Failure reported by a non-SQLite backend.
    Backend(String),
}

impl Display for StatementError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::DeadlineExceeded => write!(f, "operation deadline exceeded"),
            Self::NoCurrentRow => write!(f, "cursor is not positioned on a row"),
            Self::Backend(message) => write!(f, "{message}"),
        }
    }
}

impl Error for StatementError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Cancelled | Self::DeadlineExceeded | Self::NoCurrentRow | Self::Backend(_) => {
                None
            }
        }
    }
}

impl From<rusqlite::Error> for StatementError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Source of transactions.
pub trait Database {
    type Tx<'a>: Transaction
    where
        Self: 'a;

    /// Opens a transaction whose statements observe `cancel`.
    fn begin(&self, cancel: &CancelToken) -> StatementResult<Self::Tx<'_>>;
}

/// One open transaction.
pub trait Transaction {
    type Cursor: RowCursor;

    /// Runs a statement and returns the affected row count.
    fn execute(&mut self, sql: &str, params: &[SqlValue]) -> StatementResult<usize>;

    fn query(&mut self, sql: &str, params: &[SqlValue]) -> StatementResult<Self::Cursor>;

    /// Commits pending writes. On failure the transaction is not consumed.
    fn commit(&mut self) -> StatementResult<()>;

    /// Discards pending writes; succeeds when the engine already ended the
    /// transaction.
    fn rollback(self) -> StatementResult<()>;
}

/// Forward-only cursor over a query result.
pub trait RowCursor {
    /// Moves to the next row; `false` once the result is exhausted.
    fn advance(&mut self) -> StatementResult<bool>;

    /// Values of the current row in select-list order.
    fn scan(&self) -> StatementResult<&[SqlValue]>;

    fn close(self);
}

/// Cursor over rows already fetched from the engine.
#[derive(Debug)]
pub struct BufferedRows {
    rows: std::vec::IntoIter<Vec<SqlValue>>,
    current: Option<Vec<SqlValue>>,
    cancel: CancelToken,
}

impl BufferedRows {
    pub fn new(rows: Vec<Vec<SqlValue>>, cancel: CancelToken) -> Self {
        Self {
            rows: rows.into_iter(),
            current: None,
            cancel,
        }
    }
}

impl RowCursor for BufferedRows {
    fn advance(&mut self) -> StatementResult<bool> {
        self.cancel.check()?;
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }

    fn scan(&self) -> StatementResult<&[SqlValue]> {
        self.current.as_deref().ok_or(StatementError::NoCurrentRow)
    }

    fn close(self) {}
}
