//! Per-entity relational CRUD mapping for scout records.
//! Entities describe their table layout once; the mapper turns that layout
//! into transactional create/read/update/delete over a SQL store.

pub mod codec;
pub mod db;
pub mod error;
pub mod logging;
pub mod mask;
pub mod model;
pub mod repo;
pub mod sql;
pub mod store;

pub use codec::{CodecError, CodecResult, EnumScalar, Scalar, SqlValue};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use error::{combine_errors, CompositeError, CrudError, CrudResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use mask::FieldMask;
pub use model::calendar::{Date, Timestamp};
pub use model::scout::{Badge, BoyScout, GirlScout, Rank};
pub use repo::entity::{Entity, EntitySchema};
pub use repo::mapper::{EntityMapper, EntityRepository};
pub use store::{CancelToken, SqliteDatabase, StatementError};

/// Mapper over a borrowed SQLite connection.
pub type SqliteMapper<'conn, E> = EntityMapper<SqliteDatabase<'conn>, E>;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
