use super::migrations::{current_user_version, latest_version};
use super::{DbError, DbResult};
use crate::repo::entity::{
    EntitySchema, COLLECTION_ID_COLUMN, COLLECTION_ORDINALITY_COLUMN, COLLECTION_VALUE_COLUMN,
};
use rusqlite::Connection;

/// Fails unless `conn` is at the latest schema version.
pub fn ensure_connection_ready(conn: &Connection) -> DbResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(DbError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

/// Fails unless every table and column `schema` maps onto exists.
pub fn ensure_entity_tables(conn: &Connection, schema: &EntitySchema) -> DbResult<()> {
    let parent_columns = std::iter::once(schema.id_column)
        .chain(schema.columns.iter().map(|column| column.column));
    ensure_table(conn, schema.table, parent_columns)?;

    for collection in schema.collections {
        ensure_table(
            conn,
            collection.table,
            [
                COLLECTION_ID_COLUMN,
                COLLECTION_ORDINALITY_COLUMN,
                COLLECTION_VALUE_COLUMN,
            ],
        )?;
    }
    Ok(())
}

fn ensure_table(
    conn: &Connection,
    table: &'static str,
    columns: impl IntoIterator<Item = &'static str>,
) -> DbResult<()> {
    if !table_exists(conn, table)? {
        return Err(DbError::MissingRequiredTable(table));
    }

    let present = table_columns(conn, table)?;
    for column in columns {
        if !present.iter().any(|name| name == column) {
            return Err(DbError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let mut rows = stmt.query([table])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get(0)?);
    }
    Ok(columns)
}
