//! SQL text construction for entity statements.
//!
//! # Responsibility
//! - Quote identifiers consistently.
//! - Build multi-row insert text and per-entity statement catalogs.

pub mod statements;
mod tuples;

pub use statements::{CollectionStatements, EntityStatements, COLLECTION_TUPLE};
pub use tuples::with_tuples;

/// Quotes an identifier for SQLite, doubling embedded quotes.
pub fn quote_name(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::quote_name;

    #[test]
    fn quote_name_wraps_and_escapes() {
        assert_eq!(quote_name("boy_scout"), "\"boy_scout\"");
        assert_eq!(quote_name("odd\"name"), "\"odd\"\"name\"");
    }
}
