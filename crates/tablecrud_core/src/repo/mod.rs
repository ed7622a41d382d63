//! Entity descriptions and the generic mapper built on them.
//!
//! # Responsibility
//! - Describe how an entity maps onto a parent table and child collection
//!   tables.
//! - Run create/read/update/delete for any described entity.
//!
//! # Invariants
//! - Every operation is one transaction; partial writes are never committed.
//! - Reads of a missing id return `CrudError::NotFound`.

pub mod entity;
pub mod mapper;
