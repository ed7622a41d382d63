//! Domain records mapped by the crate.
//!
//! # Responsibility
//! - Define the scout entities, their enums, and calendar scalar types.
//! - Describe how each entity maps onto its tables.
//!
//! # Invariants
//! - Entity ids are stable once created and join every collection row.

pub mod calendar;
pub mod scout;
