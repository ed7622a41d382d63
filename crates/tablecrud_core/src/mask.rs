//! Field mask evaluation for partial updates.
//!
//! # Invariants
//! - An empty mask includes every field.
//! - A non-empty mask includes exactly its named fields; unknown names are
//!   ignored rather than rejected.
//! - A child collection is one maskable unit, never masked per element.

use std::collections::HashSet;

/// Set of field names a mutation is allowed to touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMask {
    fields: HashSet<String>,
}

impl FieldMask {
    /// Builds a mask from field names. An empty input means "all fields".
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Mask that includes every field.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_all(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns whether `field` takes part in the mutation.
    pub fn included(&self, field: &str) -> bool {
        self.fields.is_empty() || self.fields.contains(field)
    }
}

impl<S: Into<String>> FromIterator<S> for FieldMask {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
