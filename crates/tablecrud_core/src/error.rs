//! Mapper error taxonomy and error composition.
//!
//! # Invariants
//! - `NotFound` is only produced by a missing parent row and is never merged
//!   with unrelated statement failures.
//! - A `CompositeError` keeps every cause; its message lists them one per
//!   line in the order they were combined.

use crate::codec::CodecError;
use crate::store::StatementError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CrudResult<T> = Result<T, CrudError>;

/// Failure of a create/read/update/delete operation.
#[derive(Debug)]
pub enum CrudError {
    NotFound { table: &'static str, id: String },
    Codec(CodecError),
    Statement(StatementError),
    Composite(CompositeError),
}

impl CrudError {
    /// True for `NotFound`, including one carried inside a composite.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Composite(composite) => composite.causes().iter().any(Self::is_not_found),
            Self::Codec(_) | Self::Statement(_) => false,
        }
    }
}

impl Display for CrudError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { table, id } => write!(f, "no row in `{table}` with id `{id}`"),
            Self::Codec(err) => write!(f, "{err}"),
            Self::Statement(err) => write!(f, "{err}"),
            Self::Composite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CrudError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Codec(err) => Some(err),
            Self::Statement(err) => Some(err),
            Self::Composite(err) => Some(err),
        }
    }
}

impl From<CodecError> for CrudError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

impl From<StatementError> for CrudError {
    fn from(value: StatementError) -> Self {
        Self::Statement(value)
    }
}

impl From<CompositeError> for CrudError {
    fn from(value: CompositeError) -> Self {
        Self::Composite(value)
    }
}

/// Error aggregating one or more causes without dropping any.
#[derive(Debug)]
pub struct CompositeError {
    causes: Vec<CrudError>,
}

impl CompositeError {
    /// Composite led by `primary`, followed by the present `others`.
    pub fn with_primary<I>(primary: CrudError, others: I) -> Self
    where
        I: IntoIterator<Item = Option<CrudError>>,
    {
        let mut causes = vec![primary];
        causes.extend(others.into_iter().flatten());
        Self { causes }
    }

    pub fn causes(&self) -> &[CrudError] {
        &self.causes
    }
}

impl Display for CompositeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, cause) in self.causes.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{cause}")?;
        }
        Ok(())
    }
}

impl Error for CompositeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.causes.first().map(|cause| cause as &(dyn Error + 'static))
    }
}

/// Combines optional errors, dropping absent ones.
///
/// Returns `None` when every input is `None`. Otherwise returns a composite,
/// even when only one cause remains.
pub fn combine_errors<I>(errors: I) -> Option<CompositeError>
where
    I: IntoIterator<Item = Option<CrudError>>,
{
    let mut present = errors.into_iter().flatten();
    let primary = present.next()?;
    Some(CompositeError::with_primary(primary, present.map(Some)))
}
