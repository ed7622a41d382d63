//! Scalar codec between domain values and storage values.
//!
//! # Responsibility
//! - Define the storage-level value shape (`SqlValue`) bound to statements.
//! - Convert every supported domain scalar to and from that shape.
//!
//! # Invariants
//! - A domain zero value (`""`, `0`, unset enum, absent date/timestamp)
//!   encodes to `SqlValue::Null`, and `Null` decodes back to that zero value.
//! - `u64` values travel as base-10 text so engines without native unsigned
//!   64-bit integers keep full precision.
//! - Decode failures are always returned as `CodecError`, never defaulted.

mod value;

use crate::model::calendar::{Date, Timestamp};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use value::SqlValue;

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?\d+)-(\d+)-(\d+)$").expect("date pattern is a valid regex")
});

pub type CodecResult<T> = Result<T, CodecError>;

/// A stored value could not be decoded into its domain shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },
    UnexpectedNull(&'static str),
    OutOfRange {
        target: &'static str,
        value: i64,
    },
    InvalidUnsigned(String),
    InvalidDate(String),
    UnknownEnumValue {
        name: &'static str,
        value: i32,
    },
    MissingColumn(usize),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedType { expected, found } => {
                write!(f, "expected {expected} storage value, found {found}")
            }
            Self::UnexpectedNull(expected) => write!(f, "unexpected NULL for {expected} value"),
            Self::OutOfRange { target, value } => {
                write!(f, "stored integer {value} does not fit in {target}")
            }
            Self::InvalidUnsigned(text) => {
                write!(f, "stored text `{text}` is not a base-10 unsigned 64-bit integer")
            }
            Self::InvalidDate(text) => {
                write!(f, "stored text `{text}` is not a YYYY-MM-DD date")
            }
            Self::UnknownEnumValue { name, value } => {
                write!(f, "stored value {value} is not a known {name} variant")
            }
            Self::MissingColumn(index) => write!(f, "result row has no column {index}"),
        }
    }
}

impl Error for CodecError {}

/// Bidirectional conversion between a domain scalar and its storage value.
pub trait Scalar: Sized {
    fn encode(&self) -> SqlValue;
    fn decode(value: &SqlValue) -> CodecResult<Self>;
}

/// Encodes borrowed text with the string zero rule.
pub fn encode_text(value: &str) -> SqlValue {
    if value.is_empty() {
        SqlValue::Null
    } else {
        SqlValue::Text(value.to_string())
    }
}

/// Returns column `index` of a scanned row.
pub fn column(row: &[SqlValue], index: usize) -> CodecResult<&SqlValue> {
    row.get(index).ok_or(CodecError::MissingColumn(index))
}

impl Scalar for String {
    fn encode(&self) -> SqlValue {
        encode_text(self)
    }

    fn decode(value: &SqlValue) -> CodecResult<Self> {
        match value {
            SqlValue::Null => Ok(String::new()),
            SqlValue::Text(text) => Ok(text.clone()),
            other => Err(unexpected("text", other)),
        }
    }
}

impl Scalar for i64 {
    fn encode(&self) -> SqlValue {
        encode_integer(*self)
    }

    fn decode(value: &SqlValue) -> CodecResult<Self> {
        decode_integer(value)
    }
}

impl Scalar for i32 {
    fn encode(&self) -> SqlValue {
        encode_integer(i64::from(*self))
    }

    fn decode(value: &SqlValue) -> CodecResult<Self> {
        let raw = decode_integer(value)?;
        i32::try_from(raw).map_err(|_| CodecError::OutOfRange {
            target: "i32",
            value: raw,
        })
    }
}

impl Scalar for u32 {
    fn encode(&self) -> SqlValue {
        encode_integer(i64::from(*self))
    }

    fn decode(value: &SqlValue) -> CodecResult<Self> {
        let raw = decode_integer(value)?;
        u32::try_from(raw).map_err(|_| CodecError::OutOfRange {
            target: "u32",
            value: raw,
        })
    }
}

impl Scalar for u64 {
    fn encode(&self) -> SqlValue {
        if *self == 0 {
            SqlValue::Null
        } else {
            SqlValue::Text(self.to_string())
        }
    }

    fn decode(value: &SqlValue) -> CodecResult<Self> {
        match value {
            SqlValue::Null => Ok(0),
            SqlValue::Text(text) => text
                .parse::<u64>()
                .map_err(|_| CodecError::InvalidUnsigned(text.clone())),
            SqlValue::Integer(raw) => u64::try_from(*raw).map_err(|_| CodecError::OutOfRange {
                target: "u64",
                value: *raw,
            }),
            other => Err(unexpected("text", other)),
        }
    }
}

impl Scalar for Date {
    fn encode(&self) -> SqlValue {
        SqlValue::Text(format!(
            "{:04}-{:02}-{:02}",
            self.year, self.month, self.day
        ))
    }

    fn decode(value: &SqlValue) -> CodecResult<Self> {
        match value {
            SqlValue::Null => Err(CodecError::UnexpectedNull("date")),
            SqlValue::Text(text) => parse_date(text),
            other => Err(unexpected("text", other)),
        }
    }
}

impl Scalar for Option<Date> {
    fn encode(&self) -> SqlValue {
        self.as_ref().map_or(SqlValue::Null, |date| date.encode())
    }

    fn decode(value: &SqlValue) -> CodecResult<Self> {
        match value {
            SqlValue::Null => Ok(None),
            other => Date::decode(other).map(Some),
        }
    }
}

impl Scalar for Option<Timestamp> {
    fn encode(&self) -> SqlValue {
        // The epoch itself is a present value, so no zero rule applies here.
        self.as_ref()
            .map_or(SqlValue::Null, |ts| SqlValue::Integer(ts.as_micros()))
    }

    fn decode(value: &SqlValue) -> CodecResult<Self> {
        match value {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(micros) => Ok(Some(Timestamp::from_micros(*micros))),
            other => Err(unexpected("integer", other)),
        }
    }
}

/// Protobuf-style enumeration stored as its `i32` number.
///
/// Variant number `0` is the unset value and is stored as NULL.
pub trait EnumScalar: Copy {
    const NAME: &'static str;

    fn number(self) -> i32;
    fn from_number(number: i32) -> Option<Self>;
}

pub fn encode_enum<E: EnumScalar>(value: E) -> SqlValue {
    value.number().encode()
}

pub fn decode_enum<E: EnumScalar>(value: &SqlValue) -> CodecResult<E> {
    let number = i32::decode(value)?;
    E::from_number(number).ok_or(CodecError::UnknownEnumValue {
        name: E::NAME,
        value: number,
    })
}

fn encode_integer(value: i64) -> SqlValue {
    if value == 0 {
        SqlValue::Null
    } else {
        SqlValue::Integer(value)
    }
}

fn decode_integer(value: &SqlValue) -> CodecResult<i64> {
    match value {
        SqlValue::Null => Ok(0),
        SqlValue::Integer(raw) => Ok(*raw),
        other => Err(unexpected("integer", other)),
    }
}

fn parse_date(text: &str) -> CodecResult<Date> {
    let captures = DATE_PATTERN
        .captures(text)
        .ok_or_else(|| CodecError::InvalidDate(text.to_string()))?;
    let mut parts = [0i32; 3];
    for (slot, index) in parts.iter_mut().zip(1..=3usize) {
        *slot = captures[index]
            .parse()
            .map_err(|_| CodecError::InvalidDate(text.to_string()))?;
    }
    Ok(Date::new(parts[0], parts[1], parts[2]))
}

fn unexpected(expected: &'static str, found: &SqlValue) -> CodecError {
    CodecError::UnexpectedType {
        expected,
        found: found.kind(),
    }
}
