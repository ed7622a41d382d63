//! Scout entities.
//!
//! # Invariants
//! - Plain scalar fields use their zero value for "unset"; a stored NULL
//!   reads back as that zero value.
//! - Collection element order is significant and preserved by storage.

use crate::codec::{column, decode_enum, encode_enum, CodecResult, EnumScalar, Scalar, SqlValue};
use crate::model::calendar::{Date, Timestamp};
use crate::repo::entity::{Collection, Column, Entity, EntitySchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scout rank. `Unspecified` is the unset value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    #[default]
    Unspecified,
    Tenderfoot,
    BoyScout,
    Eagle,
}

impl EnumScalar for Rank {
    const NAME: &'static str = "Rank";

    fn number(self) -> i32 {
        match self {
            Self::Unspecified => 0,
            Self::Tenderfoot => 1,
            Self::BoyScout => 2,
            Self::Eagle => 3,
        }
    }

    fn from_number(number: i32) -> Option<Self> {
        match number {
            0 => Some(Self::Unspecified),
            1 => Some(Self::Tenderfoot),
            2 => Some(Self::BoyScout),
            3 => Some(Self::Eagle),
            _ => None,
        }
    }
}

/// Merit badge. `Unspecified` is the unset value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    #[default]
    Unspecified,
    Ballet,
    Camping,
    FirstAid,
    Knots,
}

impl EnumScalar for Badge {
    const NAME: &'static str = "Badge";

    fn number(self) -> i32 {
        match self {
            Self::Unspecified => 0,
            Self::Ballet => 1,
            Self::Camping => 2,
            Self::FirstAid => 3,
            Self::Knots => 4,
        }
    }

    fn from_number(number: i32) -> Option<Self> {
        match number {
            0 => Some(Self::Unspecified),
            1 => Some(Self::Ballet),
            2 => Some(Self::Camping),
            3 => Some(Self::FirstAid),
            4 => Some(Self::Knots),
            _ => None,
        }
    }
}

/// Scout record with scalar fields and four ordered collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoyScout {
    pub id: String,
    pub full_name: String,
    pub short_name: String,
    pub birthdate: Option<Date>,
    pub join_time: Option<Timestamp>,
    pub country_code: String,
    pub language_code: String,
    pub pack_code: u32,
    pub rank: Rank,
    pub badges: Vec<Badge>,
    pub favorite_songs: Vec<String>,
    pub iana_country_code: String,
    pub what_about_this: i64,
    pub camping_trips: Vec<Date>,
    pub big_unsigned_int: u64,
    /// Field names recorded with the scout; stored like any other collection.
    pub mask: Vec<String>,
}

static BOY_SCOUT_SCHEMA: EntitySchema = EntitySchema {
    table: "boy_scout",
    id_column: "id",
    columns: &[
        Column {
            field: "full_name",
            column: "full_name",
        },
        Column {
            field: "short_name",
            column: "short_name",
        },
        Column {
            field: "birthdate",
            column: "birthdate",
        },
        Column {
            field: "join_time",
            column: "join_time",
        },
        Column {
            field: "country_code",
            column: "country_code",
        },
        Column {
            field: "language_code",
            column: "language_code",
        },
        Column {
            field: "pack_code",
            column: "pack_code",
        },
        Column {
            field: "rank",
            column: "rank",
        },
        Column {
            field: "iana_country_code",
            column: "iana_country_code",
        },
        Column {
            field: "what_about_this",
            column: "what_about_this",
        },
        Column {
            field: "big_unsigned_int",
            column: "big_unsigned_int",
        },
    ],
    collections: &[
        Collection {
            field: "badges",
            table: "boy_scout_badges",
        },
        Collection {
            field: "favorite_songs",
            table: "boy_scout_favorite_songs",
        },
        Collection {
            field: "camping_trips",
            table: "boy_scout_camping_trips",
        },
        Collection {
            field: "mask",
            table: "boy_scout_mask",
        },
    ],
};

const BADGES: usize = 0;
const FAVORITE_SONGS: usize = 1;
const CAMPING_TRIPS: usize = 2;
const MASK: usize = 3;

impl BoyScout {
    /// Creates an empty scout with a generated id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Creates an empty scout with a caller-provided id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

impl Entity for BoyScout {
    fn schema() -> &'static EntitySchema {
        &BOY_SCOUT_SCHEMA
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode_columns(&self) -> Vec<SqlValue> {
        vec![
            self.full_name.encode(),
            self.short_name.encode(),
            self.birthdate.encode(),
            self.join_time.encode(),
            self.country_code.encode(),
            self.language_code.encode(),
            self.pack_code.encode(),
            encode_enum(self.rank),
            self.iana_country_code.encode(),
            self.what_about_this.encode(),
            self.big_unsigned_int.encode(),
        ]
    }

    fn decode_row(row: &[SqlValue]) -> CodecResult<Self> {
        Ok(Self {
            id: String::decode(column(row, 0)?)?,
            full_name: String::decode(column(row, 1)?)?,
            short_name: String::decode(column(row, 2)?)?,
            birthdate: Option::<Date>::decode(column(row, 3)?)?,
            join_time: Option::<Timestamp>::decode(column(row, 4)?)?,
            country_code: String::decode(column(row, 5)?)?,
            language_code: String::decode(column(row, 6)?)?,
            pack_code: u32::decode(column(row, 7)?)?,
            rank: decode_enum(column(row, 8)?)?,
            iana_country_code: String::decode(column(row, 9)?)?,
            what_about_this: i64::decode(column(row, 10)?)?,
            big_unsigned_int: u64::decode(column(row, 11)?)?,
            ..Self::default()
        })
    }

    fn encode_collection(&self, index: usize) -> Vec<SqlValue> {
        match index {
            BADGES => self.badges.iter().map(|badge| encode_enum(*badge)).collect(),
            FAVORITE_SONGS => self.favorite_songs.iter().map(Scalar::encode).collect(),
            CAMPING_TRIPS => self.camping_trips.iter().map(Scalar::encode).collect(),
            MASK => self.mask.iter().map(Scalar::encode).collect(),
            _ => Vec::new(),
        }
    }

    fn decode_collection(&mut self, index: usize, values: &[SqlValue]) -> CodecResult<()> {
        match index {
            BADGES => self.badges = values.iter().map(decode_enum).collect::<CodecResult<_>>()?,
            FAVORITE_SONGS => self.favorite_songs = decode_all(values)?,
            CAMPING_TRIPS => self.camping_trips = decode_all(values)?,
            MASK => self.mask = decode_all(values)?,
            _ => {}
        }
        Ok(())
    }
}

/// Scout record with nothing but an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GirlScout {
    pub id: String,
}

static GIRL_SCOUT_SCHEMA: EntitySchema = EntitySchema {
    table: "girl_scout",
    id_column: "id",
    columns: &[],
    collections: &[],
};

impl GirlScout {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Entity for GirlScout {
    fn schema() -> &'static EntitySchema {
        &GIRL_SCOUT_SCHEMA
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn encode_columns(&self) -> Vec<SqlValue> {
        Vec::new()
    }

    fn decode_row(row: &[SqlValue]) -> CodecResult<Self> {
        Ok(Self {
            id: String::decode(column(row, 0)?)?,
        })
    }

    fn encode_collection(&self, _index: usize) -> Vec<SqlValue> {
        Vec::new()
    }

    fn decode_collection(&mut self, _index: usize, _values: &[SqlValue]) -> CodecResult<()> {
        Ok(())
    }
}

fn decode_all<T: Scalar>(values: &[SqlValue]) -> CodecResult<Vec<T>> {
    values.iter().map(T::decode).collect()
}
