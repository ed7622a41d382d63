use rusqlite::Connection;
use tablecrud_core::db::open_db_in_memory;
use tablecrud_core::{
    Badge, BoyScout, CancelToken, CrudError, Date, EntityRepository, FieldMask, GirlScout, Rank,
    SqliteMapper, Timestamp,
};

fn scout_mapper(conn: &Connection) -> SqliteMapper<'_, BoyScout> {
    SqliteMapper::for_sqlite(conn).unwrap()
}

fn full_scout(id: &str) -> BoyScout {
    BoyScout {
        full_name: "Theodore Roosevelt".to_string(),
        short_name: "Teddy".to_string(),
        birthdate: Some(Date::new(1858, 10, 27)),
        join_time: Some(Timestamp::new(1_600_000_000, 123_000)),
        country_code: "US".to_string(),
        language_code: "en".to_string(),
        pack_code: 42,
        rank: Rank::Eagle,
        badges: vec![Badge::Camping, Badge::Knots],
        favorite_songs: vec!["Taps".to_string(), "Kumbaya".to_string()],
        iana_country_code: "America/New_York".to_string(),
        what_about_this: -7,
        camping_trips: vec![Date::new(2020, 7, 4), Date::new(2021, 8, 1)],
        big_unsigned_int: u64::MAX,
        mask: vec!["full_name".to_string()],
        ..BoyScout::with_id(id)
    }
}

fn stored_column_is_null(conn: &Connection, column: &str, id: &str) -> bool {
    conn.query_row(
        &format!("SELECT {column} IS NULL FROM boy_scout WHERE id = ?1;"),
        [id],
        |row| row.get(0),
    )
    .unwrap()
}

fn collection_rows(conn: &Connection, table: &str, id: &str) -> i64 {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE id = ?1;"),
        [id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn create_then_read_returns_every_field() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    let scout = full_scout("s-1");

    mapper.create(&cancel, &scout).unwrap();
    let loaded = mapper.read(&cancel, "s-1").unwrap();

    assert_eq!(loaded, scout);
}

#[test]
fn zero_values_are_stored_as_null_and_read_back_as_zero() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    let scout = BoyScout {
        favorite_songs: vec!["x".to_string(), "y".to_string()],
        ..BoyScout::with_id("A")
    };

    mapper.create(&cancel, &scout).unwrap();
    for column in ["pack_code", "full_name", "rank", "big_unsigned_int", "birthdate"] {
        assert!(stored_column_is_null(&conn, column, "A"), "{column} not NULL");
    }

    let loaded = mapper.read(&cancel, "A").unwrap();
    assert_eq!(loaded.pack_code, 0);
    assert_eq!(loaded.rank, Rank::Unspecified);
    assert_eq!(loaded.birthdate, None);
    assert_eq!(loaded.favorite_songs, vec!["x", "y"]);
    assert!(loaded.badges.is_empty());
}

#[test]
fn masked_update_then_delete_follows_the_documented_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    mapper
        .create(
            &cancel,
            &BoyScout {
                favorite_songs: vec!["x".to_string(), "y".to_string()],
                ..BoyScout::with_id("A")
            },
        )
        .unwrap();

    let changed = BoyScout {
        pack_code: 9,
        favorite_songs: vec!["z".to_string()],
        ..BoyScout::with_id("A")
    };
    mapper
        .update(&cancel, &changed, &FieldMask::new(["favorite_songs"]))
        .unwrap();

    let loaded = mapper.read(&cancel, "A").unwrap();
    assert_eq!(loaded.pack_code, 0);
    assert_eq!(loaded.favorite_songs, vec!["z"]);

    mapper.delete(&cancel, "A").unwrap();
    assert!(mapper.read(&cancel, "A").unwrap_err().is_not_found());
    mapper.delete(&cancel, "A").unwrap();
    assert_eq!(collection_rows(&conn, "boy_scout_favorite_songs", "A"), 0);
}

#[test]
fn masked_update_leaves_other_fields_untouched() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    let original = full_scout("s-2");
    mapper.create(&cancel, &original).unwrap();

    let replacement = BoyScout {
        short_name: "T.R.".to_string(),
        rank: Rank::Tenderfoot,
        badges: vec![Badge::Ballet],
        favorite_songs: Vec::new(),
        ..BoyScout::with_id("s-2")
    };
    mapper
        .update(&cancel, &replacement, &FieldMask::new(["short_name", "badges"]))
        .unwrap();

    let loaded = mapper.read(&cancel, "s-2").unwrap();
    let expected = BoyScout {
        short_name: "T.R.".to_string(),
        badges: vec![Badge::Ballet],
        ..original
    };
    assert_eq!(loaded, expected);
}

#[test]
fn masked_update_can_clear_a_scalar_and_a_collection() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    mapper.create(&cancel, &full_scout("s-3")).unwrap();

    mapper
        .update(
            &cancel,
            &BoyScout::with_id("s-3"),
            &FieldMask::new(["pack_code", "camping_trips"]),
        )
        .unwrap();

    let loaded = mapper.read(&cancel, "s-3").unwrap();
    assert_eq!(loaded.pack_code, 0);
    assert!(loaded.camping_trips.is_empty());
    assert_eq!(loaded.rank, Rank::Eagle);
    assert_eq!(collection_rows(&conn, "boy_scout_camping_trips", "s-3"), 0);
}

#[test]
fn empty_mask_overwrites_everything() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    mapper.create(&cancel, &full_scout("s-4")).unwrap();

    let replacement = BoyScout {
        full_name: "Robert Baden-Powell".to_string(),
        favorite_songs: vec!["Ging Gang Goolie".to_string()],
        ..BoyScout::with_id("s-4")
    };
    mapper
        .update(&cancel, &replacement, &FieldMask::all())
        .unwrap();

    assert_eq!(mapper.read(&cancel, "s-4").unwrap(), replacement);
}

#[test]
fn unknown_mask_names_are_ignored() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    let original = full_scout("s-5");
    mapper.create(&cancel, &original).unwrap();

    mapper
        .update(
            &cancel,
            &BoyScout::with_id("s-5"),
            &FieldMask::new(["no_such_field"]),
        )
        .unwrap();

    assert_eq!(mapper.read(&cancel, "s-5").unwrap(), original);
}

#[test]
fn dates_beyond_four_digit_years_survive_a_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    let scout = BoyScout {
        birthdate: Some(Date::new(10000, 1, 1)),
        camping_trips: vec![Date::new(-44, 3, 15), Date::new(0, 12, 31)],
        ..BoyScout::with_id("far-dates")
    };

    mapper.create(&cancel, &scout).unwrap();

    assert_eq!(mapper.read(&cancel, "far-dates").unwrap(), scout);
}

#[test]
fn extreme_join_time_is_stored_without_overflow() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    let scout = BoyScout {
        join_time: Some(Timestamp::new(i64::MAX, 0)),
        ..BoyScout::with_id("far-future")
    };

    mapper.create(&cancel, &scout).unwrap();

    let loaded = mapper.read(&cancel, "far-future").unwrap();
    assert_eq!(loaded.join_time, Some(Timestamp::from_micros(i64::MAX)));
}

#[test]
fn collection_order_is_preserved() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    let songs = vec!["e", "b", "d", "a", "c"];
    let scout = BoyScout {
        favorite_songs: songs.iter().map(|song| song.to_string()).collect(),
        badges: vec![
            Badge::Knots,
            Badge::Ballet,
            Badge::FirstAid,
            Badge::Camping,
            Badge::Ballet,
        ],
        ..BoyScout::with_id("ordered")
    };

    mapper.create(&cancel, &scout).unwrap();
    let loaded = mapper.read(&cancel, "ordered").unwrap();

    assert_eq!(loaded.favorite_songs, songs);
    assert_eq!(loaded.badges, scout.badges);
}

#[test]
fn read_and_update_of_missing_id_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();

    match mapper.read(&cancel, "ghost").unwrap_err() {
        CrudError::NotFound { table, id } => {
            assert_eq!(table, "boy_scout");
            assert_eq!(id, "ghost");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = mapper
        .update(&cancel, &full_scout("ghost"), &FieldMask::all())
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(collection_rows(&conn, "boy_scout_badges", "ghost"), 0);
}

#[test]
fn duplicate_create_fails_and_keeps_first_write() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    let first = full_scout("dup");
    mapper.create(&cancel, &first).unwrap();

    let err = mapper.create(&cancel, &full_scout("dup")).unwrap_err();
    assert!(matches!(err, CrudError::Statement(_)));
    assert_eq!(mapper.read(&cancel, "dup").unwrap(), first);
    assert_eq!(collection_rows(&conn, "boy_scout_badges", "dup"), 2);
}

#[test]
fn id_only_entity_supports_every_operation() {
    let conn = open_db_in_memory().unwrap();
    let mapper: SqliteMapper<'_, GirlScout> = SqliteMapper::for_sqlite(&conn).unwrap();
    let cancel = CancelToken::new();
    let scout = GirlScout::with_id("g-1");

    assert!(mapper.statements().update.is_none());
    mapper.create(&cancel, &scout).unwrap();
    assert_eq!(mapper.read(&cancel, "g-1").unwrap(), scout);
    mapper.update(&cancel, &scout, &FieldMask::all()).unwrap();
    mapper.delete(&cancel, "g-1").unwrap();
    assert!(mapper.read(&cancel, "g-1").unwrap_err().is_not_found());
}

#[test]
fn corrupt_stored_value_surfaces_as_codec_error() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    mapper.create(&cancel, &full_scout("bad")).unwrap();
    conn.execute(
        "UPDATE boy_scout SET big_unsigned_int = 'lots' WHERE id = 'bad';",
        [],
    )
    .unwrap();

    let err = mapper.read(&cancel, "bad").unwrap_err();
    assert!(matches!(err, CrudError::Codec(_)));
}

#[test]
fn loaded_scout_serializes_to_json() {
    let conn = open_db_in_memory().unwrap();
    let mapper = scout_mapper(&conn);
    let cancel = CancelToken::new();
    mapper.create(&cancel, &full_scout("json")).unwrap();

    let loaded = mapper.read(&cancel, "json").unwrap();
    let value = serde_json::to_value(&loaded).unwrap();
    assert_eq!(value["rank"], "eagle");
    assert_eq!(value["badges"][1], "knots");
    assert_eq!(value["big_unsigned_int"], u64::MAX);

    let back: BoyScout = serde_json::from_value(value).unwrap();
    assert_eq!(back, loaded);
}
