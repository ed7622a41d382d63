//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tablecrud_core` linkage.
//! - Round-trip one scout through an in-memory store and print it as JSON.

use std::process::ExitCode;
use tablecrud_core::{
    open_db_in_memory, Badge, BoyScout, CancelToken, Date, EntityRepository, Rank, SqliteMapper,
};

fn main() -> ExitCode {
    println!("tablecrud_core version={}", tablecrud_core::core_version());
    match round_trip() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("round trip failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn round_trip() -> Result<String, Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let mapper: SqliteMapper<'_, BoyScout> = SqliteMapper::for_sqlite(&conn)?;
    let cancel = CancelToken::new();

    let scout = BoyScout {
        full_name: "Probe Scout".to_string(),
        rank: Rank::Tenderfoot,
        badges: vec![Badge::Knots],
        camping_trips: vec![Date::new(2024, 6, 1)],
        ..BoyScout::new()
    };
    mapper.create(&cancel, &scout)?;
    let loaded = mapper.read(&cancel, &scout.id)?;
    Ok(serde_json::to_string_pretty(&loaded)?)
}
