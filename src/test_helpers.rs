//! Shared test utilities for the archiver test suite.
//!
//! Builds an in-memory SQLite database carrying the Procon schema from
//! `tests/fixtures/schema.sql` and offers one insert helper per table, each
//! returning the new row id.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = fixture_source();
//! let con = insert_event(&source, None, "Intercon Q", Some(at(2024, 3, 1, 18, 0)), None);
//! insert_virtual_site(&source, "interconq.example.org", con, None);
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, params};

use crate::store::SqliteSource;
use crate::types::RowId;

pub const SCHEMA: &str = include_str!("../tests/fixtures/schema.sql");

// =========================================================================
// Fixture setup
// =========================================================================

/// Fresh in-memory database with the Procon tables and no rows.
pub fn fixture_source() -> SqliteSource {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    SqliteSource::from_connection(conn)
}

/// Shorthand for a timestamp.
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

// =========================================================================
// Row inserts
// =========================================================================

fn last_id(source: &SqliteSource) -> RowId {
    source.connection().last_insert_rowid()
}

pub fn insert_event(
    source: &SqliteSource,
    parent_id: Option<RowId>,
    fullname: &str,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> RowId {
    source
        .connection()
        .execute(
            r#"INSERT INTO events (parent_id, fullname, start, "end") VALUES (?1, ?2, ?3, ?4)"#,
            params![parent_id, fullname, start, end],
        )
        .unwrap();
    last_id(source)
}

/// Set blurb and description on an existing event.
pub fn set_event_text(
    source: &SqliteSource,
    event_id: RowId,
    blurb: Option<&str>,
    description: Option<&str>,
) {
    source
        .connection()
        .execute(
            "UPDATE events SET blurb = ?1, description = ?2 WHERE id = ?3",
            params![blurb, description, event_id],
        )
        .unwrap();
}

pub fn insert_virtual_site(
    source: &SqliteSource,
    domain: &str,
    event_id: RowId,
    site_template_id: Option<RowId>,
) -> RowId {
    source
        .connection()
        .execute(
            "INSERT INTO virtual_sites (domain, event_id, site_template_id) VALUES (?1, ?2, ?3)",
            params![domain, event_id, site_template_id],
        )
        .unwrap();
    last_id(source)
}

pub fn insert_site_template(
    source: &SqliteSource,
    css: Option<&str>,
    themeroller_css: Option<&str>,
    header: Option<&str>,
    footer: Option<&str>,
) -> RowId {
    source
        .connection()
        .execute(
            "INSERT INTO site_templates (css, themeroller_css, header, footer)
             VALUES (?1, ?2, ?3, ?4)",
            params![css, themeroller_css, header, footer],
        )
        .unwrap();
    last_id(source)
}

pub fn insert_person(
    source: &SqliteSource,
    firstname: &str,
    lastname: &str,
    nickname: Option<&str>,
    email: Option<&str>,
) -> RowId {
    source
        .connection()
        .execute(
            "INSERT INTO people (firstname, lastname, nickname, email) VALUES (?1, ?2, ?3, ?4)",
            params![firstname, lastname, nickname, email],
        )
        .unwrap();
    last_id(source)
}

pub fn insert_staff_position(
    source: &SqliteSource,
    event_id: RowId,
    name: &str,
    position: i64,
    publish_email: bool,
    email: Option<&str>,
) -> RowId {
    source
        .connection()
        .execute(
            "INSERT INTO staff_positions (event_id, name, position, publish_email, email)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![event_id, name, position, publish_email, email],
        )
        .unwrap();
    last_id(source)
}

pub fn insert_attendance(
    source: &SqliteSource,
    person_id: RowId,
    event_id: RowId,
    is_staff: bool,
    staff_position_id: Option<RowId>,
) -> RowId {
    source
        .connection()
        .execute(
            "INSERT INTO attendances (person_id, event_id, is_staff, staff_position_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![person_id, event_id, is_staff, staff_position_id],
        )
        .unwrap();
    last_id(source)
}

pub fn insert_location(source: &SqliteSource, name: &str, parent_id: Option<RowId>) -> RowId {
    source
        .connection()
        .execute(
            "INSERT INTO locations (name, parent_id) VALUES (?1, ?2)",
            params![name, parent_id],
        )
        .unwrap();
    last_id(source)
}

pub fn attach_location(source: &SqliteSource, event_id: RowId, location_id: RowId) -> RowId {
    source
        .connection()
        .execute(
            "INSERT INTO event_locations (event_id, location_id) VALUES (?1, ?2)",
            params![event_id, location_id],
        )
        .unwrap();
    last_id(source)
}
