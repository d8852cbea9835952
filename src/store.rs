//! Read-only access to the Procon tables.
//!
//! The archiver never writes to the database. Every query it needs is a
//! method on [`ArchiveSource`], so the pipeline can be driven from any source
//! of rows; [`SqliteSource`] is the implementation used by the CLI.
//!
//! ## Database URLs
//!
//! ```text
//! sqlite://db/procon_development.sqlite3   file, opened read-only
//! sqlite:db/procon_development.sqlite3     same
//! db/procon_development.sqlite3            bare path, same
//! sqlite::memory:                          empty in-memory database
//! ```
//!
//! Any other scheme (`mysql2://`, `postgres://`, ...) is rejected up front.
//!
//! ## Row Validation
//!
//! Columns the pipeline cannot do without (`events.fullname`,
//! `virtual_sites.domain`, `locations.name`, `staff_positions.position`) are
//! checked while mapping rows. A NULL there is reported as
//! [`StoreError::InvalidRow`] naming the table and row id, instead of
//! surfacing later as an empty heading.

use crate::types::{
    Event, Location, Person, RowId, ScheduledEvent, SiteTemplate, StaffAttendance, StaffPosition,
    VirtualSite,
};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("unsupported database URL `{0}` (expected sqlite://<path>)")]
    UnsupportedUrl(String),
    #[error("invalid row in `{table}` (id {id}): {reason}")]
    InvalidRow {
        table: &'static str,
        id: RowId,
        reason: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Every read the archive pipeline performs.
///
/// Ordering is part of the contract where a method says so; callers rely on
/// it rather than sorting again.
pub trait ArchiveSource {
    /// All events without a parent.
    fn conventions(&self) -> StoreResult<Vec<Event>>;

    /// Every virtual-site domain bound to `event_id`.
    fn domains_for_event(&self, event_id: RowId) -> StoreResult<Vec<String>>;

    /// The first virtual site registered for exactly `domain`.
    fn virtual_site(&self, domain: &str) -> StoreResult<Option<VirtualSite>>;

    fn site_template(&self, id: RowId) -> StoreResult<Option<SiteTemplate>>;

    /// Staff attendances for `event_id`, in attendance insertion order.
    fn staff_attendances(&self, event_id: RowId) -> StoreResult<Vec<StaffAttendance>>;

    /// Staff positions for `event_id`, ascending by rank.
    fn staff_positions(&self, event_id: RowId) -> StoreResult<Vec<StaffPosition>>;

    /// Locations attached to `event_id` through `event_locations`.
    fn event_locations(&self, event_id: RowId) -> StoreResult<Vec<Location>>;

    /// Children of `convention_id` with both start and end set, ascending by start.
    fn schedule_events(&self, convention_id: RowId) -> StoreResult<Vec<ScheduledEvent>>;
}

/// Where a database URL points.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

/// Parse a database URL into a location.
pub fn parse_database_url(url: &str) -> StoreResult<DatabaseLocation> {
    let url = url.trim();
    if url == "sqlite::memory:" || url == ":memory:" {
        return Ok(DatabaseLocation::Memory);
    }
    if let Some(path) = url.strip_prefix("sqlite://") {
        return file_location(url, path);
    }
    if let Some(path) = url.strip_prefix("sqlite:") {
        return file_location(url, path);
    }
    if url.contains("://") {
        return Err(StoreError::UnsupportedUrl(url.to_string()));
    }
    file_location(url, url)
}

fn file_location(url: &str, path: &str) -> StoreResult<DatabaseLocation> {
    if path.is_empty() {
        return Err(StoreError::UnsupportedUrl(url.to_string()));
    }
    Ok(DatabaseLocation::File(PathBuf::from(path)))
}

/// [`ArchiveSource`] backed by a SQLite connection.
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Open the database a URL points at. Files are opened read-only.
    pub fn open(url: &str) -> StoreResult<Self> {
        let conn = match parse_database_url(url)? {
            DatabaseLocation::Memory => Connection::open_in_memory()?,
            DatabaseLocation::File(path) => {
                debug!(path = %path.display(), "opening database read-only");
                Connection::open_with_flags(
                    &path,
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )?
            }
        };
        Ok(Self { conn })
    }

    /// Wrap an already-open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

const EVENT_COLUMNS: &str = r#"id, parent_id, fullname, start, "end", blurb, description"#;

impl ArchiveSource for SqliteSource {
    fn conventions(&self) -> StoreResult<Vec<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE parent_id IS NULL ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_event)?;
        collect_validated(rows)
    }

    fn domains_for_event(&self, event_id: RowId) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, domain FROM virtual_sites WHERE event_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![event_id], |row| {
            let id: RowId = row.get(0)?;
            let domain: Option<String> = row.get(1)?;
            Ok(domain.ok_or_else(|| missing("virtual_sites", id, "domain")))
        })?;
        collect_validated(rows)
    }

    fn virtual_site(&self, domain: &str) -> StoreResult<Option<VirtualSite>> {
        let site = self
            .conn
            .query_row(
                "SELECT domain, event_id, site_template_id FROM virtual_sites
                 WHERE domain = ?1 ORDER BY id LIMIT 1",
                params![domain],
                |row| {
                    Ok(VirtualSite {
                        domain: row.get(0)?,
                        event_id: row.get(1)?,
                        site_template_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(site)
    }

    fn site_template(&self, id: RowId) -> StoreResult<Option<SiteTemplate>> {
        let template = self
            .conn
            .query_row(
                "SELECT id, css, themeroller_css, header, footer FROM site_templates WHERE id = ?1",
                params![id],
                |row| {
                    Ok(SiteTemplate {
                        id: row.get(0)?,
                        css: row.get(1)?,
                        themeroller_css: row.get(2)?,
                        header: row.get(3)?,
                        footer: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(template)
    }

    fn staff_attendances(&self, event_id: RowId) -> StoreResult<Vec<StaffAttendance>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.firstname, p.lastname, p.nickname, p.email, a.staff_position_id
             FROM attendances a
             JOIN people p ON p.id = a.person_id
             WHERE a.event_id = ?1 AND a.is_staff = 1
             ORDER BY a.id",
        )?;
        let rows = stmt.query_map(params![event_id], |row| {
            Ok(StaffAttendance {
                person: Person {
                    id: row.get(0)?,
                    firstname: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    lastname: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    nickname: row.get(3)?,
                    email: row.get(4)?,
                },
                staff_position_id: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn staff_positions(&self, event_id: RowId) -> StoreResult<Vec<StaffPosition>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, name, position, publish_email, email
             FROM staff_positions
             WHERE event_id = ?1
             ORDER BY position, id",
        )?;
        let rows = stmt.query_map(params![event_id], |row| {
            let id: RowId = row.get(0)?;
            let position: Option<i64> = row.get(3)?;
            let Some(position) = position else {
                return Ok(Err(missing("staff_positions", id, "position")));
            };
            Ok(Ok(StaffPosition {
                id,
                event_id: row.get(1)?,
                name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                position,
                publish_email: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
                email: row.get(5)?,
            }))
        })?;
        collect_validated(rows)
    }

    fn event_locations(&self, event_id: RowId) -> StoreResult<Vec<Location>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id, l.name, l.parent_id
             FROM event_locations el
             JOIN locations l ON l.id = el.location_id
             WHERE el.event_id = ?1
             ORDER BY l.id",
        )?;
        let rows = stmt.query_map(params![event_id], |row| {
            let id: RowId = row.get(0)?;
            let name: Option<String> = row.get(1)?;
            let parent_id: Option<RowId> = row.get(2)?;
            Ok(name
                .map(|name| Location {
                    id,
                    name,
                    parent_id,
                })
                .ok_or_else(|| missing("locations", id, "name")))
        })?;
        collect_validated(rows)
    }

    fn schedule_events(&self, convention_id: RowId) -> StoreResult<Vec<ScheduledEvent>> {
        let sql = format!(
            r#"SELECT {EVENT_COLUMNS} FROM events
               WHERE parent_id = ?1 AND start IS NOT NULL AND "end" IS NOT NULL
               ORDER BY start, id"#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![convention_id], read_event)?;
        let events = collect_validated(rows)?;
        Ok(events
            .into_iter()
            .filter_map(ScheduledEvent::from_event)
            .collect())
    }
}

/// Map an `events` row, deferring the required-field check so the caller
/// can report it as a [`StoreError::InvalidRow`].
fn read_event(row: &Row<'_>) -> rusqlite::Result<StoreResult<Event>> {
    let id: RowId = row.get(0)?;
    let fullname: Option<String> = row.get(2)?;
    let Some(fullname) = fullname else {
        return Ok(Err(missing("events", id, "fullname")));
    };
    Ok(Ok(Event {
        id,
        parent_id: row.get(1)?,
        fullname,
        start: row.get(3)?,
        end: row.get(4)?,
        blurb: row.get(5)?,
        description: row.get(6)?,
    }))
}

fn missing(table: &'static str, id: RowId, column: &str) -> StoreError {
    StoreError::InvalidRow {
        table,
        id,
        reason: format!("`{column}` is NULL"),
    }
}

fn collect_validated<T, I>(rows: I) -> StoreResult<Vec<T>>
where
    I: Iterator<Item = rusqlite::Result<StoreResult<T>>>,
{
    rows.map(|row| -> StoreResult<T> { row? }).collect()
}
