//! Row types read from the Procon database.
//!
//! Each table the archiver touches gets one plain struct with named fields.
//! Rows are validated when they are mapped in [`crate::store`], so everything
//! downstream can rely on required fields being present.

use chrono::NaiveDateTime;

/// Primary key type shared by every Procon table.
pub type RowId = i64;

/// A row from `events`.
///
/// An event with no parent is a convention; events whose `parent_id` points
/// at a convention make up its schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: RowId,
    pub parent_id: Option<RowId>,
    pub fullname: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub blurb: Option<String>,
    pub description: Option<String>,
}

/// A sub-event that has both timestamps set and can appear on a schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub event: Event,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ScheduledEvent {
    /// Returns `None` when either timestamp is missing.
    pub fn from_event(event: Event) -> Option<Self> {
        let start = event.start?;
        let end = event.end?;
        Some(Self { event, start, end })
    }
}

/// A row from `virtual_sites`: one public domain bound to an event.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualSite {
    pub domain: String,
    pub event_id: RowId,
    pub site_template_id: Option<RowId>,
}

/// A row from `site_templates`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteTemplate {
    pub id: RowId,
    pub css: Option<String>,
    pub themeroller_css: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
}

/// A row from `people`.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: RowId,
    pub firstname: String,
    pub lastname: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
}

/// A staff row from `attendances`, joined with the attending person.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffAttendance {
    pub person: Person,
    pub staff_position_id: Option<RowId>,
}

/// A row from `staff_positions`.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffPosition {
    pub id: RowId,
    pub event_id: RowId,
    pub name: String,
    /// Rank; positions render in ascending order.
    pub position: i64,
    pub publish_email: bool,
    /// Role address published instead of the person's own, e.g. `gm@con.org`.
    pub email: Option<String>,
}

/// A row from `locations`.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: RowId,
    pub name: String,
    pub parent_id: Option<RowId>,
}
