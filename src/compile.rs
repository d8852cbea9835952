//! Content compilation: rows in, HTML fragments out.
//!
//! Each convention compiles to two body fragments, later wrapped into full
//! documents by [`crate::page`]:
//!
//! - **Homepage**: title, scheduling details (start, duration, root
//!   locations), staff list, and the convention's blurb/description.
//! - **Schedule**: one section per calendar day, each holding a collapsible
//!   item per event with its time range, staff and blurb/description.
//!
//! This module performs no I/O. [`ConventionRows`] carries everything the
//! fragments are built from; gathering those rows is the orchestrator's job.
//!
//! ## Trusted HTML
//!
//! Blurbs and descriptions are authored as HTML in Procon and are inserted
//! without escaping. Names, locations and emails go through maud's escaping.

use crate::config::FormatConfig;
use crate::duration::whole_day_span;
use crate::extract::{
    DaySection, Descriptive, StaffEntry, group_by_day, root_location_names, staff_list,
};
use crate::types::{Event, Location, RowId, ScheduledEvent, StaffAttendance, StaffPosition};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use maud::{Markup, PreEscaped, html};
use std::collections::HashMap;
use std::fmt::Write;

/// Staff rows for one event. Positions are only fetched when there is staff.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStaff {
    pub attendances: Vec<StaffAttendance>,
    pub positions: Vec<StaffPosition>,
}

impl EventStaff {
    pub fn entries(&self) -> Vec<StaffEntry> {
        staff_list(&self.attendances, &self.positions)
    }
}

/// Every row a convention's pages are compiled from.
#[derive(Debug, Clone, PartialEq)]
pub struct ConventionRows {
    pub convention: Event,
    /// Locations attached to the convention itself.
    pub locations: Vec<Location>,
    pub staff: EventStaff,
    /// Scheduled sub-events, ascending by start.
    pub schedule: Vec<ScheduledEvent>,
    /// Staff for each scheduled sub-event, keyed by event id.
    pub schedule_staff: HashMap<RowId, EventStaff>,
}

/// The two body fragments for one convention.
#[derive(Debug, Clone)]
pub struct CompiledContent {
    pub title: String,
    pub homepage: Markup,
    pub schedule: Markup,
    pub day_count: usize,
    pub event_count: usize,
}

/// Compile both fragments for a convention.
pub fn compile(rows: &ConventionRows, formats: &FormatConfig) -> CompiledContent {
    let event_count = rows.schedule.len();
    let days = group_by_day(rows.schedule.clone());
    CompiledContent {
        title: rows.convention.fullname.clone(),
        homepage: homepage_body(rows, formats),
        day_count: days.len(),
        schedule: schedule_body(&days, &rows.schedule_staff, formats),
        event_count,
    }
}

// ============================================================================
// Homepage
// ============================================================================

/// Render the homepage body.
pub fn homepage_body(rows: &ConventionRows, formats: &FormatConfig) -> Markup {
    let convention = &rows.convention;
    let locations = root_location_names(&rows.locations);
    let staff = rows.staff.entries();
    let content = Descriptive::from_fields(
        convention.blurb.as_deref(),
        convention.description.as_deref(),
    );

    html! {
        h1.convention-title { (convention.fullname) }
        section.scheduling-details {
            @if let Some(start) = convention.start {
                p.start-time {
                    strong { "Starts: " }
                    (format_timestamp(start, &formats.start))
                }
                @if let Some(end) = convention.end {
                    p.duration {
                        strong { "Runs: " }
                        (whole_day_span(start, end))
                    }
                }
            }
            @if !locations.is_empty() {
                p.locations {
                    strong { "Location: " }
                    (locations.join(", "))
                }
            }
        }
        @if !staff.is_empty() {
            section.staff {
                h2 { "Staff" }
                ul.staff-list {
                    @for entry in &staff {
                        li { (staff_name(entry)) }
                    }
                }
            }
        }
        div.description {
            (render_descriptive(content, 2, None))
        }
    }
}

// ============================================================================
// Schedule
// ============================================================================

/// Render the schedule body from day-sections in chronological order.
pub fn schedule_body(
    days: &[DaySection],
    staff: &HashMap<RowId, EventStaff>,
    formats: &FormatConfig,
) -> Markup {
    html! {
        h1 { "Schedule" }
        @for section in days {
            section.schedule-day {
                h2.schedule-date { (format_date(section.day, &formats.day)) }
                ul.schedule-events {
                    @for scheduled in &section.events {
                        (schedule_item(scheduled, staff.get(&scheduled.event.id), formats))
                    }
                }
            }
        }
    }
}

fn schedule_item(
    scheduled: &ScheduledEvent,
    staff: Option<&EventStaff>,
    formats: &FormatConfig,
) -> Markup {
    let event = &scheduled.event;
    let target = format!("event-{}", event.id);
    let staff = staff.map(EventStaff::entries).unwrap_or_default();
    let content = Descriptive::from_fields(event.blurb.as_deref(), event.description.as_deref());

    html! {
        li.schedule-event {
            a.collapse-toggle href={ "#" (target) } data-target=(target) { (event.fullname) }
            " "
            span.time-range {
                (format_timestamp(scheduled.start, &formats.time))
                " - "
                (format_timestamp(scheduled.end, &formats.time))
            }
            div.collapse-body id=(target) hidden {
                @if !staff.is_empty() {
                    p.staff {
                        strong { "Staff: " }
                        @for (i, entry) in staff.iter().enumerate() {
                            @if i > 0 { ", " }
                            (staff_name(entry))
                        }
                    }
                }
                (render_descriptive(content, 3, Some("<hr>")))
            }
        }
    }
}

// ============================================================================
// Shared pieces
// ============================================================================

/// A staff name, linked to its published address when there is one.
fn staff_name(entry: &StaffEntry) -> Markup {
    html! {
        @if let Some(email) = &entry.email {
            a href={ "mailto:" (email) } { (entry.name) }
        } @else {
            (entry.name)
        }
    }
}

/// Render blurb and description.
///
/// A lone blurb or description is emitted as-is. When both exist they are
/// labelled with `h{header_level}` headings, blurb first, with `separator`
/// between them.
pub fn render_descriptive(
    content: Descriptive<'_>,
    header_level: u8,
    separator: Option<&str>,
) -> Markup {
    match content {
        Descriptive::Empty => html! {},
        Descriptive::Blurb(text) | Descriptive::Description(text) => html! { (PreEscaped(text)) },
        Descriptive::Both { blurb, description } => html! {
            (heading(header_level, "Blurb"))
            (PreEscaped(blurb))
            @if let Some(separator) = separator {
                (PreEscaped(separator))
            }
            (heading(header_level, "Description"))
            (PreEscaped(description))
        },
    }
}

/// maud has no dynamic tag names, so the heading is assembled by hand.
fn heading(level: u8, text: &str) -> Markup {
    let level = level.clamp(1, 6);
    let text = html! { (text) }.into_string();
    PreEscaped(format!("<h{level}>{text}</h{level}>"))
}

/// Format with a strftime pattern, falling back to ISO form on a bad pattern.
pub fn format_timestamp(timestamp: NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", timestamp.format(pattern)).is_err() {
        return timestamp.to_string();
    }
    out
}

pub fn format_date(day: NaiveDate, pattern: &str) -> String {
    format_timestamp(day.and_time(NaiveTime::MIN), pattern)
}
