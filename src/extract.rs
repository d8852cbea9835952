//! Pure extractors that turn related rows into render-ready structures.
//!
//! Nothing here touches the database: callers fetch rows through
//! [`crate::store::ArchiveSource`] and hand them in. Each extractor builds
//! whatever index it needs (parent sets, position lookups) over exactly the
//! rows it was given, so "root" and "group" are always relative to that
//! subset rather than to the whole table.

use crate::types::{Location, Person, RowId, ScheduledEvent, StaffAttendance, StaffPosition};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// Locations
// ============================================================================

/// Names of the locations no other location in `locations` claims as parent.
///
/// A location whose parent lies outside the slice still counts as a root.
/// Names are sorted ascending by byte order.
pub fn root_location_names(locations: &[Location]) -> Vec<String> {
    // An event can list the same location twice; key by id.
    let by_id: BTreeMap<RowId, &Location> = locations.iter().map(|l| (l.id, l)).collect();
    let parents: HashSet<RowId> = by_id
        .values()
        .filter_map(|l| l.parent_id.filter(|parent| *parent != l.id))
        .collect();

    let mut names: Vec<String> = by_id
        .values()
        .filter(|l| !parents.contains(&l.id))
        .map(|l| l.name.clone())
        .collect();
    names.sort();
    names
}

// ============================================================================
// People and staff
// ============================================================================

/// `First "Nick" Last`, skipping empty parts.
pub fn display_name(person: &Person) -> String {
    let nickname = person
        .nickname
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(|n| format!("\"{n}\""));

    [
        Some(person.firstname.clone()),
        nickname,
        Some(person.lastname.clone()),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// One rendered staff line.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffEntry {
    pub name: String,
    /// Published address; `None` renders the name as plain text.
    pub email: Option<String>,
}

/// Order an event's staff for display.
///
/// Positioned staff come first, grouped by position in ascending rank and
/// keeping input order within a position. Attendees whose position is not
/// among `positions` are dropped. General staff follow, sorted by name.
pub fn staff_list(attendances: &[StaffAttendance], positions: &[StaffPosition]) -> Vec<StaffEntry> {
    let mut ranked: Vec<&StaffPosition> = positions.iter().collect();
    ranked.sort_by_key(|p| p.position);

    let mut entries = Vec::with_capacity(attendances.len());
    for position in ranked {
        for attendance in attendances
            .iter()
            .filter(|a| a.staff_position_id == Some(position.id))
        {
            let email = if position.publish_email {
                position
                    .email
                    .clone()
                    .filter(|e| !e.trim().is_empty())
                    .or_else(|| attendance.person.email.clone())
                    .filter(|e| !e.trim().is_empty())
            } else {
                None
            };
            entries.push(StaffEntry {
                name: display_name(&attendance.person),
                email,
            });
        }
    }

    let mut general: Vec<StaffEntry> = attendances
        .iter()
        .filter(|a| a.staff_position_id.is_none())
        .map(|a| StaffEntry {
            name: display_name(&a.person),
            email: None,
        })
        .collect();
    general.sort_by(|a, b| a.name.cmp(&b.name));
    entries.extend(general);
    entries
}

// ============================================================================
// Schedule days
// ============================================================================

/// A maximal run of scheduled events starting on the same calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySection {
    pub day: NaiveDate,
    pub events: Vec<ScheduledEvent>,
}

/// Split start-ordered events into same-day runs, preserving order.
pub fn group_by_day(events: Vec<ScheduledEvent>) -> Vec<DaySection> {
    let mut sections: Vec<DaySection> = Vec::new();
    for event in events {
        let day = event.start.date();
        match sections.last_mut() {
            Some(section) if section.day == day => section.events.push(event),
            _ => sections.push(DaySection {
                day,
                events: vec![event],
            }),
        }
    }
    sections
}

// ============================================================================
// Blurb / description
// ============================================================================

/// Which of blurb and description an event actually has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Descriptive<'a> {
    Empty,
    Blurb(&'a str),
    Description(&'a str),
    Both {
        blurb: &'a str,
        description: &'a str,
    },
}

impl<'a> Descriptive<'a> {
    /// Blank strings count as absent.
    pub fn from_fields(blurb: Option<&'a str>, description: Option<&'a str>) -> Self {
        let present = |s: Option<&'a str>| s.filter(|s| !s.trim().is_empty());
        match (present(blurb), present(description)) {
            (None, None) => Self::Empty,
            (Some(blurb), None) => Self::Blurb(blurb),
            (None, Some(description)) => Self::Description(description),
            (Some(blurb), Some(description)) => Self::Both { blurb, description },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::at;
    use crate::types::Event;

    fn location(id: RowId, name: &str, parent_id: Option<RowId>) -> Location {
        Location {
            id,
            name: name.to_string(),
            parent_id,
        }
    }

    fn person(id: RowId, first: &str, last: &str, nick: Option<&str>, email: Option<&str>) -> Person {
        Person {
            id,
            firstname: first.to_string(),
            lastname: last.to_string(),
            nickname: nick.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    fn staffer(person: Person, position: Option<RowId>) -> StaffAttendance {
        StaffAttendance {
            person,
            staff_position_id: position,
        }
    }

    fn position(id: RowId, rank: i64, publish_email: bool, email: Option<&str>) -> StaffPosition {
        StaffPosition {
            id,
            event_id: 1,
            name: format!("Position {id}"),
            position: rank,
            publish_email,
            email: email.map(str::to_string),
        }
    }

    fn scheduled(id: RowId, start: chrono::NaiveDateTime) -> ScheduledEvent {
        ScheduledEvent {
            event: Event {
                id,
                parent_id: Some(1),
                fullname: format!("Event {id}"),
                start: Some(start),
                end: Some(start),
                blurb: None,
                description: None,
            },
            start,
            end: start,
        }
    }

    // =========================================================================
    // Root locations
    // =========================================================================

    #[test]
    fn roots_exclude_claimed_parents() {
        let locations = vec![
            location(1, "Hotel", None),
            location(2, "Ballroom", Some(1)),
            location(3, "Suite 101", Some(1)),
        ];
        assert_eq!(root_location_names(&locations), vec!["Ballroom", "Suite 101"]);
    }

    #[test]
    fn parent_outside_set_is_still_root() {
        let locations = vec![location(2, "Ballroom", Some(1)), location(5, "Annex", None)];
        assert_eq!(root_location_names(&locations), vec!["Annex", "Ballroom"]);
    }

    #[test]
    fn roots_sort_case_sensitively() {
        let locations = vec![
            location(1, "lobby", None),
            location(2, "Atrium", None),
            location(3, "Zephyr Room", None),
        ];
        assert_eq!(
            root_location_names(&locations),
            vec!["Atrium", "Zephyr Room", "lobby"]
        );
    }

    #[test]
    fn duplicate_attachment_listed_once() {
        let locations = vec![location(1, "Hotel", None), location(1, "Hotel", None)];
        assert_eq!(root_location_names(&locations), vec!["Hotel"]);
    }

    #[test]
    fn no_locations_no_roots() {
        assert!(root_location_names(&[]).is_empty());
    }

    // =========================================================================
    // Display names
    // =========================================================================

    #[test]
    fn display_name_with_nickname() {
        let p = person(1, "Margaret", "Hamilton", Some("Maggie"), None);
        assert_eq!(display_name(&p), "Margaret \"Maggie\" Hamilton");
    }

    #[test]
    fn display_name_skips_empty_parts() {
        assert_eq!(display_name(&person(1, "Cher", "", None, None)), "Cher");
        assert_eq!(display_name(&person(1, "", "Smith", Some(""), None)), "Smith");
    }

    // =========================================================================
    // Staff lists
    // =========================================================================

    #[test]
    fn positions_render_in_rank_order() {
        let attendances = vec![
            staffer(person(1, "Zed", "Last", None, None), Some(20)),
            staffer(person(2, "Amy", "First", None, None), Some(10)),
        ];
        let positions = vec![position(20, 2, false, None), position(10, 1, false, None)];
        let names: Vec<String> = staff_list(&attendances, &positions)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Amy First", "Zed Last"]);
    }

    #[test]
    fn positioned_before_general_and_general_sorted() {
        let attendances = vec![
            staffer(person(1, "Yolanda", "General", None, None), None),
            staffer(person(2, "Brian", "General", None, None), None),
            staffer(person(3, "Pat", "Positioned", None, None), Some(10)),
        ];
        let positions = vec![position(10, 1, false, None)];
        let names: Vec<String> = staff_list(&attendances, &positions)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(
            names,
            vec!["Pat Positioned", "Brian General", "Yolanda General"]
        );
    }

    #[test]
    fn same_position_keeps_input_order() {
        let attendances = vec![
            staffer(person(1, "Zoe", "A", None, None), Some(10)),
            staffer(person(2, "Abe", "B", None, None), Some(10)),
        ];
        let positions = vec![position(10, 1, false, None)];
        let names: Vec<String> = staff_list(&attendances, &positions)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Zoe A", "Abe B"]);
    }

    #[test]
    fn published_email_prefers_position_override() {
        let attendances = vec![
            staffer(person(1, "Ann", "Chair", None, Some("ann@home.net")), Some(10)),
            staffer(person(2, "Ben", "Games", None, Some("ben@home.net")), Some(20)),
            staffer(person(3, "Cy", "Ops", None, Some("cy@home.net")), Some(30)),
        ];
        let positions = vec![
            position(10, 1, true, Some("chair@con.org")),
            position(20, 2, true, None),
            position(30, 3, false, Some("ops@con.org")),
        ];
        let emails: Vec<Option<String>> = staff_list(&attendances, &positions)
            .into_iter()
            .map(|e| e.email)
            .collect();
        assert_eq!(
            emails,
            vec![
                Some("chair@con.org".to_string()),
                Some("ben@home.net".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn blank_position_override_falls_back_to_person() {
        let attendances = vec![
            staffer(person(1, "Ann", "Chair", None, Some("ann@home.net")), Some(10)),
            staffer(person(2, "Ben", "Games", None, Some(" ")), Some(20)),
        ];
        let positions = vec![
            position(10, 1, true, Some("")),
            position(20, 2, true, Some("  ")),
        ];
        let emails: Vec<Option<String>> = staff_list(&attendances, &positions)
            .into_iter()
            .map(|e| e.email)
            .collect();
        assert_eq!(emails, vec![Some("ann@home.net".to_string()), None]);
    }

    #[test]
    fn empty_position_renders_nothing() {
        let positions = vec![position(10, 1, true, Some("chair@con.org"))];
        assert!(staff_list(&[], &positions).is_empty());
    }

    #[test]
    fn unknown_position_is_dropped() {
        let attendances = vec![staffer(person(1, "Lost", "Soul", None, None), Some(99))];
        assert!(staff_list(&attendances, &[]).is_empty());
    }

    // =========================================================================
    // Day grouping
    // =========================================================================

    #[test]
    fn groups_contiguous_same_day_runs() {
        let events = vec![
            scheduled(1, at(2024, 3, 1, 19, 0)),
            scheduled(2, at(2024, 3, 1, 23, 30)),
            scheduled(3, at(2024, 3, 2, 0, 30)),
            scheduled(4, at(2024, 3, 3, 10, 0)),
        ];
        let sections = group_by_day(events);
        let shape: Vec<(NaiveDate, Vec<RowId>)> = sections
            .iter()
            .map(|s| (s.day, s.events.iter().map(|e| e.event.id).collect()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), vec![1, 2]),
                (NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), vec![3]),
                (NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(), vec![4]),
            ]
        );
    }

    #[test]
    fn grouping_keeps_every_event_once() {
        let events: Vec<ScheduledEvent> = (0..10)
            .map(|i| scheduled(i, at(2024, 3, 1 + (i as u32) / 3, 9, 0)))
            .collect();
        let sections = group_by_day(events);
        let ids: Vec<RowId> = sections
            .iter()
            .flat_map(|s| s.events.iter().map(|e| e.event.id))
            .collect();
        assert_eq!(ids, (0..10).collect::<Vec<RowId>>());
        assert_eq!(sections.len(), 4);
    }

    #[test]
    fn no_events_no_sections() {
        assert!(group_by_day(Vec::new()).is_empty());
    }

    // =========================================================================
    // Descriptive content
    // =========================================================================

    #[test]
    fn descriptive_variants() {
        assert_eq!(Descriptive::from_fields(None, None), Descriptive::Empty);
        assert_eq!(
            Descriptive::from_fields(Some("Short"), None),
            Descriptive::Blurb("Short")
        );
        assert_eq!(
            Descriptive::from_fields(None, Some("Long")),
            Descriptive::Description("Long")
        );
        assert_eq!(
            Descriptive::from_fields(Some("Short"), Some("Long")),
            Descriptive::Both {
                blurb: "Short",
                description: "Long"
            }
        );
    }

    #[test]
    fn blank_text_counts_as_absent() {
        assert_eq!(
            Descriptive::from_fields(Some("  "), Some("Long")),
            Descriptive::Description("Long")
        );
        assert_eq!(Descriptive::from_fields(Some(""), Some("\n")), Descriptive::Empty);
    }
}
