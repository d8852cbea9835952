//! The archive run: conventions in, one static site per matching domain out.
//!
//! For every top-level convention:
//!
//! ```text
//! domains ──filter/pick──▶ canonical domain
//!                              │
//!             template ◀───────┤
//!                              ▼
//! rows ──compile──▶ fragments ──assemble──▶ pages ──write──▶ out/<domain>/
//! ```
//!
//! Conventions are independent; nothing computed for one is reused for the
//! next. The first database or filesystem error ends the whole run.

use crate::compile::{CompiledContent, ConventionRows, EventStaff, compile};
use crate::config::FormatConfig;
use crate::domain::{DomainSelection, select_domain};
use crate::page::{PageKind, assemble};
use crate::site::{SiteError, SitePages, Stylesheet, write_site};
use crate::store::{ArchiveSource, StoreError, StoreResult};
use crate::template::resolve_template;
use crate::types::{Event, RowId};
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Site(#[from] SiteError),
}

/// Everything a run needs besides the data source.
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Conventions publish when any of their domains matches.
    pub domain_pattern: Regex,
    pub output_root: PathBuf,
    pub stylesheet: Stylesheet,
    pub formats: FormatConfig,
}

/// One convention that was written out.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedSite {
    pub convention_id: RowId,
    pub name: String,
    pub domain: String,
    pub matched_domain: String,
    pub days: usize,
    pub events: usize,
    /// Paths relative to the output root.
    pub files: Vec<PathBuf>,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveReport {
    pub published: Vec<PublishedSite>,
    /// Conventions with no domain matching the pattern.
    pub skipped: usize,
}

/// Drives the pipeline over every convention in a source.
pub struct Archiver<'a> {
    source: &'a dyn ArchiveSource,
    options: ArchiveOptions,
}

impl<'a> Archiver<'a> {
    pub fn new(source: &'a dyn ArchiveSource, options: ArchiveOptions) -> Self {
        Self { source, options }
    }

    /// Publish every convention with a matching domain.
    pub fn archive(&self) -> Result<ArchiveReport, ArchiveError> {
        let mut report = ArchiveReport::default();
        for convention in self.source.conventions()? {
            match select_domain(self.source, &convention, &self.options.domain_pattern)? {
                Some(selection) => {
                    let site = self.publish(&convention, selection)?;
                    report.published.push(site);
                }
                None => {
                    debug!(
                        convention = %convention.fullname,
                        "no domain matches; skipping"
                    );
                    report.skipped += 1;
                }
            }
        }
        Ok(report)
    }

    fn publish(
        &self,
        convention: &Event,
        selection: DomainSelection,
    ) -> Result<PublishedSite, ArchiveError> {
        let template = resolve_template(self.source, &selection.canonical)?;
        let rows = gather_rows(self.source, convention.clone())?;
        let CompiledContent {
            title,
            homepage,
            schedule,
            day_count,
            event_count,
        } = compile(&rows, &self.options.formats);

        let pages = SitePages {
            homepage: assemble(&title, PageKind::Home, &template, homepage).into_string(),
            schedule: assemble("Schedule", PageKind::Schedule, &template, schedule).into_string(),
        };
        let files = write_site(
            &self.options.output_root,
            &selection.canonical,
            &pages,
            &self.options.stylesheet,
        )?;

        info!(
            convention = %title,
            domain = %selection.canonical,
            matched = %selection.matched,
            events = event_count,
            "published convention"
        );

        Ok(PublishedSite {
            convention_id: convention.id,
            name: title,
            domain: selection.canonical,
            matched_domain: selection.matched,
            days: day_count,
            events: event_count,
            files,
        })
    }
}

/// Fetch every row a convention's pages are compiled from.
pub fn gather_rows(source: &dyn ArchiveSource, convention: Event) -> StoreResult<ConventionRows> {
    let locations = source.event_locations(convention.id)?;
    let staff = event_staff(source, convention.id)?;
    let schedule = source.schedule_events(convention.id)?;

    let mut schedule_staff = HashMap::with_capacity(schedule.len());
    for scheduled in &schedule {
        let staff = event_staff(source, scheduled.event.id)?;
        if !staff.attendances.is_empty() {
            schedule_staff.insert(scheduled.event.id, staff);
        }
    }

    Ok(ConventionRows {
        convention,
        locations,
        staff,
        schedule,
        schedule_staff,
    })
}

fn event_staff(source: &dyn ArchiveSource, event_id: RowId) -> StoreResult<EventStaff> {
    let attendances = source.staff_attendances(event_id)?;
    if attendances.is_empty() {
        return Ok(EventStaff::default());
    }
    let positions = source.staff_positions(event_id)?;
    Ok(EventStaff {
        attendances,
        positions,
    })
}
