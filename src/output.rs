//! CLI output formatting for archive runs.
//!
//! # Output Format
//!
//! ```text
//! 001 Intercon Q → interconq.example.org/
//!     Matched: q.example.org
//!     Schedule: 42 events over 3 days
//!     interconq.example.org/global.css
//!     interconq.example.org/index.html
//!     interconq.example.org/schedule/index.html
//!
//! Published 1 site, skipped 4 conventions
//! ```
//!
//! The `Matched:` line only appears when the matching domain differs from
//! the canonical one.
//!
//! `format_*` functions are pure and return lines; `print_*` wrappers write
//! them to stdout.

use crate::archive::{ArchiveReport, PublishedSite};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn site_lines(index: usize, site: &PublishedSite) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} → {}/",
        format_index(index),
        site.name,
        site.domain
    )];
    if site.matched_domain != site.domain {
        lines.push(format!("{}Matched: {}", indent(1), site.matched_domain));
    }
    lines.push(format!(
        "{}Schedule: {} over {}",
        indent(1),
        plural(site.events, "event", "events"),
        plural(site.days, "day", "days")
    ));
    for file in &site.files {
        lines.push(format!("{}{}", indent(1), file.display()));
    }
    lines
}

/// Format the summary of an archive run.
pub fn format_archive_output(report: &ArchiveReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, site) in report.published.iter().enumerate() {
        lines.extend(site_lines(i + 1, site));
    }
    if !report.published.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Published {}, skipped {}",
        plural(report.published.len(), "site", "sites"),
        plural(report.skipped, "convention", "conventions")
    ));
    lines
}

pub fn print_archive_output(report: &ArchiveReport) {
    for line in format_archive_output(report) {
        println!("{}", line);
    }
}
