//! # Procon Archiver
//!
//! Turns the conventions stored in a Procon database into static HTML sites,
//! one per convention domain, that can be served from any file server long
//! after the database is gone.
//!
//! # Architecture: One Pass Per Convention
//!
//! ```text
//! conventions ─▶ domain     pick the canonical domain, or skip
//!             ─▶ template   per-domain CSS / header / footer
//!             ─▶ compile    rows → homepage + schedule fragments
//!             ─▶ page       fragments → full HTML documents
//!             ─▶ site       out/<domain>/{global.css,index.html,schedule/index.html}
//! ```
//!
//! Every run recomputes everything from the database; there is no cache and
//! no incremental rebuild. Conventions share no state, and the first
//! database or filesystem error aborts the run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`archive`] | Orchestrator: iterates conventions and drives the pipeline |
//! | [`domain`] | Domain filtering and canonical-domain selection |
//! | [`template`] | Per-domain template resolution with empty fallbacks |
//! | [`extract`] | Pure extractors: root locations, staff order, day grouping |
//! | [`compile`] | Homepage and schedule fragments, rendered with Maud |
//! | [`page`] | Document shell: stylesheet, navigation, template, script |
//! | [`site`] | Writes each domain's files under the output root |
//! | [`store`] | Read-only `ArchiveSource` trait and its SQLite implementation |
//! | [`types`] | Row structs for the Procon tables |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`duration`] | "3 days"-style spans for convention lengths |
//! | [`output`] | CLI summary of a run |
//!
//! # Design Decisions
//!
//! ## Longest Domain Wins
//!
//! Conventions often have a short vanity domain next to the full one. The
//! filter accepts a convention if *any* domain matches, but the site is always
//! written under the longest domain (lexically greatest on ties), so repeated
//! runs with different patterns land in the same directory.
//!
//! ## Rows In, Markup Out
//!
//! [`compile`] never queries the database. [`archive::gather_rows`] collects
//! everything a convention needs up front, which keeps compilation a pure
//! function that unit tests can drive with hand-built rows.
//!
//! ## Trusted Content
//!
//! Blurbs, descriptions and site templates are HTML authored by convention
//! staff inside Procon and are emitted unescaped. Everything else (names,
//! locations, emails, titles) goes through Maud's escaping.

pub mod archive;
pub mod compile;
pub mod config;
pub mod domain;
pub mod duration;
pub mod extract;
pub mod output;
pub mod page;
pub mod site;
pub mod store;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
