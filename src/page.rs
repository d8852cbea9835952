//! Full-document assembly.
//!
//! Wraps a compiled body fragment in the HTML shell every archived page
//! shares:
//!
//! ```text
//! <head>   title, link to /global.css, inline template CSS
//! <body>   top navigation (Home, Event Schedule)
//!          template header HTML
//!          <main> body fragment </main>
//!          template footer HTML
//!          collapsible-section script
//! ```
//!
//! Template CSS, header and footer are trusted HTML from `site_templates`
//! and are inserted unescaped; missing fields are simply empty.

use crate::template::Template;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const COLLAPSE_JS: &str = include_str!("../static/collapse.js");

/// Path of the shared stylesheet, relative to the site root.
pub const GLOBAL_STYLESHEET: &str = "global.css";

/// Which page of the site is being assembled; drives the current nav item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Schedule,
}

/// Renders the complete document for one page.
pub fn assemble(title: &str, kind: PageKind, template: &Template, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href={ "/" (GLOBAL_STYLESHEET) };
                style { (PreEscaped(template.stylesheet())) }
            }
            body {
                (site_nav(kind))
                (PreEscaped(&template.header))
                main {
                    (body)
                }
                (PreEscaped(&template.footer))
                script { (PreEscaped(COLLAPSE_JS)) }
            }
        }
    }
}

/// Renders the fixed top navigation bar.
fn site_nav(kind: PageKind) -> Markup {
    html! {
        nav.archive-nav {
            ul {
                li class=[(kind == PageKind::Home).then_some("current")] {
                    a href="/" { "Home" }
                }
                li class=[(kind == PageKind::Schedule).then_some("current")] {
                    a href="/schedule/" { "Event Schedule" }
                }
            }
        }
    }
}
