//! Per-domain presentation templates.
//!
//! A virtual site may point at a `site_templates` row carrying custom CSS and
//! header/footer HTML. Any missing link in that chain (no virtual site, no
//! template id, a dangling id, NULL columns) resolves to empty strings.

use crate::store::{ArchiveSource, StoreResult};
use crate::types::SiteTemplate;
use tracing::debug;

/// Resolved template fields, with every missing value already empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    pub css: String,
    pub theme_css: String,
    pub header: String,
    pub footer: String,
}

impl Template {
    /// CSS for the page's inline style block: `css` first, else `theme_css`.
    pub fn stylesheet(&self) -> &str {
        if self.css.is_empty() {
            &self.theme_css
        } else {
            &self.css
        }
    }
}

impl From<SiteTemplate> for Template {
    fn from(row: SiteTemplate) -> Self {
        Self {
            css: row.css.unwrap_or_default(),
            theme_css: row.themeroller_css.unwrap_or_default(),
            header: row.header.unwrap_or_default(),
            footer: row.footer.unwrap_or_default(),
        }
    }
}

/// Resolve the template for a canonical domain.
pub fn resolve_template(source: &dyn ArchiveSource, domain: &str) -> StoreResult<Template> {
    let Some(site) = source.virtual_site(domain)? else {
        debug!(domain, "no virtual site; using empty template");
        return Ok(Template::default());
    };
    let Some(template_id) = site.site_template_id else {
        debug!(domain, "virtual site has no template");
        return Ok(Template::default());
    };
    match source.site_template(template_id)? {
        Some(row) => Ok(row.into()),
        None => {
            debug!(domain, template_id, "template id does not resolve");
            Ok(Template::default())
        }
    }
}
