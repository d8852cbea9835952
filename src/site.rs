//! Writing assembled pages to disk.
//!
//! ## Output Structure
//!
//! ```text
//! out/
//! └── foo.example.org/          # canonical domain
//!     ├── global.css            # shared stylesheet
//!     ├── index.html            # homepage
//!     └── schedule/
//!         └── index.html        # schedule
//! ```
//!
//! Every write replaces the whole file. Directories are created as needed,
//! so re-running over an existing tree is safe.

use crate::page::GLOBAL_STYLESHEET;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const DEFAULT_STYLESHEET: &str = include_str!("../static/global.css");

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("domain {0:?} is not a single directory name")]
    InvalidDomain(String),
    #[error("failed to read stylesheet {path}: {source}")]
    Stylesheet {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The global stylesheet copied into every site.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    contents: String,
}

impl Stylesheet {
    /// The stylesheet compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            contents: DEFAULT_STYLESHEET.to_string(),
        }
    }

    /// Read a replacement stylesheet once, up front.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let contents = fs::read_to_string(path).map_err(|source| SiteError::Stylesheet {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { contents })
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// Rendered pages for one domain.
#[derive(Debug, Clone)]
pub struct SitePages {
    pub homepage: String,
    pub schedule: String,
}

/// Write one domain's site under `output_root/domain`.
///
/// Returns the written file paths, relative to `output_root`. The domain
/// must be exactly one normal path component so nothing lands outside the
/// root.
pub fn write_site(
    output_root: &Path,
    domain: &str,
    pages: &SitePages,
    stylesheet: &Stylesheet,
) -> Result<Vec<PathBuf>, SiteError> {
    let mut components = Path::new(domain).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return Err(SiteError::InvalidDomain(domain.to_string()));
    }
    let dest_dir = output_root.join(domain);
    let files = [
        (PathBuf::from(GLOBAL_STYLESHEET), stylesheet.contents()),
        (PathBuf::from("index.html"), pages.homepage.as_str()),
        (Path::new("schedule").join("index.html"), pages.schedule.as_str()),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (relative, contents) in files {
        let path = dest_dir.join(&relative);
        write_file(&path, contents)?;
        debug!(path = %path.display(), "wrote file");
        written.push(Path::new(domain).join(relative));
    }
    Ok(written)
}

/// Write bytes to a path, creating parent directories first.
fn write_file(path: &Path, contents: &str) -> Result<(), SiteError> {
    let io_err = |source| SiteError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}
