use clap::{Parser, Subcommand};
use procon_archiver::archive::{ArchiveOptions, Archiver};
use procon_archiver::config;
use procon_archiver::output;
use procon_archiver::site::Stylesheet;
use procon_archiver::store::SqliteSource;
use regex::Regex;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// `0.3.0` on a tagged release, `0.3.0+dev.<rev>` on any other build.
fn version_string() -> &'static str {
    let version = env!("CARGO_PKG_VERSION");
    if env!("ARCHIVER_RELEASE") == "true" {
        return version;
    }
    let revision = match env!("ARCHIVER_REVISION") {
        "" => "unknown",
        rev => rev,
    };
    // Leaked once at startup
    Box::leak(format!("{version}+dev.{revision}").into_boxed_str())
}

#[derive(Parser)]
#[command(name = "procon-archiver")]
#[command(about = "Build static archive sites for Procon conventions")]
#[command(long_about = "\
Build static archive sites for Procon conventions

Every top-level convention with at least one virtual-site domain matching
CONVENTION_DOMAIN_REGEX is written to its own directory, named after the
convention's longest domain:

  out/
  └── interconq.example.org/
      ├── global.css               # Shared stylesheet
      ├── index.html               # Homepage: dates, location, staff, description
      └── schedule/
          └── index.html           # Schedule, grouped by day

The database is only ever read. Each run rebuilds every matching site from
scratch.

Run 'procon-archiver gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory containing an optional config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Log progress at info level (otherwise RUST_LOG applies)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build static sites for conventions whose domains match a regex
    Archive {
        /// Regular expression matched against each convention's domains
        convention_domain_regex: String,

        /// Database to read from [default: sqlite://db/procon_development.sqlite3]
        #[arg(long)]
        procon_database_url: Option<String>,

        /// Output directory [default: out, relative to the current directory]
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Archive {
            convention_domain_regex,
            procon_database_url,
            output: output_dir,
        } => {
            let mut settings = config::load_config(&cli.config)?;
            if let Some(url) = procon_database_url {
                settings.database_url = url;
            }
            if let Some(dir) = output_dir {
                settings.output_root = dir;
            }

            let domain_pattern = Regex::new(&convention_domain_regex)?;
            let stylesheet = match &settings.stylesheet {
                Some(path) => Stylesheet::load(path)?,
                None => Stylesheet::builtin(),
            };
            let source = SqliteSource::open(&settings.database_url)?;

            let options = ArchiveOptions {
                domain_pattern,
                output_root: settings.output_root,
                stylesheet,
                formats: settings.formats,
            };
            let report = Archiver::new(&source, options).archive()?;
            output::print_archive_output(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
