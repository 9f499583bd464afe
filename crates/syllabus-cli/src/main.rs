//! Syllabus CLI
//!
//! - `syllabus check`: validate a lesson corpus against the concept registry; exits non-zero
//!   when the report has errors.
//! - `syllabus list`: print the lesson catalog grouped by topic.
//!
//! Settings come from built-in defaults, then `syllabus.yaml` (or `--config`), then flags.
//! Logs go to stderr, filtered by `SYLLABUS_LOG` (default `warn`, `debug` with `-v`).

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod catalog;
mod check;
mod config;

use config::{CliConfig, Overrides};

const LOG_ENV: &str = "SYLLABUS_LOG";

#[derive(Parser)]
#[command(name = "syllabus")]
#[command(author, version, about = "Syllabus: curriculum consistency checks")]
struct Cli {
    /// Curriculum root; relative lesson and registry paths resolve against it.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// YAML config file (defaults to `<root>/syllabus.yaml` when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Debug logging (unless `SYLLABUS_LOG` is set).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct SourceArgs {
    /// Lessons directory (defaults to `<root>/src/lessons`).
    #[arg(long)]
    lessons: Option<PathBuf>,
    /// Concept registry, JSON or YAML (defaults to `<root>/curriculum.json`).
    #[arg(long)]
    registry: Option<PathBuf>,
    /// File name that marks a lesson directory (defaults to `lesson.md`).
    #[arg(long)]
    lesson_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate lessons against the concept registry.
    ///
    /// Errors (unknown concepts, concepts with several owners) fail the run; warnings and
    /// notes are informational.
    Check {
        #[command(flatten)]
        source: SourceArgs,
        /// Output report path (defaults to stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Output format: json|text
        #[arg(long, default_value = "text")]
        format: String,
        /// Report every dependency cycle found instead of only the first.
        #[arg(long)]
        all_cycles: bool,
        /// Do not fail the process even if errors are found (always exit 0).
        #[arg(long)]
        no_fail: bool,
    },

    /// List lessons grouped by topic, in curriculum order.
    List {
        #[command(flatten)]
        source: SourceArgs,
        /// Only lessons with this topic.
        #[arg(long)]
        topic: Option<String>,
        /// Only lessons at this level.
        #[arg(long)]
        level: Option<u32>,
        /// Output format: json|text
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn overrides(source: &SourceArgs, all_cycles: bool) -> Overrides {
    Overrides {
        lessons: source.lessons.clone(),
        registry: source.registry.clone(),
        lesson_file: source.lesson_file.clone(),
        all_cycles,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CliConfig::discover(&cli.root, cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            source,
            out,
            format,
            all_cycles,
            no_fail,
        } => {
            let settings = config.resolve(&cli.root, &overrides(&source, all_cycles));
            tracing::debug!(?settings, "resolved settings");
            check::cmd_check(&settings, out.as_deref(), &format, no_fail)?;
        }
        Commands::List {
            source,
            topic,
            level,
            format,
        } => {
            let settings = config.resolve(&cli.root, &overrides(&source, false));
            tracing::debug!(?settings, "resolved settings");
            let filter = catalog::CatalogFilter { topic, level };
            catalog::cmd_list(&settings, &filter, &format)?;
        }
    }
    Ok(())
}
