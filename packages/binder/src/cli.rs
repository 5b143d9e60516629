//! Command-line interface for the binder.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use serde::Serialize;

use crate::binder::{Binder, Parsed};
use crate::catalog::{Catalog, Level};
use crate::diagnostics::{Diagnostic, Severity};
use crate::error::Result;
use crate::registry::ExtensionRegistry;

/// XCRI Binder - Check and normalize XCRI-CAP course catalogs.
#[derive(Parser)]
#[command(name = "xcri-binder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a catalog and report diagnostics.
    Check {
        /// Catalog document to check
        file: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Parse a catalog and write it back out.
    Normalize {
        /// Catalog document to normalize
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Node counts per level.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub providers: usize,
    pub courses: usize,
    pub presentations: usize,
}

impl Summary {
    #[must_use]
    pub fn of(catalog: &Catalog) -> Self {
        let mut summary = Self::default();
        for (_, node) in catalog.iter() {
            match node.level() {
                Level::Provider(_) => summary.providers += 1,
                Level::Course(_) => summary.courses += 1,
                Level::Presentation(_) => summary.presentations += 1,
                Level::Catalog => {}
            }
        }
        summary
    }
}

/// Machine-readable result of `check`.
#[derive(Debug, Serialize)]
struct Report<'a> {
    file: String,
    generated: String,
    summary: Summary,
    errors: usize,
    warnings: usize,
    infos: usize,
    diagnostics: &'a [Diagnostic],
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let binder = Binder::new(ExtensionRegistry::new());

    match cli.command {
        Commands::Check { file, format } => check_command(&binder, &file, format),
        Commands::Normalize { file, output } => normalize_command(&binder, &file, output.as_deref()),
    }
}

/// Execute the check command.
fn check_command(binder: &Binder, file: &Path, format: OutputFormat) -> Result<()> {
    let Parsed {
        catalog,
        diagnostics,
    } = binder.parse_file(file)?;
    let summary = Summary::of(&catalog);

    if format == OutputFormat::Json {
        let report = Report {
            file: file.display().to_string(),
            generated: crate::config::format_xsd_datetime(&catalog.generated()),
            summary,
            errors: diagnostics.count(Severity::Error),
            warnings: diagnostics.count(Severity::Warning),
            infos: diagnostics.count(Severity::Info),
            diagnostics: diagnostics.entries(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", style("Checking").bold(), style(file.display()).cyan());
    println!();

    for diagnostic in diagnostics.entries() {
        let severity = match diagnostic.severity {
            Severity::Error => style(diagnostic.severity.as_str()).red().bold(),
            Severity::Warning => style(diagnostic.severity.as_str()).yellow(),
            Severity::Info => style(diagnostic.severity.as_str()).dim(),
        };
        println!(
            "  [{}] {}: {}",
            severity,
            style(&diagnostic.path).dim(),
            diagnostic.message
        );
    }
    if !diagnostics.is_empty() {
        println!();
    }

    println!("  Providers: {}", summary.providers);
    println!("  Courses: {}", summary.courses);
    println!("  Presentations: {}", summary.presentations);
    println!(
        "  Diagnostics: {} errors, {} warnings, {} info",
        style(diagnostics.count(Severity::Error)).red().bold(),
        style(diagnostics.count(Severity::Warning)).yellow().bold(),
        diagnostics.count(Severity::Info)
    );

    Ok(())
}

/// Execute the normalize command.
fn normalize_command(binder: &Binder, file: &Path, output: Option<&Path>) -> Result<()> {
    let parsed = binder.parse_file(file)?;
    let xml = binder.to_xml_string(&parsed.catalog)?;

    match output {
        Some(path) => {
            std::fs::write(path, &xml)?;
            eprintln!(
                "{} {} ({} diagnostics)",
                style("Saved to:").green().bold(),
                path.display(),
                parsed.diagnostics.len()
            );
        }
        None => println!("{xml}"),
    }
    Ok(())
}
