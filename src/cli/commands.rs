use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::manifest::{build_registry, load_manifest, print_issues};
use crate::runtime_config::RegistryConfig;

/// Command-line interface for routewarden.
#[derive(Parser)]
#[command(name = "routewarden")]
#[command(about = "Routewarden route manifest tools", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Check a route manifest for conflicting registrations
    Lint {
        /// Path to the route manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Exit non-zero when any conflict group or manifest issue exists
        #[arg(long, default_value_t = false)]
        deny_conflicts: bool,

        /// Output format for the conflict report
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Also print the full routing table
        #[arg(long, default_value_t = false)]
        dump_routes: bool,
    },
}

/// Lint report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse arguments and run the selected command. Returns the process exit
/// code.
pub fn run_cli() -> anyhow::Result<i32> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Lint {
            manifest,
            deny_conflicts,
            format,
            dump_routes,
        } => {
            let manifest = load_manifest(manifest)?;
            let (registry, issues) = build_registry(&manifest, RegistryConfig::from_env());

            if *dump_routes {
                registry.dump_routes();
            }

            match format {
                ReportFormat::Text => {
                    if !issues.is_empty() {
                        print_issues(&issues);
                    }
                    let report = registry.conflict_report();
                    for entry in &report.conflicts {
                        println!("[{}] conflict-{}:", entry.kind, entry.id);
                        for route in &entry.routes {
                            println!("    {route}");
                        }
                    }
                    println!(
                        "{} route(s), {} conflict group(s), {} manifest issue(s)",
                        registry.len(),
                        report.total,
                        issues.len()
                    );
                }
                ReportFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&registry.conflict_report())?);
                }
            }

            let failed = *deny_conflicts && (registry.conflict_count() > 0 || !issues.is_empty());
            Ok(i32::from(failed))
        }
    }
}
