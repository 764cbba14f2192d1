// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11y-monitor CLI - accessibility scan metrics and compliance reporting

use a11y_monitor::config::{default_config_path, load_config, write_default_config, Config};
use a11y_monitor::report::{render_report, render_trends, OutputFormat};
use a11y_monitor::scan;
use a11y_monitor::AccessibilityMonitor;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Accessibility scan metrics, compliance scoring and trend reporting
#[derive(Parser)]
#[command(name = "a11y-monitor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a scanner results file, record it and print the report
    Process {
        /// Scanner results JSON (results object or violation array)
        results: PathBuf,

        /// Attribute every violation to this component
        #[arg(long)]
        component: Option<String>,

        /// Do not record the snapshot in history
        #[arg(long)]
        no_store: bool,

        /// Exit non-zero when the overall score is below this value
        #[arg(long)]
        fail_under: Option<u32>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Report on the newest recorded snapshot
    Report {
        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List recorded snapshots, newest first
    History {
        /// Show at most this many snapshots
        #[arg(long)]
        limit: Option<usize>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,
    },

    /// Daily violation counts over a window, oldest first
    Trends {
        /// Window size in days
        #[arg(long, default_value_t = 30)]
        days: u32,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,
    },

    /// Violation counts for one component over a window, oldest first
    ComponentTrends {
        /// Component name
        name: String,

        /// Window size in days
        #[arg(long, default_value_t = 30)]
        days: u32,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (defaults to .a11y-monitor/config.toml)
        path: Option<PathBuf>,
    },
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("a11y_monitor=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("a11y_monitor={}", level)))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load configuration, start logging and open the monitor it describes
fn open_monitor(config_path: Option<&Path>, verbose: bool) -> anyhow::Result<AccessibilityMonitor> {
    let config_path = config_path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let config: Config = load_config(&config_path)?;
    init_logging(verbose, &config.log.level);
    Ok(AccessibilityMonitor::from_config(&config))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Process { results, component, no_store, fail_under, format, output } => {
            let mut monitor = open_monitor(config, cli.verbose)?;
            let violations = scan::load_scan_file(&results)?;
            let snapshot = monitor.process_results(&violations, component.as_deref());
            if !no_store {
                monitor.store_metrics(snapshot.clone());
            }

            let report = monitor.generate_report(&snapshot);
            write_output(&render_report(&report, format.into()), output.as_deref())?;

            if let Some(threshold) = fail_under {
                if report.summary.overall_score < threshold {
                    std::process::exit(1);
                }
            }
        }

        Commands::Report { format, output } => {
            let monitor = open_monitor(config, cli.verbose)?;
            match monitor.latest_report() {
                Some(report) => {
                    write_output(&render_report(&report, format.into()), output.as_deref())?
                }
                None => eprintln!(
                    "No metrics recorded yet. Run `a11y-monitor process <results.json>` first."
                ),
            }
        }

        Commands::History { limit, format } => {
            let monitor = open_monitor(config, cli.verbose)?;
            let mut history = monitor.get_metrics_history();
            if let Some(limit) = limit {
                history.truncate(limit);
            }

            match OutputFormat::from(format) {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&history)?),
                OutputFormat::Text => {
                    if history.is_empty() {
                        println!("No metrics recorded yet.");
                    }
                    for snapshot in &history {
                        let counts = &snapshot.violations_by_level;
                        println!(
                            "{}  total {:>4}  critical {:>3}  serious {:>3}  moderate {:>3}  \
                             minor {:>3}",
                            snapshot.timestamp.to_rfc3339(),
                            snapshot.total_violations,
                            counts.critical,
                            counts.serious,
                            counts.moderate,
                            counts.minor
                        );
                    }
                }
            }
        }

        Commands::Trends { days, format } => {
            let monitor = open_monitor(config, cli.verbose)?;
            let trends = monitor.get_trend_data(days);
            println!("{}", render_trends(&trends, format.into()).trim_end());
        }

        Commands::ComponentTrends { name, days, format } => {
            let monitor = open_monitor(config, cli.verbose)?;
            let trends = monitor.get_component_trends(&name, days);
            println!("{}", render_trends(&trends, format.into()).trim_end());
        }

        Commands::InitConfig { path } => {
            init_logging(cli.verbose, "warn");
            let path = path.unwrap_or_else(default_config_path);
            write_default_config(&path)?;
            eprintln!("Configuration written to {}", path.display());
        }
    }

    Ok(())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
