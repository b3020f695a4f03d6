use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use xplor_core::config::CONFIG_FILE;
use xplor_core::{Config, FullAnalysis, ScoringPipeline};
use xplor_report::{dot, json, markdown, text};

#[derive(Parser)]
#[command(name = "xplor")]
#[command(about = "Score a directory of interlinked markdown notes as a skill graph")]
#[command(version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ValidateFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GraphFormat {
    Dot,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a note directory and print a quality report
    Score {
        /// Path to the note directory
        path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
        /// Exit with code 1 when the score is below this value
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: Option<u8>,
        /// Config file path (defaults to .xplor.toml in the directory or an ancestor)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Check every wikilink occurrence and exit with code 1 if any is broken
    Validate {
        /// Path to the note directory
        path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ValidateFormat,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Export the note graph for visualization
    Graph {
        /// Path to the note directory
        path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "dot")]
        format: GraphFormat,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Create a default .xplor.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Score {
            path,
            format,
            compact,
            threshold,
            config,
        } => cmd_score(&path, format, compact, threshold, config.as_deref()),
        Commands::Validate {
            path,
            format,
            compact,
            config,
        } => cmd_validate(&path, format, compact, config.as_deref()),
        Commands::Graph {
            path,
            format,
            compact,
            config,
        } => cmd_graph(&path, format, compact, config.as_deref()),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn cmd_score(
    path: &Path,
    format: ReportFormat,
    compact: bool,
    threshold: Option<u8>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(path, config_path)?;
    let threshold = threshold.or(config.rules.min_score);
    let analysis = run_analysis(path, config)?;
    let report = &analysis.report;

    let Some(threshold) = threshold else {
        let out = match format {
            ReportFormat::Text => text::format_report(report),
            ReportFormat::Json => format!("{}\n", json::format_report(report, compact)),
            ReportFormat::Markdown => markdown::format_report(report),
        };
        print!("{out}");
        return Ok(());
    };

    let (out, passed) = match format {
        ReportFormat::Text => text::format_check(report, threshold),
        ReportFormat::Json => {
            let (out, passed) = json::format_check(report, threshold, compact);
            (format!("{out}\n"), passed)
        }
        ReportFormat::Markdown => {
            let passed = report.passes(threshold);
            let verdict = if passed { "PASSED" } else { "FAILED" };
            let out = format!(
                "{}\n**CHECK {verdict}** (score {}, threshold {threshold})\n",
                markdown::format_report(report),
                report.score
            );
            (out, passed)
        }
    };
    print!("{out}");
    if !passed {
        process::exit(1);
    }
    Ok(())
}

fn cmd_validate(
    path: &Path,
    format: ValidateFormat,
    compact: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(path, config_path)?;
    let analysis = run_analysis(path, config)?;
    let links = &analysis.links;

    match format {
        ValidateFormat::Text => print!("{}", text::format_links(links)),
        ValidateFormat::Json => println!("{}", json::format_links(links, compact)),
        ValidateFormat::Markdown => print!("{}", markdown::format_links(links)),
    }
    if !links.passed() {
        process::exit(1);
    }
    Ok(())
}

fn cmd_graph(
    path: &Path,
    format: GraphFormat,
    compact: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(path, config_path)?;
    let grouping_kind = config.graph.grouping_kind.clone();
    let analysis = run_analysis(path, config)?;

    match format {
        GraphFormat::Dot => print!(
            "{}",
            dot::generate_graph_diagram(&analysis.graph, &grouping_kind)
        ),
        GraphFormat::Json => println!("{}", json::format_graph(&analysis.graph, compact)),
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(CONFIG_FILE);
    if target.exists() && !force {
        anyhow::bail!("{CONFIG_FILE} already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())
        .with_context(|| format!("failed to write {CONFIG_FILE}"))?;
    println!("Created {CONFIG_FILE} with default configuration.");
    Ok(())
}

fn load_config(project_path: &Path, config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(p) => Config::load(p),
        None => Ok(Config::load_or_default(project_path)),
    }
}

fn run_analysis(path: &Path, config: Config) -> Result<FullAnalysis> {
    tracing::debug!(path = %path.display(), grouping_kind = %config.graph.grouping_kind, "analyzing");
    ScoringPipeline::new(config)
        .analyze(path)
        .with_context(|| format!("failed to score '{}'", path.display()))
}
