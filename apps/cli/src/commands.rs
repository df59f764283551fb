//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use shelfmark_capture::{CaptureOptions, CaptureRequest, capture_screenshot};
use shelfmark_core::pipeline::{OrganizeConfig, OrganizeResult, ProgressReporter, organize};
use shelfmark_core::RuleSet;
use shelfmark_shared::{AppConfig, init_config, resolve_config};
use tracing::{error, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Shelfmark: page screenshots and home library organization.
#[derive(Parser, Debug)]
#[command(
    name = "shelfmark",
    version,
    about = "Capture web page screenshots and organize a home library onto shelves.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.shelfmark/shelfmark.toml.
    #[arg(long, global = true, env = "SHELFMARK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Screenshot a page once it has loaded and rendered.
    Capture {
        /// Page to load.
        url: String,

        /// PNG file to write.
        output: PathBuf,

        /// Seconds to wait after load for client-side rendering.
        wait_seconds: Option<u64>,

        /// Label shown in logs (defaults to "Capturing <url>").
        description: Option<String>,
    },

    /// Place catalogued books on shelves and write an HTML guide.
    Organize {
        /// Directory containing the inventory exports.
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Report file (defaults to organizer.output_file inside --dir).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "shelfmark=info",
        1 => "shelfmark=debug",
        _ => "shelfmark=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Capture {
            url,
            output,
            wait_seconds,
            description,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            cmd_capture(&config, url, output, wait_seconds, description).await
        }
        Command::Organize { dir, output } => {
            let config = resolve_config(cli.config.as_deref())?;
            cmd_organize(&config, &dir, output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { action } => {
            match action {
                ConfigAction::Init => cmd_config_init()?,
                ConfigAction::Show => cmd_config_show(cli.config.as_deref())?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

async fn cmd_capture(
    config: &AppConfig,
    url: String,
    output: PathBuf,
    wait_seconds: Option<u64>,
    description: Option<String>,
) -> Result<ExitCode> {
    let request = CaptureRequest {
        url,
        output,
        wait: Duration::from_secs(wait_seconds.unwrap_or(config.capture.default_wait_secs)),
        description,
    };
    let options = CaptureOptions::from(&config.capture);

    println!();
    println!("{}", request.label());
    println!("  URL:    {}", request.url);
    println!("  Wait:   {}s for app to fully render", request.wait.as_secs());
    println!("  Output: {}", request.output.display());

    match capture_screenshot(&request, &options).await {
        Ok(outcome) => {
            println!("  ✓ Screenshot saved to {}", outcome.path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "capture failed");
            println!("  ✗ Error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

// ---------------------------------------------------------------------------
// Organize
// ---------------------------------------------------------------------------

fn cmd_organize(config: &AppConfig, dir: &Path, output: Option<PathBuf>) -> Result<()> {
    let organize_config = OrganizeConfig {
        source_dir: dir.to_path_buf(),
        input_pattern: config.organizer.input_pattern.clone(),
        output_path: output.unwrap_or_else(|| dir.join(&config.organizer.output_file)),
        layout: config.layout()?,
        rules: RuleSet::named(config.organizer.rule_set),
    };

    info!(
        dir = %dir.display(),
        rules = organize_config.rules.name,
        "organizing library"
    );

    let progress = CliProgress::new();
    let result = organize(&organize_config, &progress)?;

    println!();
    println!("Library organized");
    println!("  Books:       {}", result.book_count);
    println!("  Video games: {}", result.video_game_count);
    println!("  Music CDs:   {}", result.music_count);
    println!(
        "  Sources:     {} ({} skipped)",
        result.source_count,
        result.failed_sources.len()
    );
    println!();
    for shelf in result.space.shelves() {
        let status = if shelf.utilization <= 100.0 { "ok" } else { "OVER" };
        println!(
            "  {:<10} {:>6.1}%  {status}",
            shelf.shelf_id, shelf.utilization
        );
    }

    let over = result.over_capacity();
    println!();
    if over.is_empty() {
        println!("All shelves within capacity.");
    } else {
        println!("{} shelves over capacity.", over.len());
        println!("Consider additional shelving, digital copies, or rotating books into storage.");
    }
    println!("Report: {}", result.output_path.display());
    println!("Time:   {:.1}s", result.elapsed.as_secs_f64());

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn source_read(&self, path: &str, records: usize) {
        self.spinner
            .set_message(format!("Read {records} items from {path}"));
    }

    fn done(&self, _result: &OrganizeResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(explicit: Option<&Path>) -> Result<()> {
    let config = resolve_config(explicit)?;
    config.layout()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_positional_arguments() {
        let cli = Cli::try_parse_from([
            "shelfmark",
            "capture",
            "http://localhost:8080",
            "shots/home.png",
            "5",
            "Home page",
        ])
        .unwrap();

        match cli.command {
            Command::Capture {
                url,
                output,
                wait_seconds,
                description,
            } => {
                assert_eq!(url, "http://localhost:8080");
                assert_eq!(output, PathBuf::from("shots/home.png"));
                assert_eq!(wait_seconds, Some(5));
                assert_eq!(description.as_deref(), Some("Home page"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn capture_optional_arguments_default_to_none() {
        let cli = Cli::try_parse_from(["shelfmark", "capture", "http://x", "x.png"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Capture {
                wait_seconds: None,
                description: None,
                ..
            }
        ));
    }

    #[test]
    fn capture_requires_url_and_output() {
        assert!(Cli::try_parse_from(["shelfmark", "capture", "http://x"]).is_err());
        assert!(Cli::try_parse_from(["shelfmark", "capture", "http://x", "x.png", "soon"]).is_err());
    }

    #[test]
    fn organize_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["shelfmark", "organize"]).unwrap();
        match cli.command {
            Command::Organize { dir, output } => {
                assert_eq!(dir, PathBuf::from("."));
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "shelfmark",
            "organize",
            "-vv",
            "--log-format",
            "json",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn organize_writes_report_into_dir_by_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("library_books.csv"),
            "item_type,title,length\nbook,Genki I,250\n",
        )
        .unwrap();

        cmd_organize(&AppConfig::default(), dir.path(), None).unwrap();
        let html =
            std::fs::read_to_string(dir.path().join("library_organization.html")).unwrap();
        assert!(html.contains("Genki I"));
    }
}
