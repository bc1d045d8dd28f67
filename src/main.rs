//! Page-Lens main entry point
//!
//! This is the command-line interface for the Page-Lens page analyzer.

use clap::{Parser, Subcommand};
use page_lens::config::{load_config_or_default, Config};
use page_lens::fetch::{build_http_client, fetch_document};
use page_lens::output::{print_summary, render_json};
use page_lens::{server, Analyzer};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Page-Lens: a single-page web analyzer
///
/// Page-Lens fetches a web page and reports its title, HTML version,
/// heading outline, internal/external/broken link counts and whether it
/// looks like a login page.
#[derive(Parser, Debug)]
#[command(name = "page-lens")]
#[command(version = "1.0.0")]
#[command(about = "A single-page web analyzer", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a page and print its analysis
    ///
    /// Example: page-lens analyze https://example.com --json
    Analyze {
        /// URL of the page to analyze
        url: String,

        /// Print the result as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Pretty-print the JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Address to listen on (overrides the config file)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    let outcome = match cli.command {
        Commands::Analyze { url, json, pretty } => {
            handle_analyze(&config, &url, json, pretty).await
        }
        Commands::Serve { bind } => handle_serve(config, bind).await,
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_lens=info,warn"),
            1 => EnvFilter::new("page_lens=debug,info"),
            2 => EnvFilter::new("page_lens=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the analyze subcommand: fetch, analyze, print
async fn handle_analyze(
    config: &Config,
    url: &str,
    json: bool,
    pretty: bool,
) -> anyhow::Result<ExitCode> {
    let client = build_http_client(&config.fetcher)?;
    let analyzer = Analyzer::new(config)?;

    let page = match fetch_document(&client, url.trim()).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Fetch failed for {}: {}", url, e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let result = analyzer
        .analyze_bytes(&page.body, page.charset.as_deref(), url.trim())
        .await;

    if json {
        println!("{}", render_json(&result, pretty)?);
    } else {
        print_summary(url, &result);
    }

    Ok(ExitCode::SUCCESS)
}

/// Handles the serve subcommand: runs the HTTP API until interrupted
async fn handle_serve(mut config: Config, bind: Option<String>) -> anyhow::Result<ExitCode> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    tracing::info!(
        "Probe timeout: {}ms, probe concurrency: {}",
        config.prober.timeout_ms,
        config
            .prober
            .concurrency_limit()
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
    );

    server::serve(config).await?;
    Ok(ExitCode::SUCCESS)
}
