//! Command-line health check for the stock analysis system's data sources
//!
//! # Usage
//!
//! ```bash
//! # Optional: avoids the interactive prompt for the NewsAPI key
//! export NEWSAPI_KEY="your-key"
//!
//! cargo run --bin stock-probe
//! cargo run --bin stock-probe -- --symbols RELIANCE,HDFCBANK --format json
//! ```

use clap::{Parser, ValueEnum};
use probe_stock::{
    ConsoleRenderer, HealthCheckConfig, HealthChecker, JsonRenderer, PromptPolicy, Renderer,
    resolve_news_api_key, stdin_prompter,
};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human readable report
    Text,
    /// One JSON document on stdout
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "stock-probe")]
#[command(about = "Check connectivity to the stock analysis data sources", long_about = None)]
struct Args {
    /// Comma-separated NSE symbols; ".NS" is appended when missing
    #[arg(long, value_delimiter = ',')]
    symbols: Option<Vec<String>>,

    /// Timeout for each outbound call, in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Seed for the synthetic indicator data
    #[arg(long, conflicts_with = "random_seed")]
    seed: Option<u64>,

    /// Seed the synthetic indicator data from OS entropy
    #[arg(long)]
    random_seed: bool,

    /// Never prompt for a missing NewsAPI key
    #[arg(long)]
    no_prompt: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn build_config(args: &Args) -> anyhow::Result<HealthCheckConfig> {
    let mut builder = HealthCheckConfig::builder()
        .request_timeout(Duration::from_secs(args.timeout))
        .with_env_api_key();

    if let Some(symbols) = &args.symbols {
        builder = builder.symbols(symbols);
    }

    if args.random_seed {
        builder = builder.synthetic_seed(None);
    } else if let Some(seed) = args.seed {
        builder = builder.synthetic_seed(Some(seed));
    }

    Ok(builder.build()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    probe_utils::init_tracing();

    let args = Args::parse();
    let config = build_config(&args)?;

    let policy = if args.no_prompt || args.format == OutputFormat::Json {
        PromptPolicy::Never
    } else {
        PromptPolicy::Interactive
    };
    let api_key = resolve_news_api_key(config.news_api_key.clone(), policy, stdin_prompter);

    let checker = HealthChecker::standard(&config, api_key)?;
    info!(probes = checker.len(), "Starting stock-probe");

    let mut renderer: Box<dyn Renderer> = match args.format {
        OutputFormat::Text => Box::new(ConsoleRenderer::new(std::io::stdout())),
        OutputFormat::Json => Box::new(JsonRenderer::new(std::io::stdout())),
    };

    let run = checker.run_rendered(renderer.as_mut()).await;

    let totals = run.totals();
    info!(
        success = totals.success,
        warning = totals.warning,
        failure = totals.failure,
        "Health check finished"
    );

    // Probe failures are reported, not escalated
    Ok(())
}
