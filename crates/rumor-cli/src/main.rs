mod config;
mod ports;
mod stages;
mod upstream;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rumor_core::{
    DEFAULT_PREFERENCE_WEIGHT, Preference, Qualification, format_report, format_score,
    now_unix_secs,
};
use rumor_store::Store;

use config::RumorConfig;
use upstream::{Bitly, HackerNews, StdoutNotifier, WebhookNotifier};

#[derive(Parser)]
#[command(name = "rumor", about = "Keyword-learning news curation pipeline")]
struct Cli {
    /// Directory holding the database and config (default: ~/.rumor)
    #[arg(long, global = true, env = "RUMOR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Config file (default: <data-dir>/rumor.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Queue the current top stories for inspection
    Discover {
        /// Number of top stories to queue
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Fetch queued stories and forward fresh, linked ones for classification
    Inspect {
        #[arg(long, allow_negative_numbers = true)]
        batch_size: Option<i64>,
    },

    /// Extract keywords from queued stories and store them
    Classify {
        #[arg(long, allow_negative_numbers = true)]
        batch_size: Option<i64>,
    },

    /// Score stored stories against keyword preferences and record a report
    Evaluate {
        /// Multiple of the mean score an item must reach
        #[arg(long)]
        threshold: Option<f64>,

        /// Maximum number of items in the report
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Publish recently recorded reports
    Report {
        #[arg(long)]
        period_hours: Option<u64>,
    },

    /// Raise keyword weights from clicked report links
    Feedback,

    /// Manage keyword preferences
    Keyword {
        #[command(subcommand)]
        action: KeywordAction,
    },

    /// List keyword preferences
    Keywords,

    /// Show queue depths and table sizes
    Stats,
}

#[derive(Subcommand)]
enum KeywordAction {
    /// Create or replace a keyword preference
    Set {
        keyword: String,

        #[arg(
            long,
            default_value_t = DEFAULT_PREFERENCE_WEIGHT,
            allow_negative_numbers = true
        )]
        weight: f64,
    },
}

fn data_dir(cli: &Cli) -> PathBuf {
    cli.data_dir
        .clone()
        .unwrap_or_else(rumor_store::default_base_dir)
}

fn open_store(dir: &Path) -> Result<Store> {
    Store::open_in_dir(dir).with_context(|| format!("failed to open store in {}", dir.display()))
}

fn link_service(config: &RumorConfig) -> Result<Option<Bitly>> {
    config
        .bitly_access_token
        .as_deref()
        .map(|token| Bitly::new(&config.bitly_api_url, token))
        .transpose()
        .context("failed to build link service client")
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let dir = data_dir(&cli);
    let config = RumorConfig::load(cli.config.as_deref(), &dir)?;
    let store = open_store(&dir)?;

    match &cli.command {
        Commands::Discover { limit } => cmd_discover(&store, &config, *limit).await,
        Commands::Inspect { batch_size } => cmd_inspect(&store, &config, *batch_size).await,
        Commands::Classify { batch_size } => cmd_classify(&store, &config, *batch_size),
        Commands::Evaluate { threshold, limit } => {
            cmd_evaluate(&store, &config, *threshold, *limit).await
        }
        Commands::Report { period_hours } => cmd_report(&store, &config, *period_hours).await,
        Commands::Feedback => cmd_feedback(&store, &config).await,
        Commands::Keyword {
            action: KeywordAction::Set { keyword, weight },
        } => cmd_keyword_set(&store, &config, keyword, *weight),
        Commands::Keywords => cmd_keywords(&store, &config),
        Commands::Stats => cmd_stats(&store, &config),
    }
}

async fn cmd_discover(store: &Store, config: &RumorConfig, limit: Option<usize>) -> Result<()> {
    let feed = HackerNews::new()?;
    let limit = limit.unwrap_or(config.discovery_limit);
    stages::discover(&feed, store, config, limit).await?;
    Ok(())
}

async fn cmd_inspect(store: &Store, config: &RumorConfig, batch_size: Option<i64>) -> Result<()> {
    let feed = HackerNews::new()?;
    let batch_size = batch_size.unwrap_or(config.inspection_batch_size);
    stages::inspect(store, &feed, config, batch_size, now_unix_secs()).await?;
    Ok(())
}

fn cmd_classify(store: &Store, config: &RumorConfig, batch_size: Option<i64>) -> Result<()> {
    let batch_size = batch_size.unwrap_or(config.classification_batch_size);
    stages::classify(store, store, config, batch_size, now_unix_secs())?;
    Ok(())
}

async fn cmd_evaluate(
    store: &Store,
    config: &RumorConfig,
    threshold: Option<f64>,
    limit: Option<usize>,
) -> Result<()> {
    let params = Qualification {
        threshold: threshold.unwrap_or(config.qualification_threshold),
        limit: limit.unwrap_or(config.qualification_limit),
    };
    let links = link_service(config)?;
    let report = stages::evaluate(store, links.as_ref(), config, params, now_unix_secs()).await?;
    print!("{}", format_report(&report));
    Ok(())
}

async fn cmd_report(store: &Store, config: &RumorConfig, period_hours: Option<u64>) -> Result<()> {
    let period_hours = period_hours.unwrap_or(config.report_period_hours);
    let now = now_unix_secs();
    match config.notification_webhook_url.as_deref() {
        Some(url) => {
            let sink = WebhookNotifier::new(url)?;
            stages::send_reports(store, &sink, config, period_hours, now).await?;
        }
        None => {
            stages::send_reports(store, &StdoutNotifier, config, period_hours, now).await?;
        }
    }
    Ok(())
}

async fn cmd_feedback(store: &Store, config: &RumorConfig) -> Result<()> {
    let links = link_service(config)?;
    stages::process_feedback(store, links.as_ref(), config, now_unix_secs()).await?;
    Ok(())
}

fn cmd_keyword_set(store: &Store, config: &RumorConfig, keyword: &str, weight: f64) -> Result<()> {
    let preference = Preference::new(keyword, weight);
    let table = &config.preference_table_name;
    store
        .put_preference(table, &preference)
        .with_context(|| format!("failed to save keyword {keyword:?}"))?;
    println!(
        "Keyword \"{}\" with weight {} saved to table \"{table}\"",
        preference.keyword,
        format_score(preference.weight)
    );
    Ok(())
}

fn cmd_keywords(store: &Store, config: &RumorConfig) -> Result<()> {
    let preferences = store
        .preferences(&config.preference_table_name)
        .context("failed to load preferences")?;
    for preference in preferences {
        println!("{}={}", preference.keyword, format_score(preference.weight));
    }
    Ok(())
}

fn cmd_stats(store: &Store, config: &RumorConfig) -> Result<()> {
    let collection = store.queue_depth(&config.collection_queue_name)?;
    let classification = store.queue_depth(&config.classification_queue_name)?;
    let items = store.count_items(&config.news_item_table_name)?;
    let preferences = store.count_preferences(&config.preference_table_name)?;
    let reports = store.count_reports(&config.evaluation_report_table_name)?;

    println!("collection queue:     {collection}");
    println!("classification queue: {classification}");
    println!("news items:           {items}");
    println!("keywords:             {preferences}");
    println!("reports:              {reports}");
    Ok(())
}
