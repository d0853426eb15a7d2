//! Command-line interface for the investment simulator
//!
//! ```bash
//! # Rank companies and write the compact file for the advisor
//! invest-sim reconcile --scores crawling/db/company_scores.json \
//!     --prices calling_api/db/all_prices.json --output ai/db/for_llm.json
//!
//! # Ask the advisor about one company (Ollama on localhost by default)
//! invest-sim ask "지금 사도 될까?" --company 삼성전자 --language ko
//! ```

mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use invest_advisor::{AdvisorConfig, InvestAdvisor, ProviderKind};
use invest_core::{
    CachedQuoteProvider, Language, MarketCodes, QuoteProvider, ReconcileConfig, ReconciledSet,
    SnapshotQuoteProvider, YahooQuoteProvider,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "invest-sim")]
#[command(version, about = "AI stock investment simulator", long_about = None)]
struct Cli {
    /// Logging config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Input snapshots; unset paths fall back to the configured defaults
#[derive(Args, Debug, Default)]
struct DataArgs {
    /// Sentiment scores file
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Price snapshot file
    #[arg(long)]
    prices: Option<PathBuf>,
}

/// Article floor for interactive ranking; only `reconcile` uses the batch default
const QUERY_MIN_ARTICLES: u64 = 0;

#[derive(Args, Debug, Default)]
struct RankArgs {
    /// Number of companies to keep
    #[arg(long)]
    top_n: Option<usize>,

    /// Minimum article count (applied only when the count is known)
    #[arg(long)]
    min_articles: Option<u64>,
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// Chat backend: ollama or openai
    #[arg(long)]
    provider: Option<String>,

    /// Model identifier
    #[arg(long)]
    model: Option<String>,

    /// Answer language: en or ko
    #[arg(long, default_value = "en")]
    language: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile, rank and write the compact file
    Reconcile {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        rank: RankArgs,
        /// Output file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the ranking as a table
    Rank {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        rank: RankArgs,
    },
    /// Show one company's record, summary and quote
    Lookup {
        company: String,
        #[command(flatten)]
        data: DataArgs,
        /// Fetch a live quote from Yahoo Finance
        #[arg(long)]
        live: bool,
        /// Days of daily closes in the live chart series
        #[arg(long, default_value_t = 30)]
        chart_days: i64,
        /// Market code map used to resolve tickers
        #[arg(long)]
        codes: Option<PathBuf>,
        #[arg(long, default_value = "en")]
        language: String,
    },
    /// Print the news analysis summary for a company
    Summary {
        company: String,
        /// Sentiment scores file
        #[arg(long)]
        scores: Option<PathBuf>,
        #[arg(long, default_value = "en")]
        language: String,
    },
    /// Aggregate labelled articles into a scores file
    Aggregate {
        /// Classifier output
        #[arg(long)]
        articles: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Add company names to code-keyed price rows
    AttachNames {
        #[arg(long)]
        prices: PathBuf,
        /// Market code map
        #[arg(long)]
        codes: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Ask the advisor a question
    Ask {
        question: String,
        /// Company whose news summary is included
        #[arg(long)]
        company: Option<String>,
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Ask the advisor to pick among the top-ranked companies
    Recommend {
        /// Optional question; a default one is used when omitted
        question: Option<String>,
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        rank: RankArgs,
        #[command(flatten)]
        model: ModelArgs,
    },
}

/// Defaults and environment, then command-line overrides
fn reconcile_config(
    data: &DataArgs,
    rank: &RankArgs,
    output: Option<PathBuf>,
) -> Result<ReconcileConfig> {
    let mut config = ReconcileConfig::default().with_env();
    if let Some(path) = &data.scores {
        config.scores_path = path.clone();
    }
    if let Some(path) = &data.prices {
        config.prices_path = path.clone();
    }
    if let Some(path) = output {
        config.output_path = path;
    }
    if let Some(top_n) = rank.top_n {
        config.top_n = top_n;
    }
    if let Some(min_articles) = rank.min_articles {
        config.min_articles = min_articles;
    }
    config.validate()?;
    Ok(config)
}

/// Like [`reconcile_config`], but an unset `--min-articles` filters nothing
fn query_config(data: &DataArgs, rank: &RankArgs) -> Result<ReconcileConfig> {
    let mut config = reconcile_config(data, rank, None)?;
    if rank.min_articles.is_none() {
        config.min_articles = QUERY_MIN_ARTICLES;
    }
    Ok(config)
}

fn advisor_config(args: &ModelArgs) -> Result<AdvisorConfig> {
    let mut config = AdvisorConfig::default();
    if let Some(provider) = &args.provider {
        config.provider = provider.parse::<ProviderKind>()?;
    }
    let mut config = config.with_env();
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    config.language = Language::from_code(&args.language);
    config.validate()?;
    Ok(config)
}

fn load_companies(config: &ReconcileConfig) -> Result<ReconciledSet> {
    invest_core::load_company_data(&config.scores_path, &config.prices_path).with_context(|| {
        format!(
            "Failed to load company data from {} and {}",
            config.scores_path.display(),
            config.prices_path.display()
        )
    })
}

fn run_reconcile(config: &ReconcileConfig) -> Result<usize> {
    let companies = load_companies(config)?;
    let ranked = invest_core::rank(&companies, config.top_n, config.min_articles);
    invest_core::save_compact(&ranked, &config.output_path)?;

    info!(
        companies = companies.len(),
        ranked = ranked.len(),
        output = %config.output_path.display(),
        "Wrote compact ranking"
    );
    Ok(ranked.len())
}

async fn run_lookup(
    company: &str,
    config: &ReconcileConfig,
    live: bool,
    chart_days: i64,
    codes: Option<PathBuf>,
    language: Language,
) -> Result<()> {
    let companies = Arc::new(load_companies(config)?);

    match companies.get(company.trim()) {
        Some(record) => {
            for line in output::record_lines(record) {
                println!("{line}");
            }
            if let Some(summary) = invest_core::summarize_record(record, language) {
                println!("\n{summary}");
            }
        }
        None => println!("No reconciled data for {company}"),
    }

    let provider: Box<dyn QuoteProvider> = if live {
        let codes = match codes {
            Some(path) => {
                let origin = path.display().to_string();
                MarketCodes::from_value(&invest_core::load_json(&path)?, &origin)?
            }
            None => MarketCodes::default(),
        };
        Box::new(CachedQuoteProvider::new(
            YahooQuoteProvider::new(codes).with_chart_days(chart_days),
            config.quote_cache_ttl,
        ))
    } else {
        Box::new(SnapshotQuoteProvider::new(Arc::clone(&companies)))
    };

    let quote = provider.quote(company).await;
    println!();
    for line in output::quote_lines(&quote) {
        println!("{line}");
    }
    Ok(())
}

async fn with_advisor(config: AdvisorConfig) -> Result<InvestAdvisor> {
    let advisor = InvestAdvisor::from_config(config)?;
    if let Err(e) = advisor.initialize().await {
        warn!(error = %e, "Model preload failed; continuing");
    }
    Ok(advisor)
}

async fn close_advisor(advisor: &InvestAdvisor) {
    if let Err(e) = advisor.shutdown().await {
        warn!(error = %e, "Model unload failed");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = match &cli.config {
        Some(path) => invest_utils::Config::from_file(path)?.with_env(),
        None => invest_utils::Config::from_env(),
    };
    if cli.verbose {
        log_config.log_level = "debug".to_string();
    }
    invest_utils::init_tracing_with(&log_config);
    info!(environment = %log_config.environment, "Starting invest-sim");

    match cli.command {
        Commands::Reconcile { data, rank, output } => {
            let config = reconcile_config(&data, &rank, output)?;
            let count = run_reconcile(&config)?;
            println!("Wrote {count} companies to {}", config.output_path.display());
        }
        Commands::Rank { data, rank } => {
            let config = query_config(&data, &rank)?;
            let companies = load_companies(&config)?;
            let ranked = invest_core::rank(&companies, config.top_n, config.min_articles);
            println!("{}", output::ranking_table(&ranked));
        }
        Commands::Lookup {
            company,
            data,
            live,
            chart_days,
            codes,
            language,
        } => {
            let config = query_config(&data, &RankArgs::default())?;
            run_lookup(
                &company,
                &config,
                live,
                chart_days,
                codes,
                Language::from_code(&language),
            )
            .await?;
        }
        Commands::Summary {
            company,
            scores,
            language,
        } => {
            let data = DataArgs {
                scores,
                prices: None,
            };
            let config = reconcile_config(&data, &RankArgs::default(), None)?;
            let sentiment = invest_core::load_sentiment_source(&config.scores_path)?;
            let companies = invest_core::reconcile(&sentiment, &[]);

            match invest_core::format_sentiment_summary(
                company.trim(),
                &companies,
                Language::from_code(&language),
            ) {
                Some(summary) => println!("{summary}"),
                None => println!("No news analysis for {company}"),
            }
        }
        Commands::Aggregate { articles, output } => {
            let sentiment = invest_core::load_article_labels(&articles)?;
            invest_core::save_json(&sentiment.to_value(), &output)?;
            println!("Wrote {} companies to {}", sentiment.len(), output.display());
        }
        Commands::AttachNames {
            prices,
            codes,
            output,
        } => {
            let origin = prices.display().to_string();
            let codes = MarketCodes::from_value(
                &invest_core::load_json(&codes)?,
                &codes.display().to_string(),
            )?;
            let rows = invest_core::attach_company_names(
                &invest_core::load_json(&prices)?,
                &codes,
                &origin,
            )?;
            invest_core::save_json(&rows, &output)?;
            println!("Wrote named rows to {}", output.display());
        }
        Commands::Ask {
            question,
            company,
            data,
            model,
        } => {
            let config = reconcile_config(&data, &RankArgs::default(), None)?;
            let companies = load_companies(&config)?;

            let advisor = with_advisor(advisor_config(&model)?).await?;
            let answer = advisor.ask(&question, company.as_deref(), &companies).await;
            println!("{answer}");
            close_advisor(&advisor).await;
        }
        Commands::Recommend {
            question,
            data,
            rank,
            model,
        } => {
            let config = query_config(&data, &rank)?;
            let companies = load_companies(&config)?;

            let advisor = with_advisor(advisor_config(&model)?).await?;
            let answer = advisor
                .recommend(
                    &companies,
                    config.top_n,
                    config.min_articles,
                    question.as_deref().unwrap_or_default(),
                )
                .await;
            println!("{answer}");
            close_advisor(&advisor).await;
        }
    }

    Ok(())
}
