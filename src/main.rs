// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use nebula_rag::utils::logging::{format_error, format_heading, format_success, format_warning};
use nebula_rag::{Config, DocumentLoader, PipelineError, RagPipeline, Validator};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "nebula_rag")]
#[command(version)]
#[command(about = "Answer a question from a folder of text documents with Gemini", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Directory whose files become the documents
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Args)]
struct QueryArgs {
    /// Question to answer; defaults to the configured query
    query: Option<String>,

    #[command(flatten)]
    corpus: CorpusArgs,

    #[arg(short = 'k', long, value_name = "NUM")]
    top_k: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Retrieve the best document and generate an answer from it
    Ask(QueryArgs),

    /// Rank documents against a query without generating an answer
    Search {
        #[command(flatten)]
        args: QueryArgs,

        /// Print the ranked hits as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the documents that would be indexed
    Docs(CorpusArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    nebula_rag::utils::logging::init_logger(cli.color, cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let pipeline_error = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<PipelineError>());

            eprintln!("{}", format_error(&format!("{:#}", err)));
            if pipeline_error.is_some_and(PipelineError::is_retryable) {
                eprintln!(
                    "{}",
                    format_warning("The provider call failed; retrying may succeed")
                );
            }

            ExitCode::from(pipeline_error.map_or(1, PipelineError::exit_code))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    match cli.command {
        Commands::Ask(args) => cmd_ask(config, args, cli.color).await,
        Commands::Search { args, json } => cmd_search(config, args, json, cli.color).await,
        Commands::Docs(args) => cmd_docs(config, args),
    }
}

fn apply_corpus_args(config: &mut Config, args: &CorpusArgs) {
    if let Some(dir) = &args.data_dir {
        config.corpus.data_dir = dir.clone();
    }
}

/// Applies CLI overrides and returns the query to run.
fn apply_query_args(config: &mut Config, args: QueryArgs) -> Result<String> {
    apply_corpus_args(config, &args.corpus);

    if let Some(top_k) = args.top_k {
        Validator::validate_top_k(top_k)?;
        config.retrieval.top_k = top_k;
    }

    Ok(args
        .query
        .unwrap_or_else(|| config.retrieval.default_query.clone()))
}

async fn cmd_ask(mut config: Config, args: QueryArgs, color: bool) -> Result<()> {
    let query = apply_query_args(&mut config, args)?;
    let start_time = Instant::now();

    let pipeline = RagPipeline::from_config(config)
        .context("Failed to initialize providers")?
        .with_progress(true)
        .with_color(color);

    let answer = pipeline.ask(&query).await.context("Pipeline run failed")?;

    eprintln!(
        "{}",
        format_success(&format!(
            "Completed in {:.2}s",
            start_time.elapsed().as_secs_f64()
        ))
    );
    println!("{}", answer);

    Ok(())
}

async fn cmd_search(mut config: Config, args: QueryArgs, json: bool, color: bool) -> Result<()> {
    let query = apply_query_args(&mut config, args)?;

    let pipeline = RagPipeline::for_retrieval(config)
        .context("Failed to initialize embedding provider")?
        .with_progress(!json)
        .with_color(color);

    let results = pipeline.search(&query).await.context("Search failed")?;

    if json {
        let output = serde_json::to_string_pretty(&results)
            .map_err(|e| PipelineError::Serialization(e.to_string()))?;
        println!("{}", output);
        return Ok(());
    }

    if results.is_empty() {
        println!("\nNo results found for query: \"{}\"\n", query);
        return Ok(());
    }

    println!(
        "\n{}\n",
        format_heading(&format!("Search Results for: \"{}\"", query))
    );
    println!("{}", "=".repeat(80));

    for (idx, result) in results.hits.iter().enumerate() {
        println!("\n{}. {}", idx + 1, result.format_summary(300));

        if let Some(distance) = result.distance {
            println!("   Distance: {:.4}", distance);
        }
    }

    println!("\n{}", "=".repeat(80));
    info!("Search complete");

    Ok(())
}

fn cmd_docs(mut config: Config, args: CorpusArgs) -> Result<()> {
    apply_corpus_args(&mut config, &args);

    let documents =
        DocumentLoader::load(&config.corpus.data_dir).context("Failed to load documents")?;

    if documents.is_empty() {
        println!("No documents in {}", config.corpus.data_dir.display());
        return Ok(());
    }

    for (position, document) in documents.iter().enumerate() {
        println!(
            "{:>3}  {:<40} {:>8} bytes  {}",
            position,
            document.identifier,
            document.size,
            document.short_hash()
        );
    }

    Ok(())
}
