use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use jobscout_client::{ALL_SOURCES, build_search};
use jobscout_core::models::{DEFAULT_SOURCES, JobType, NormalizedJob, RemoteFilter, SearchRequest};
use jobscout_core::EngineConfig;

#[derive(Parser)]
#[command(name = "jobscout", version, about = "Job posting aggregator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search every requested source and print merged results
    Search {
        /// Search keywords
        #[arg(short, long)]
        query: String,

        /// Location to search in
        #[arg(short, long, default_value = "")]
        location: String,

        /// Comma-separated source ids (defaults to the standard set)
        #[arg(short, long, value_delimiter = ',')]
        sources: Vec<String>,

        /// Remote filter: yes, no or any
        #[arg(long, default_value = "any", value_parser = parse_remote)]
        remote: RemoteFilter,

        /// Job type filter (fulltime, parttime, contract, internship)
        #[arg(long, value_parser = parse_job_type)]
        job_type: Option<JobType>,

        /// Only postings newer than this many hours
        #[arg(long)]
        hours_old: Option<u32>,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 25)]
        results: usize,

        /// Country code for region-specific sites
        #[arg(long, default_value = "usa")]
        country: String,

        /// Pagination offset
        #[arg(long, default_value_t = 0)]
        offset: u32,

        /// Search radius
        #[arg(long, default_value_t = 50)]
        distance: u32,

        /// Timeout per HTTP attempt, in milliseconds
        #[arg(long, env = "JOBSCOUT_REQUEST_TIMEOUT_MS", default_value_t = 3000)]
        request_timeout_ms: u64,

        /// Deadline for the whole search, in milliseconds (0 disables it)
        #[arg(long, env = "JOBSCOUT_SCRAPE_TIMEOUT_MS", default_value_t = 8000)]
        scrape_timeout_ms: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the available source ids
    Sources,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn parse_remote(s: &str) -> Result<RemoteFilter, String> {
    s.parse()
}

fn parse_job_type(s: &str) -> Result<JobType, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = EngineConfig::from_env().context("Invalid configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config.log_directive().parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            location,
            sources,
            remote,
            job_type,
            hours_old,
            results,
            country,
            offset,
            distance,
            request_timeout_ms,
            scrape_timeout_ms,
            format,
        } => {
            let request = SearchRequest {
                sources: (!sources.is_empty()).then_some(sources),
                search_term: query,
                location,
                distance: Some(distance),
                remote,
                job_type,
                hours_old,
                results_wanted: results,
                country,
                offset,
                request_timeout: Duration::from_millis(request_timeout_ms),
                scrape_timeout: (scrape_timeout_ms > 0).then(|| Duration::from_millis(scrape_timeout_ms)),
            };
            cmd_search(&config, &request, format).await?;
        }
        Commands::Sources => cmd_sources()?,
    }

    Ok(())
}

async fn cmd_search(config: &EngineConfig, request: &SearchRequest, format: OutputFormat) -> Result<()> {
    let search = build_search(config).context("Failed to create HTTP client")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, returning what has been collected");
            on_interrupt.cancel();
        }
    });

    tracing::info!(query = %request.search_term, sources = ?request.source_ids(), "Searching");
    let jobs = search
        .search_with_cancel(request, cancel)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    let mut out = std::io::stdout().lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &jobs).context("Failed to serialize results")?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            if jobs.is_empty() {
                writeln!(out, "No jobs found (sources may also have been blocked).")?;
            }
            for (i, job) in jobs.iter().enumerate() {
                write_job(&mut out, i + 1, job)?;
            }
        }
    }
    Ok(())
}

fn write_job(out: &mut impl Write, n: usize, job: &NormalizedJob) -> std::io::Result<()> {
    writeln!(out, "{n}. {} @ {} ({})", job.title, job.company, job.location)?;
    writeln!(
        out,
        "   {} | {} | {} | {} | {}",
        job.site,
        job.date_posted,
        job.job_type_label(),
        job.remote,
        job.salary
    )?;
    if !job.job_url_raw.is_empty() {
        writeln!(out, "   {}", job.job_url_raw)?;
    }
    writeln!(out)
}

fn cmd_sources() -> Result<()> {
    let mut out = std::io::stdout().lock();
    for id in ALL_SOURCES {
        let marker = if DEFAULT_SOURCES.contains(id) { " (default)" } else { "" };
        writeln!(out, "{id}{marker}")?;
    }
    Ok(())
}
