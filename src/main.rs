mod config;
mod insights;
mod loader;
mod models;
mod pipeline;
mod report;
mod reshape;
mod scraper;
mod session;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::AppConfig;
use crate::loader::SavedPageFetcher;
use crate::pipeline::Pipeline;
use crate::report::{export_dataset, render_text};
use crate::reshape::period::AnalysisWindow;
use crate::scraper::{FinancialDataSource, ScreenerScraper};
use crate::session::{Session, repl};

#[derive(Parser)]
#[command(
    name = "company-diagnostics",
    about = "Fundamental diagnostics for listed companies from screener.in",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a company page and print the financial diagnostics report
    Analyze {
        /// Company page URL or bare symbol (e.g. TCS)
        url: String,

        /// Trailing window of fiscal years (default from config)
        #[arg(short, long, value_enum)]
        window: Option<AnalysisWindow>,

        #[arg(long, env = "FINDIAG_USER")]
        user: String,

        #[arg(long, env = "FINDIAG_PASSWORD", hide_env_values = true)]
        password: String,

        /// Read the company page from a saved HTML file instead of the network
        #[arg(long)]
        html: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the period-normalized tables of the selected window as CSV files
    Dataset {
        /// Company page URL or bare symbol (e.g. TCS)
        url: String,

        /// Trailing window of fiscal years (default from config)
        #[arg(short, long, value_enum)]
        window: Option<AnalysisWindow>,

        /// Output directory
        #[arg(short, long, default_value = "dataset")]
        out: PathBuf,

        /// Read the company page from a saved HTML file instead of the network
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Interactive session driven by commands on stdin (`help` lists them)
    Session {
        /// Company to load before reading commands
        url: Option<String>,

        /// Initial analysis window (default from config)
        #[arg(short, long, value_enum)]
        window: Option<AnalysisWindow>,

        #[arg(long, env = "FINDIAG_USER")]
        user: Option<String>,

        #[arg(long, env = "FINDIAG_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Read every company page from a saved HTML file instead of the network
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "company_diagnostics=info,warn",
        1 => "company_diagnostics=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Analyze { url, window, user, password, html, json } => {
            let _t = utils::Timer::start(format!("Analyze {}", url));
            let window = window.unwrap_or(config.analysis.window);
            match html {
                Some(path) => {
                    let pipeline = offline_pipeline(&config, path);
                    analyze(pipeline, &url, window, &user, &password, json).await?
                }
                None => {
                    let pipeline = Pipeline::new(&config)?;
                    analyze(pipeline, &url, window, &user, &password, json).await?
                }
            }
        }

        Command::Dataset { url, window, out, html } => {
            let _t = utils::Timer::start(format!("Dataset {}", url));
            let window = window.unwrap_or(config.analysis.window);
            let data = match html {
                Some(path) => offline_pipeline(&config, path).fetch(&url).await?,
                None => Pipeline::new(&config)?.fetch(&url).await?,
            };
            let report = pipeline::analyze(&data, window, config.analysis.max_highlights);
            let files = export_dataset(&report.data, &out)?;
            for f in &files {
                println!("{}", f.display());
            }
        }

        Command::Session { url, window, user, password, html } => {
            let start = Start { url, window, user, password };
            match html {
                Some(path) => interactive(offline_pipeline(&config, path), start).await?,
                None => interactive(Pipeline::new(&config)?, start).await?,
            }
        }
    }

    Ok(())
}

fn offline_pipeline(
    config: &AppConfig,
    path: PathBuf,
) -> Pipeline<ScreenerScraper<SavedPageFetcher>> {
    let fetcher = SavedPageFetcher::new(path);
    info!("Reading company page from {:?}", fetcher.path());
    Pipeline::with_source(
        ScreenerScraper::new(fetcher, &config.scraper.base_url),
        config.analysis.clone(),
    )
}

async fn analyze<S: FinancialDataSource>(
    pipeline: Pipeline<S>,
    url: &str,
    window: AnalysisWindow,
    user: &str,
    password: &str,
    json: bool,
) -> Result<()> {
    let mut session = Session::new(pipeline);
    session.login(user, password)?;
    session.load(url).await.context("Failed to load company data")?;
    session.select_window(window);

    let report = session.report()?;
    info!(
        "{}: confidence {}/100 over {}",
        report.data.company, report.score.total, report.window
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

struct Start {
    url: Option<String>,
    window: Option<AnalysisWindow>,
    user: Option<String>,
    password: Option<String>,
}

async fn interactive<S: FinancialDataSource>(pipeline: Pipeline<S>, start: Start) -> Result<()> {
    let mut session = Session::new(pipeline);
    if let Some(window) = start.window {
        session.select_window(window);
    }

    if let (Some(user), Some(password)) = (&start.user, &start.password) {
        session.login(user, password)?;
    }

    let mut stdout = std::io::stdout();
    if let Some(url) = &start.url {
        let script = format!("load {}\nreport\n", url);
        repl::run(&mut session, script.as_bytes(), &mut stdout).await?;
    }
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    repl::run(&mut session, stdin, &mut stdout).await?;

    info!("Session ended");
    Ok(())
}
