//! BreakoutLab CLI — run simulations and generate demo data.
//!
//! Commands:
//! - `run` — execute a simulation from a TOML config file and save artifacts
//! - `synth` — write seeded synthetic CSV bar data for demos and fixtures

use anyhow::{Context, Result};
use breakoutlab_core::data::{BarProvider, SyntheticProvider};
use breakoutlab_runner::export::save_artifacts;
use breakoutlab_runner::{run, RunConfig, RunOutcome};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "breakoutlab",
    about = "BreakoutLab CLI — daily breakout-strategy simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a simulation from a TOML config file.
    Run {
        /// Path to a TOML run config.
        #[arg(long)]
        config: PathBuf,

        /// Output directory for the artifact bundle.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Generate synthetic CSV bar data.
    Synth {
        /// Tickers to generate (e.g., AAA BBB SPY).
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 5 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// RNG seed; the same seed always yields the same data.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Directory to write {TICKER}.csv files into.
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output_dir } => run_cmd(&config, &output_dir),
        Commands::Synth {
            tickers,
            start,
            end,
            seed,
            out_dir,
        } => synth_cmd(&tickers, start.as_deref(), end.as_deref(), seed, &out_dir),
    }
}

fn run_cmd(config_path: &PathBuf, output_dir: &PathBuf) -> Result<()> {
    let config = RunConfig::load(config_path)?;
    let outcome = run(&config).context("simulation run failed")?;

    print_summary(&outcome);

    let run_dir = save_artifacts(&outcome, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn synth_cmd(
    tickers: &[String],
    start: Option<&str>,
    end: Option<&str>,
    seed: u64,
    out_dir: &PathBuf,
) -> Result<()> {
    let start_date = start
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive() - chrono::Duration::days(365 * 5));
    let end_date = end
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let provider = SyntheticProvider::new(seed);
    for ticker in tickers {
        let bars = provider
            .get_bars(ticker, start_date, end_date)
            .with_context(|| format!("failed to generate bars for {ticker}"))?;

        let path = out_dir.join(format!("{ticker}.csv"));
        let mut file = std::fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        writeln!(file, "date,open,high,low,close,volume")?;
        for bar in &bars {
            writeln!(
                file,
                "{},{:.4},{:.4},{:.4},{:.4},{}",
                bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
            )?;
        }
        println!("Wrote {} bars to {}", bars.len(), path.display());
    }

    Ok(())
}

fn print_summary(outcome: &RunOutcome) {
    let report = &outcome.report;
    let summary = &report.summary;

    println!();
    println!("=== Simulation Result ===");
    println!("Run ID:         {}", &report.run_id[..12]);
    println!(
        "Period:         {} to {}",
        report.config.start_date, report.config.end_date
    );
    println!(
        "Universe:       {} tickers ({} skipped)",
        report.config.universe.len() - report.skipped_tickers.len(),
        report.skipped_tickers.len()
    );
    println!("Strategy:       {}", report.config.sim.strategy.id().as_str());
    println!("Signals:        {}", report.n_signals);
    println!("Trades:         {}", report.n_trades);
    println!();
    println!("--- Performance ---");
    println!("Total Return:   {:.2}%", summary.total_return * 100.0);
    println!("CAGR:           {:.2}%", summary.cagr * 100.0);
    println!("Max Drawdown:   {:.2}%", summary.max_drawdown * 100.0);
    match summary.mar_ratio {
        Some(mar) => println!("MAR Ratio:      {mar:.3}"),
        None => println!("MAR Ratio:      n/a (no drawdown)"),
    }
    if let Some(last) = outcome.result.equity.last() {
        println!("Final Equity:   {:.2}", last.total_equity);
    }

    for skipped in &report.skipped_tickers {
        println!("WARNING: skipped {}: {}", skipped.ticker, skipped.reason);
    }
    if !report.skip_counts.is_empty() {
        let counts: Vec<String> = report
            .skip_counts
            .iter()
            .map(|(reason, count)| {
                let name = serde_json::to_value(reason)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_else(|| format!("{reason:?}"));
                format!("{name}={count}")
            })
            .collect();
        println!("Skips:          {}", counts.join(", "));
    }
}
