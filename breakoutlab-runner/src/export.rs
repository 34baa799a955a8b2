//! Artifact export — the per-run output bundle.
//!
//! Each run writes a directory containing:
//! - `manifest.json` — the serialized `RunReport` (schema-versioned)
//! - `signals.csv` — every BUY/SELL the strategy emitted
//! - `trades.csv` — realized fills with cost economics
//! - `equity.csv` — the daily equity curve (drawdown column included)
//! - `diagnostics.csv` — skipped (ticker, date) pairs and reasons
//!
//! Manifests carry a `schema_version`; unknown versions are rejected on
//! load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use breakoutlab_core::domain::{EquityPoint, Signal, SignalAction, Trade, TradeSide};
use breakoutlab_core::engine::Diagnostics;

use crate::runner::{RunOutcome, RunReport, SCHEMA_VERSION};

fn action_str(action: SignalAction) -> &'static str {
    match action {
        SignalAction::Buy => "BUY",
        SignalAction::Sell => "SELL",
        SignalAction::Hold => "HOLD",
    }
}

fn side_str(side: TradeSide) -> &'static str {
    match side {
        TradeSide::Buy => "BUY",
        TradeSide::Sell => "SELL",
    }
}

// ─── JSON manifest ──────────────────────────────────────────────────

/// Serialize a `RunReport` to pretty JSON.
pub fn export_manifest(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize RunReport to JSON")
}

/// Deserialize a `RunReport`, rejecting unknown schema versions.
pub fn import_manifest(json: &str) -> Result<RunReport> {
    let report: RunReport =
        serde_json::from_str(json).context("failed to deserialize RunReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Signals as CSV: ticker, date, action, reference_price, strategy_id.
pub fn export_signals_csv(signals: &[Signal]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["ticker", "date", "action", "reference_price", "strategy_id"])?;
    for s in signals {
        wtr.write_record([
            s.ticker.as_str(),
            &s.date.to_string(),
            action_str(s.action),
            &format!("{:.6}", s.reference_price),
            s.strategy_id.as_str(),
        ])?;
    }
    finish(wtr)
}

/// Trades as CSV with the full fill economics.
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "ticker",
        "date",
        "side",
        "requested_shares",
        "filled_shares",
        "requested_price",
        "filled_price",
        "commission",
        "slippage_cost",
    ])?;
    for t in trades {
        wtr.write_record([
            t.ticker.as_str(),
            &t.date.to_string(),
            side_str(t.side),
            &t.requested_shares.to_string(),
            &t.filled_shares.to_string(),
            &format!("{:.6}", t.requested_price),
            &format!("{:.6}", t.filled_price),
            &format!("{:.2}", t.commission),
            &format!("{:.2}", t.slippage_cost),
        ])?;
    }
    finish(wtr)
}

/// Equity curve as CSV; the drawdown_pct column is the underwater curve.
pub fn export_equity_csv(equity: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "cash",
        "positions_value",
        "total_equity",
        "peak_equity",
        "drawdown_pct",
    ])?;
    for p in equity {
        wtr.write_record([
            &p.date.to_string(),
            &format!("{:.2}", p.cash),
            &format!("{:.2}", p.positions_value),
            &format!("{:.2}", p.total_equity),
            &format!("{:.2}", p.peak_equity),
            &format!("{:.6}", p.drawdown_pct),
        ])?;
    }
    finish(wtr)
}

/// Skip diagnostics as CSV: date, ticker, reason.
pub fn export_diagnostics_csv(diagnostics: &Diagnostics) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "ticker", "reason"])?;
    for event in &diagnostics.events {
        let reason =
            serde_json::to_value(event.reason).context("failed to serialize skip reason")?;
        wtr.write_record([
            &event.date.to_string(),
            event.ticker.as_str(),
            reason.as_str().unwrap_or("unknown"),
        ])?;
    }
    finish(wtr)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one run.
///
/// Creates `{run_id prefix}_{timestamp}/` under `output_dir` and returns
/// its path.
pub fn save_artifacts(outcome: &RunOutcome, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        &outcome.report.run_id[..12],
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("manifest.json"), export_manifest(&outcome.report)?)?;
    std::fs::write(
        run_dir.join("signals.csv"),
        export_signals_csv(&outcome.result.signals)?,
    )?;
    std::fs::write(
        run_dir.join("trades.csv"),
        export_trades_csv(&outcome.result.trades)?,
    )?;
    std::fs::write(
        run_dir.join("equity.csv"),
        export_equity_csv(&outcome.result.equity)?,
    )?;
    std::fs::write(
        run_dir.join("diagnostics.csv"),
        export_diagnostics_csv(&outcome.result.diagnostics)?,
    )?;

    Ok(run_dir)
}

/// Load a `RunReport` back from an artifact directory.
pub fn load_manifest(dir: &Path) -> Result<RunReport> {
    let path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_manifest(&json)
}
