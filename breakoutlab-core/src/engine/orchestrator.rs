//! The daily simulation loop.
//!
//! Per date: evaluate every ticker in parallel against read-only state,
//! then reduce sequentially in ticker order so results are deterministic
//! regardless of thread count. Exits are processed before entries, so a
//! slot freed by a SELL is available to a BUY on the same date — but a
//! ticker produces one evaluation per date, so it can never exit and
//! re-enter on the same day.
//!
//! The orchestrator owns all position state. Stop proposals from
//! strategies pass through `PositionState::ratchet_stop`, so a stop can
//! only ever tighten. Entries are gated by the regime filter (Bear or
//! missing regime blocks new BUYs; exits always run) and by the slot
//! sizer; every gated signal is recorded in the run diagnostics.

use crate::domain::{Bar, EquityPoint, PositionState, Signal, SignalAction, Trade, TradeSide};
use crate::engine::config::{ConfigError, SimConfig};
use crate::engine::diagnostics::{Diagnostics, SkipReason};
use crate::perf::PerformanceSummary;
use crate::regime::{self, Regime};
use crate::sizing::SlotSizer;
use crate::strategy::{self, Evaluation, TickerDay};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Everything a run produces.
///
/// `signals` holds every BUY/SELL the strategy emitted, whether or not it
/// became a trade; `trades` holds only realized fills. HOLDs are not
/// recorded.
#[derive(Debug, Clone)]
pub struct SimResult {
    pub signals: Vec<Signal>,
    pub trades: Vec<Trade>,
    pub equity: Vec<EquityPoint>,
    pub summary: PerformanceSummary,
    pub diagnostics: Diagnostics,
}

/// Precomputed per-ticker state, built once before the daily loop.
struct TickerData<'a> {
    ticker: &'a str,
    bars: &'a [Bar],
    indicators: crate::indicators::IndicatorSet,
    index_by_date: HashMap<NaiveDate, usize>,
}

/// Outcome of evaluating one ticker on one date, before the reduce.
enum DayOutcome {
    /// No bar for this ticker today.
    NoBar,
    /// Bar present but the strategy's indicator windows are still warming
    /// up.
    NoFrame,
    Evaluated(Evaluation),
}

/// Run a full simulation over the given universe.
///
/// `bars_by_ticker` must hold date-sorted series; `index_bars` drives the
/// regime filter. Configuration is validated up front; data problems
/// (gaps, warmup) are diagnostics, never errors.
pub fn run_simulation(
    bars_by_ticker: &BTreeMap<String, Vec<Bar>>,
    index_bars: &[Bar],
    config: &SimConfig,
) -> Result<SimResult, ConfigError> {
    config.validate()?;

    let strat = strategy::build(config.strategy);
    // Warmup counts only the windows the configured strategy reads, so a
    // 100-day Donchian run fires at bar 100 even under a 200-bar slow SMA.
    let warmup = config.strategy.warmup_bars(&config.indicators);
    let sizer = SlotSizer::new(config.slots);
    let regime_by_date = regime::by_date(&regime::classify(index_bars, config.regime_period));

    // Indicator precomputation fans out across tickers; everything after
    // this point indexes into the results.
    let tickers: Vec<(&String, &Vec<Bar>)> = bars_by_ticker.iter().collect();
    let prepared: Vec<TickerData<'_>> = tickers
        .par_iter()
        .map(|&(ticker, bars)| TickerData {
            ticker: ticker.as_str(),
            bars,
            indicators: crate::indicators::IndicatorSet::compute(bars, &config.indicators),
            index_by_date: bars.iter().enumerate().map(|(i, b)| (b.date, i)).collect(),
        })
        .collect();

    let dates: BTreeSet<NaiveDate> = prepared
        .iter()
        .flat_map(|t| t.bars.iter().map(|b| b.date))
        .collect();

    let mut positions: BTreeMap<String, PositionState> = BTreeMap::new();
    let mut last_close: HashMap<String, f64> = HashMap::new();
    let mut cash = config.initial_capital;
    let mut peak = config.initial_capital;

    let mut signals = Vec::new();
    let mut trades = Vec::new();
    let mut equity = Vec::new();
    let mut diagnostics = Diagnostics::default();

    for &date in &dates {
        // Parallel fan-out: one evaluation per ticker against a frozen view
        // of the position book. `prepared` is ticker-sorted and the indexed
        // collect preserves that order for the sequential reduce below.
        let outcomes: Vec<DayOutcome> = prepared
            .par_iter()
            .map(|data| {
                let Some(&index) = data.index_by_date.get(&date) else {
                    return DayOutcome::NoBar;
                };
                if index < warmup {
                    return DayOutcome::NoFrame;
                }
                let day = TickerDay {
                    ticker: data.ticker,
                    bars: data.bars,
                    index,
                    indicators: &data.indicators,
                };
                DayOutcome::Evaluated(strat.evaluate(&day, positions.get(data.ticker)))
            })
            .collect();

        for data in &prepared {
            if let Some(&index) = data.index_by_date.get(&date) {
                last_close.insert(data.ticker.to_string(), data.bars[index].close);
            }
        }

        let mut exits: Vec<Evaluation> = Vec::new();
        let mut entries: Vec<Evaluation> = Vec::new();

        for (data, outcome) in prepared.iter().zip(outcomes) {
            match outcome {
                DayOutcome::NoBar => {
                    // The date axis is the union of every ticker's dates; a
                    // gap only matters when a position is carried across it.
                    if positions.contains_key(data.ticker) {
                        diagnostics.record(date, data.ticker, SkipReason::DataGap);
                    }
                }
                DayOutcome::NoFrame => {
                    diagnostics.record(date, data.ticker, SkipReason::InsufficientHistory);
                }
                DayOutcome::Evaluated(eval) => {
                    let open = positions.contains_key(data.ticker);
                    if eval.signal.action == SignalAction::Sell && open {
                        exits.push(eval);
                    } else if eval.signal.action == SignalAction::Buy && !open {
                        entries.push(eval);
                    } else if let (Some(stop), Some(pos)) =
                        (eval.proposed_stop, positions.get_mut(data.ticker))
                    {
                        pos.ratchet_stop(stop);
                    }
                }
            }
        }

        // Exits first: freed slots and cash are usable by today's entries.
        for eval in exits {
            let ticker = eval.signal.ticker.clone();
            let Some(pos) = positions.remove(&ticker) else {
                continue;
            };
            let trade = config.costs.fill(
                &ticker,
                date,
                TradeSide::Sell,
                pos.shares,
                eval.signal.reference_price,
            );
            cash += trade.cash_delta();
            signals.push(eval.signal);
            trades.push(trade);
        }

        let regime_today = regime_by_date.get(&date).copied();
        for eval in entries {
            let ticker = eval.signal.ticker.clone();
            signals.push(eval.signal.clone());

            match regime_today {
                None => {
                    diagnostics.record(date, &ticker, SkipReason::RegimeUnavailable);
                    continue;
                }
                Some(Regime::Bear) => {
                    diagnostics.record(date, &ticker, SkipReason::RegimeBear);
                    continue;
                }
                Some(Regime::Bull) => {}
            }

            let price = eval.signal.reference_price;
            let marked = mark_to_market(&positions, &last_close);
            let sized =
                sizer.size_entry(price, cash + marked, cash, positions.len());
            let mut shares = match sized {
                Ok(shares) => shares,
                Err(skip) => {
                    diagnostics.record(date, &ticker, skip.into());
                    continue;
                }
            };

            // The sizer works from the reference price; slippage and
            // commission can push the true cost past remaining cash, so
            // shave shares until the buy fits.
            while shares > 0 && config.costs.buy_cost(shares, price) > cash {
                shares -= 1;
            }
            if shares == 0 {
                diagnostics.record(date, &ticker, SkipReason::AllocationExhausted);
                continue;
            }

            let trade = config.costs.fill(&ticker, date, TradeSide::Buy, shares, price);
            cash += trade.cash_delta();
            positions.insert(
                ticker.clone(),
                PositionState::open(ticker, date, trade.filled_price, shares, eval.proposed_stop),
            );
            trades.push(trade);
        }

        let positions_value = mark_to_market(&positions, &last_close);
        let (point, next_peak) = EquityPoint::mark(date, cash, positions_value, peak);
        peak = next_peak;
        equity.push(point);
    }

    let summary = PerformanceSummary::compute(&equity, config.initial_capital);

    Ok(SimResult {
        signals,
        trades,
        equity,
        summary,
        diagnostics,
    })
}

/// Value every open position at its ticker's last known close.
fn mark_to_market(
    positions: &BTreeMap<String, PositionState>,
    last_close: &HashMap<String, f64>,
) -> f64 {
    positions
        .iter()
        .map(|(ticker, pos)| {
            last_close
                .get(ticker)
                .map(|&close| pos.market_value(close))
                .unwrap_or(pos.market_value(pos.entry_price))
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SignalAction;
    use crate::indicators::{make_bars, IndicatorParams};
    use crate::strategy::StrategyKind;

    fn small_config() -> SimConfig {
        SimConfig {
            initial_capital: 100_000.0,
            slots: 1,
            strategy: StrategyKind::DonchianBreakout,
            indicators: IndicatorParams {
                sma_fast: 3,
                sma_slow: 5,
                boll_period: 5,
                boll_multiplier: 2.0,
                donchian_entry: 5,
                donchian_exit: 3,
            },
            regime_period: 3,
            costs: crate::costs::CostModel::frictionless(),
        }
    }

    fn universe(closes: &[f64]) -> BTreeMap<String, Vec<Bar>> {
        let mut map = BTreeMap::new();
        map.insert("TEST".to_string(), make_bars(closes));
        map
    }

    fn bull_index(n: usize) -> Vec<Bar> {
        // Rising closes keep the index above any trailing SMA.
        make_bars(&(0..n).map(|i| 100.0 + i as f64).collect::<Vec<_>>())
    }

    #[test]
    fn breakout_opens_one_position() {
        // Flat 100s, then a spike above the prior 5-day high.
        let mut closes = vec![100.0; 10];
        closes[8] = 120.0;
        closes[9] = 121.0;

        let result =
            run_simulation(&universe(&closes), &bull_index(10), &small_config()).unwrap();

        let buys: Vec<_> = result
            .signals
            .iter()
            .filter(|s| s.action == SignalAction::Buy)
            .collect();
        assert_eq!(buys.len(), 1);
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].side, TradeSide::Buy);

        // 100_000 / 120 floors to 833 shares; frictionless fill.
        assert_eq!(result.trades[0].filled_shares, 833);
        let last = result.equity.last().unwrap();
        // cash 40 + 833 * 121
        assert!((last.total_equity - 100_833.0).abs() < 1e-9);
    }

    #[test]
    fn bear_regime_gates_entries() {
        let mut closes = vec![100.0; 10];
        closes[8] = 120.0;

        // Falling index: every regime date is Bear.
        let index =
            make_bars(&(0..10).map(|i| 110.0 - i as f64).collect::<Vec<_>>());
        let result = run_simulation(&universe(&closes), &index, &small_config()).unwrap();

        assert!(result.trades.is_empty());
        // The BUY signal is still recorded, just not filled.
        assert!(result
            .signals
            .iter()
            .any(|s| s.action == SignalAction::Buy));
        assert_eq!(result.diagnostics.count_of(SkipReason::RegimeBear), 1);
    }

    #[test]
    fn missing_regime_gates_entries() {
        let mut closes = vec![100.0; 10];
        closes[8] = 120.0;

        // Index too short for its SMA: no regime value on any date.
        let index = bull_index(2);
        let result = run_simulation(&universe(&closes), &index, &small_config()).unwrap();

        assert!(result.trades.is_empty());
        assert_eq!(
            result.diagnostics.count_of(SkipReason::RegimeUnavailable),
            1
        );
    }

    #[test]
    fn warmup_dates_record_insufficient_history() {
        let result =
            run_simulation(&universe(&[100.0; 10]), &bull_index(10), &small_config()).unwrap();
        // First frame at index 5 (Donchian entry window of 5 excludes the
        // current bar), so indices 0..5 are warmup.
        assert_eq!(
            result.diagnostics.count_of(SkipReason::InsufficientHistory),
            5
        );
    }

    #[test]
    fn equity_series_covers_every_date() {
        let result =
            run_simulation(&universe(&[100.0; 10]), &bull_index(10), &small_config()).unwrap();
        assert_eq!(result.equity.len(), 10);
        assert!(result
            .equity
            .iter()
            .all(|p| (p.total_equity - 100_000.0).abs() < 1e-9));
        assert_eq!(result.summary.max_drawdown, 0.0);
        assert_eq!(result.summary.mar_ratio, None);
    }

    #[test]
    fn invalid_config_fails_fast() {
        let mut config = small_config();
        config.slots = 0;
        let err = run_simulation(&universe(&[100.0; 10]), &bull_index(10), &config);
        assert_eq!(err.unwrap_err(), ConfigError::ZeroSlots);
    }

    #[test]
    fn empty_universe_yields_empty_run() {
        let result =
            run_simulation(&BTreeMap::new(), &bull_index(10), &small_config()).unwrap();
        assert!(result.equity.is_empty());
        assert!(result.trades.is_empty());
        assert_eq!(result.summary.n_days, 0);
    }
}
