//! Per-date indicator frames, assembled from precomputed series.
//!
//! One `IndicatorSet` per ticker holds every series the strategies read.
//! The full `frame_at` yields a frame only once the whole window stack has
//! warmed up; the per-group accessors (`donchian_at`, `bollinger_at`)
//! become available as soon as their own windows are warm, so a strategy
//! is never held back by a series it does not read. Warmup dates get
//! `None`, never a zero-filled value (lookahead-bias guard).

use super::{Bollinger, Donchian, Indicator, Sma};
use crate::domain::Bar;
use serde::{Deserialize, Serialize};

/// Window lengths for the frame's constituent series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorParams {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub boll_period: usize,
    pub boll_multiplier: f64,
    pub donchian_entry: usize,
    pub donchian_exit: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_fast: 50,
            sma_slow: 200,
            boll_period: 100,
            boll_multiplier: 2.0,
            donchian_entry: 100,
            donchian_exit: 50,
        }
    }
}

impl IndicatorParams {
    /// Bar index of the first possible frame: every series must be warm.
    pub fn warmup_bars(&self) -> usize {
        (self.sma_slow.max(self.sma_fast).max(self.boll_period) - 1)
            .max(self.donchian_entry)
            .max(self.donchian_exit)
    }
}

/// All indicator values for one (ticker, date).
///
/// Derived data: recomputed whenever the underlying bars change, replaced
/// wholesale, never mutated in place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub sma_fast: f64,
    pub sma_slow: f64,
    pub boll_upper: f64,
    pub boll_mid: f64,
    pub boll_lower: f64,
    pub donchian_high: f64,
    pub donchian_low: f64,
}

/// Prior-window Donchian channel values for one (ticker, date).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonchianChannel {
    pub high: f64,
    pub low: f64,
}

/// Bollinger band values for one (ticker, date).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerValues {
    pub upper: f64,
    pub mid: f64,
    pub lower: f64,
}

/// Precomputed indicator series for one ticker.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    sma_fast: Vec<f64>,
    sma_slow: Vec<f64>,
    boll_upper: Vec<f64>,
    boll_mid: Vec<f64>,
    boll_lower: Vec<f64>,
    donchian_high: Vec<f64>,
    donchian_low: Vec<f64>,
    len: usize,
}

impl IndicatorSet {
    /// Compute every series for the given bar history.
    pub fn compute(bars: &[Bar], params: &IndicatorParams) -> Self {
        Self {
            sma_fast: Sma::new(params.sma_fast).compute(bars),
            sma_slow: Sma::new(params.sma_slow).compute(bars),
            boll_upper: Bollinger::upper(params.boll_period, params.boll_multiplier).compute(bars),
            boll_mid: Bollinger::middle(params.boll_period, params.boll_multiplier).compute(bars),
            boll_lower: Bollinger::lower(params.boll_period, params.boll_multiplier).compute(bars),
            donchian_high: Donchian::high(params.donchian_entry).compute(bars),
            donchian_low: Donchian::low(params.donchian_exit).compute(bars),
            len: bars.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn value_at(series: &[f64], index: usize) -> Option<f64> {
        series.get(index).copied().filter(|v| !v.is_nan())
    }

    /// Donchian channel at a bar index, or `None` while either Donchian
    /// window is still warming up. Independent of the SMA/Bollinger
    /// windows.
    pub fn donchian_at(&self, index: usize) -> Option<DonchianChannel> {
        Some(DonchianChannel {
            high: Self::value_at(&self.donchian_high, index)?,
            low: Self::value_at(&self.donchian_low, index)?,
        })
    }

    /// Bollinger bands at a bar index, or `None` while the band window is
    /// still warming up. Independent of the SMA/Donchian windows.
    pub fn bollinger_at(&self, index: usize) -> Option<BollingerValues> {
        Some(BollingerValues {
            upper: Self::value_at(&self.boll_upper, index)?,
            mid: Self::value_at(&self.boll_mid, index)?,
            lower: Self::value_at(&self.boll_lower, index)?,
        })
    }

    /// Frame at a bar index, or `None` while any series is still warming up.
    pub fn frame_at(&self, index: usize) -> Option<IndicatorFrame> {
        if index >= self.len {
            return None;
        }
        let frame = IndicatorFrame {
            sma_fast: self.sma_fast[index],
            sma_slow: self.sma_slow[index],
            boll_upper: self.boll_upper[index],
            boll_mid: self.boll_mid[index],
            boll_lower: self.boll_lower[index],
            donchian_high: self.donchian_high[index],
            donchian_low: self.donchian_low[index],
        };
        let warm = !frame.sma_fast.is_nan()
            && !frame.sma_slow.is_nan()
            && !frame.boll_upper.is_nan()
            && !frame.boll_mid.is_nan()
            && !frame.boll_lower.is_nan()
            && !frame.donchian_high.is_nan()
            && !frame.donchian_low.is_nan();
        warm.then_some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn small_params() -> IndicatorParams {
        IndicatorParams {
            sma_fast: 3,
            sma_slow: 5,
            boll_period: 5,
            boll_multiplier: 2.0,
            donchian_entry: 5,
            donchian_exit: 3,
        }
    }

    #[test]
    fn no_frame_before_warmup() {
        let closes: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
        let set = IndicatorSet::compute(&make_bars(&closes), &small_params());

        // Donchian entry window of 5 excludes the current bar, so the first
        // frame is at index 5, one past the SMA/Bollinger warmup of 4.
        for i in 0..5 {
            assert!(set.frame_at(i).is_none(), "unexpected frame at index {i}");
        }
        assert!(set.frame_at(5).is_some());
    }

    #[test]
    fn warmup_bars_matches_first_frame() {
        let params = small_params();
        let closes: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
        let set = IndicatorSet::compute(&make_bars(&closes), &params);
        let warmup = params.warmup_bars();
        assert!(set.frame_at(warmup).is_some());
        assert!(set.frame_at(warmup - 1).is_none());
    }

    #[test]
    fn boundary_exactly_n_minus_1_bars_has_no_frame() {
        let params = small_params();
        let closes: Vec<f64> = (0..params.warmup_bars()).map(|i| 100.0 + i as f64).collect();
        let set = IndicatorSet::compute(&make_bars(&closes), &params);
        assert!((0..set.len()).all(|i| set.frame_at(i).is_none()));
    }

    #[test]
    fn frame_values_match_series() {
        let closes: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
        let set = IndicatorSet::compute(&make_bars(&closes), &small_params());
        let frame = set.frame_at(6).unwrap();
        // sma_fast(3) at index 6 = mean(104, 105, 106)
        assert!((frame.sma_fast - 105.0).abs() < 1e-10);
        // boll_mid(5) at index 6 = mean(102..=106)
        assert!((frame.boll_mid - 104.0).abs() < 1e-10);
        assert!(frame.boll_upper >= frame.boll_mid);
        assert!(frame.boll_lower <= frame.boll_mid);
    }

    #[test]
    fn out_of_bounds_index_is_none() {
        let set = IndicatorSet::compute(&make_bars(&[100.0; 10]), &small_params());
        assert!(set.frame_at(10).is_none());
        assert!(set.donchian_at(10).is_none());
        assert!(set.bollinger_at(10).is_none());
    }

    #[test]
    fn donchian_warm_before_slow_sma() {
        // Donchian windows of 5/3 are warm at index 5; the 8-bar SMA and
        // band windows are not, so the full frame is still None there.
        let mut params = small_params();
        params.sma_slow = 8;
        params.boll_period = 8;
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let set = IndicatorSet::compute(&make_bars(&closes), &params);

        assert!(set.donchian_at(4).is_none());
        let channel = set.donchian_at(5).unwrap();
        // Prior 5-bar high at index 5 = high of bar 4 = 105.
        assert!((channel.high - 105.0).abs() < 1e-10);
        assert!(set.frame_at(5).is_none());
    }

    #[test]
    fn bollinger_warm_before_donchian() {
        let mut params = small_params();
        params.boll_period = 3;
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let set = IndicatorSet::compute(&make_bars(&closes), &params);

        let bands = set.bollinger_at(3).unwrap();
        // mid(3) at index 3 = mean(101, 102, 103)
        assert!((bands.mid - 102.0).abs() < 1e-10);
        assert!(set.donchian_at(3).is_none());
        assert!(set.frame_at(3).is_none());
    }
}
