//! Donchian Channel — highest high / lowest low over the *prior* window.
//!
//! The window deliberately excludes the current bar: a breakout must exceed
//! the extreme of the previous `period` bars, not an extreme that already
//! includes today. Two series, exposed as separate Indicator instances:
//! - High: max(high[t-period..t])
//! - Low:  min(low[t-period..t])
//!
//! Lookback: period (one bar later than an inclusive-window channel).

use super::Indicator;
use crate::domain::Bar;

/// Which band of the Donchian channel to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonchianBand {
    High,
    Low,
}

#[derive(Debug, Clone)]
pub struct Donchian {
    period: usize,
    band: DonchianBand,
    name: String,
}

impl Donchian {
    pub fn high(period: usize) -> Self {
        assert!(period >= 1, "Donchian period must be >= 1");
        Self {
            period,
            band: DonchianBand::High,
            name: format!("donchian_high_{period}"),
        }
    }

    pub fn low(period: usize) -> Self {
        assert!(period >= 1, "Donchian period must be >= 1");
        Self {
            period,
            band: DonchianBand::Low,
            name: format!("donchian_low_{period}"),
        }
    }
}

impl Indicator for Donchian {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period..n {
            // Window [i - period, i): the current bar is excluded.
            let window = &bars[i - self.period..i];
            result[i] = match self.band {
                DonchianBand::High => window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max),
                DonchianBand::Low => window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min),
            };
        }

        result
    }
}
