// =============================================================================
// Price Channels — Donchian & Keltner
// =============================================================================
//
// Donchian:
//   Upper = max(High, p),  Lower = min(Low, p),  Mid = (Upper + Lower) / 2
//
// Keltner:
//   Middle = SMA(close, p)          (a simple, not exponential, average)
//   Upper  = Middle + 2 * ATR(p)
//   Lower  = Middle - 2 * ATR(p)
//
// ATR uses the previous-close True Range, so Keltner bands are first defined
// at row `p` while the middle band is defined from row `p - 1`.

use crate::enriched::Column;
use crate::indicators::atr::calculate_atr;
use crate::indicators::window::{rolling_max, rolling_mean, rolling_min};
use crate::market_data::CandleSeries;

/// ATR multiplier for the Keltner envelope.
pub const KELTNER_MULTIPLIER: f64 = 2.0;

pub fn dc(series: &CandleSeries, period: usize) -> Vec<Column> {
    let upper = rolling_max(series.high(), period);
    let lower = rolling_min(series.low(), period);
    let mid = upper.iter().zip(&lower).map(|(u, l)| (u + l) / 2.0).collect();

    vec![
        Column::new(format!("Donchian_Upper_{period}"), upper),
        Column::new(format!("Donchian_Lower_{period}"), lower),
        Column::new(format!("Donchian_Mid_{period}"), mid),
    ]
}

pub fn kc(series: &CandleSeries, period: usize) -> Vec<Column> {
    let middle = rolling_mean(series.close(), period);
    let atr = calculate_atr(series, period);
    let upper = middle
        .iter()
        .zip(&atr)
        .map(|(m, a)| m + KELTNER_MULTIPLIER * a)
        .collect();
    let lower = middle
        .iter()
        .zip(&atr)
        .map(|(m, a)| m - KELTNER_MULTIPLIER * a)
        .collect();

    vec![
        Column::new(format!("KC_Middle_Band_{period}"), middle),
        Column::new(format!("KC_Upper_Band_{period}"), upper),
        Column::new(format!("KC_Lower_Band_{period}"), lower),
    ]
}
