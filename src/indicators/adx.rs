// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. hd = High_t - High_{t-1},  ld = Low_t - Low_{t-1}
//   2. +DM = hd   if hd > ld and hd > 0, else 0
//      -DM = -ld  if ld > hd and ld > 0, else 0
//      (row 0 has no diffs and gets 0 for both)
//   3. True Range per bar (undefined at row 0).
//   4. +DI = 100 * mean(+DM, p) / mean(TR, p)
//      -DI = 100 * mean(-DM, p) / mean(TR, p)
//   5. DX  = 100 * |+DI - -DI| / (+DI + -DI)
//   6. ADX = mean(DX, p)
//
// All smoothing is a simple rolling mean.  TR is undefined at row 0, so DX is
// first defined at row `p` and ADX at row `2p - 1`.
//
// Interpretation:
//   ADX > 25  => trending market
//   ADX < 20  => ranging / choppy market
// =============================================================================

use crate::enriched::Column;
use crate::indicators::atr::true_range;
use crate::indicators::window::{diff, rolling_mean, safe_div};
use crate::market_data::CandleSeries;

/// Raw directional movement columns `(+DM, -DM)`.
pub fn directional_movement(high: &[f64], low: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let hd = diff(high);
    let ld = diff(low);

    let plus_dm = hd
        .iter()
        .zip(&ld)
        .map(|(&h, &l)| if h > l && h > 0.0 { h } else { 0.0 })
        .collect();
    let minus_dm = hd
        .iter()
        .zip(&ld)
        .map(|(&h, &l)| if l > h && l > 0.0 { -l } else { 0.0 })
        .collect();

    (plus_dm, minus_dm)
}

/// Compute the full ADX series.
pub fn calculate_adx(series: &CandleSeries, period: usize) -> Vec<f64> {
    let (plus_dm, minus_dm) = directional_movement(series.high(), series.low());
    let tr = true_range(series.high(), series.low(), series.close());

    let mean_tr = rolling_mean(&tr, period);
    let mean_plus = rolling_mean(&plus_dm, period);
    let mean_minus = rolling_mean(&minus_dm, period);

    let dx: Vec<f64> = (0..series.len())
        .map(|i| {
            let plus_di = 100.0 * safe_div(mean_plus[i], mean_tr[i]);
            let minus_di = 100.0 * safe_div(mean_minus[i], mean_tr[i]);
            100.0 * safe_div((plus_di - minus_di).abs(), plus_di + minus_di)
        })
        .collect();

    rolling_mean(&dx, period)
}

pub fn adx(series: &CandleSeries, period: usize) -> Vec<Column> {
    vec![Column::new(format!("ADX_{period}"), calculate_adx(series, period))]
}
