// =============================================================================
// Stochastic Oscillator (%K) & Williams %R
// =============================================================================
//
// Both place the close inside the `period`-row high/low range:
//
//   %K  = (close - LL) / (HH - LL) * 100
//   %R  = (HH - close) / (HH - LL) * -100
//
// where HH / LL are the highest high / lowest low of the window.  A window
// with HH == LL is undefined.

use crate::enriched::Column;
use crate::indicators::window::{rolling_max, rolling_min, safe_div};
use crate::market_data::CandleSeries;

pub fn calculate_stochastic_k(series: &CandleSeries, period: usize) -> Vec<f64> {
    let hh = rolling_max(series.high(), period);
    let ll = rolling_min(series.low(), period);
    (0..series.len())
        .map(|i| safe_div(series.close()[i] - ll[i], hh[i] - ll[i]) * 100.0)
        .collect()
}

pub fn calculate_williams_r(series: &CandleSeries, period: usize) -> Vec<f64> {
    let hh = rolling_max(series.high(), period);
    let ll = rolling_min(series.low(), period);
    (0..series.len())
        .map(|i| safe_div(hh[i] - series.close()[i], hh[i] - ll[i]) * -100.0)
        .collect()
}

pub fn so(series: &CandleSeries, period: usize) -> Vec<Column> {
    vec![Column::new(
        format!("SO_%K_{period}"),
        calculate_stochastic_k(series, period),
    )]
}

pub fn wil(series: &CandleSeries, period: usize) -> Vec<Column> {
    vec![Column::new(
        format!("WIL_{period}"),
        calculate_williams_r(series, period),
    )]
}
