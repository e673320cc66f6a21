// =============================================================================
// Exponential Moving Average (EMA) & MACD
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
//   multiplier α = 2 / (period + 1)
//
// Two smoothing conventions are in use and both are kept as-is:
//
//   EMA_p   — bias-corrected weighting over all prior closes:
//               EMA_t = Σ (1-α)^i · close_{t-i} / Σ (1-α)^i
//             Defined from the very first row.
//
//   MACD    — plain recursion seeded with the first value:
//               E_0 = x_0,  E_t = (1-α)·E_{t-1} + α·x_t
//             MACD line = E_short(close) - E_long(close)
//             Signal    = E_signal(MACD line)
// =============================================================================

use crate::enriched::Column;
use crate::indicators::window::{ewm_adjusted, ewm_recursive};
use crate::market_data::CandleSeries;

/// Compute the bias-corrected EMA series for `closes`.
///
/// The output has the same length as the input; there is no warm-up gap.
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<f64> {
    ewm_adjusted(closes, period)
}

/// `EMA_{period}` over the close column.
pub fn ema(series: &CandleSeries, period: usize) -> Vec<Column> {
    vec![Column::new(
        format!("EMA_{period}"),
        calculate_ema(series.close(), period),
    )]
}

/// MACD line and signal line, both full-length.
pub fn calculate_macd(closes: &[f64], short: usize, long: usize, signal: usize) -> (Vec<f64>, Vec<f64>) {
    let fast = ewm_recursive(closes, short);
    let slow = ewm_recursive(closes, long);
    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal_line = ewm_recursive(&line, signal);
    (line, signal_line)
}

/// `MACD_Line_{short}_{long}` and `Signal_Line_{short}_{long}_{signal}`.
pub fn macd(series: &CandleSeries, short: usize, long: usize, signal: usize) -> Vec<Column> {
    let (line, signal_line) = calculate_macd(series.close(), short, long, signal);
    vec![
        Column::new(format!("MACD_Line_{short}_{long}"), line),
        Column::new(format!("Signal_Line_{short}_{long}_{signal}"), signal_line),
    ]
}
