// =============================================================================
// Rate of Change (ROC) & Momentum (MOM)
// =============================================================================
//
// Both compare the close with the close `period` rows back:
//   ROC = ((close - close_n) / close_n) * 100
//   MOM =   close - close_n
//
// Positive values indicate upward momentum; negative indicates downward.
// Rows with fewer than `period` predecessors are undefined.

use crate::enriched::Column;
use crate::indicators::window::safe_div;
use crate::market_data::CandleSeries;

/// Calculate the Rate of Change for the given closing prices and period.
///
/// A zero reference close yields an undefined value.
pub fn calculate_roc(closes: &[f64], period: usize) -> Vec<f64> {
    lagged(closes, period, |now, prev| safe_div(now - prev, prev) * 100.0)
}

/// Calculate plain momentum (`close - close_n`).
pub fn calculate_mom(closes: &[f64], period: usize) -> Vec<f64> {
    lagged(closes, period, |now, prev| now - prev)
}

fn lagged(closes: &[f64], period: usize, f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    (0..closes.len())
        .map(|i| {
            if i < period {
                f64::NAN
            } else {
                f(closes[i], closes[i - period])
            }
        })
        .collect()
}

pub fn roc(series: &CandleSeries, period: usize) -> Vec<Column> {
    vec![Column::new(
        format!("ROC_{period}"),
        calculate_roc(series.close(), period),
    )]
}

pub fn mom(series: &CandleSeries, period: usize) -> Vec<Column> {
    vec![Column::new(
        format!("MOM_{period}"),
        calculate_mom(series.close(), period),
    )]
}
