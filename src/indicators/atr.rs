// =============================================================================
// True Range (TR) & Average True Range (ATR)
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// Row 0 has no previous close, so its TR is undefined.
//
// ATR is the simple rolling mean of TR over `period` rows; because TR is
// undefined at row 0, the first defined ATR sits at row `period`.
// =============================================================================

use crate::enriched::Column;
use crate::indicators::window::rolling_mean;
use crate::market_data::CandleSeries;

/// Per-row True Range; row 0 is undefined.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    (0..close.len())
        .map(|i| {
            if i == 0 {
                return f64::NAN;
            }
            let prev_close = close[i - 1];
            let hl = high[i] - low[i];
            let hc = (high[i] - prev_close).abs();
            let lc = (low[i] - prev_close).abs();
            hl.max(hc).max(lc)
        })
        .collect()
}

/// Compute the ATR series for the given candles.
pub fn calculate_atr(series: &CandleSeries, period: usize) -> Vec<f64> {
    let tr = true_range(series.high(), series.low(), series.close());
    rolling_mean(&tr, period)
}

pub fn tr(series: &CandleSeries) -> Vec<Column> {
    vec![Column::new(
        "TR",
        true_range(series.high(), series.low(), series.close()),
    )]
}

pub fn atr(series: &CandleSeries, period: usize) -> Vec<Column> {
    vec![Column::new(format!("ATR_{period}"), calculate_atr(series, period))]
}
