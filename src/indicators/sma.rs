// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_t = (close_{t-p+1} + ... + close_t) / p
//
// Undefined for the first `p - 1` rows.
// =============================================================================

use crate::enriched::Column;
use crate::indicators::window::rolling_mean;
use crate::market_data::CandleSeries;

/// `SMA_{period}` over the close column.
pub fn sma(series: &CandleSeries, period: usize) -> Vec<Column> {
    vec![Column::new(
        format!("SMA_{period}"),
        rolling_mean(series.close(), period),
    )]
}
