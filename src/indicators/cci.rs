// =============================================================================
// Commodity Channel Index (CCI)
// =============================================================================
//
//   TP  = (H + L + C) / 3
//   CCI = (TP - SMA(TP, p)) / (0.015 * MAD(TP, p))
//
// MAD is the mean absolute deviation of the window around its own mean.  A
// window of identical typical prices has MAD == 0 and is undefined.

use crate::enriched::Column;
use crate::indicators::volume::typical_price;
use crate::indicators::window::{rolling_mean, rolling_mean_abs_dev, safe_div};
use crate::market_data::CandleSeries;

/// Lambert's constant: scales CCI so most values fall inside ±100.
pub const CCI_CONSTANT: f64 = 0.015;

pub fn calculate_cci(series: &CandleSeries, period: usize) -> Vec<f64> {
    let tp = typical_price(series);
    let sma = rolling_mean(&tp, period);
    let mad = rolling_mean_abs_dev(&tp, period);
    (0..tp.len())
        .map(|i| safe_div(tp[i] - sma[i], CCI_CONSTANT * mad[i]))
        .collect()
}

pub fn cci(series: &CandleSeries, period: usize) -> Vec<Column> {
    vec![Column::new(format!("CCI_{period}"), calculate_cci(series, period))]
}
