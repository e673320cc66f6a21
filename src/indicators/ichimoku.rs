// =============================================================================
// Ichimoku Cloud
// =============================================================================
//
//   Tenkan-sen    = (max(H, 9)  + min(L, 9))  / 2
//   Kijun-sen     = (max(H, 26) + min(L, 26)) / 2
//   Senkou Span A = (Tenkan + Kijun) / 2          plotted 26 rows ahead
//   Senkou Span B = (max(H, 52) + min(L, 52)) / 2 plotted 26 rows ahead
//   Chikou Span   = Close                         plotted 26 rows back
//
// The forward shift leaves the first 26 span rows undefined; the backward
// shift leaves the last 26 Chikou rows undefined.  Chikou is the only column
// in the engine that reads future rows.

use crate::enriched::Column;
use crate::indicators::window::{rolling_max, rolling_min, shift};
use crate::market_data::CandleSeries;

pub const TENKAN_PERIOD: usize = 9;
pub const KIJUN_PERIOD: usize = 26;
pub const SENKOU_B_PERIOD: usize = 52;
pub const DISPLACEMENT: isize = 26;

fn midpoint(series: &CandleSeries, period: usize) -> Vec<f64> {
    let hh = rolling_max(series.high(), period);
    let ll = rolling_min(series.low(), period);
    hh.iter().zip(&ll).map(|(h, l)| (h + l) / 2.0).collect()
}

pub fn ic(series: &CandleSeries) -> Vec<Column> {
    let tenkan = midpoint(series, TENKAN_PERIOD);
    let kijun = midpoint(series, KIJUN_PERIOD);
    let span_a: Vec<f64> = tenkan.iter().zip(&kijun).map(|(t, k)| (t + k) / 2.0).collect();
    let span_b = midpoint(series, SENKOU_B_PERIOD);

    vec![
        Column::new("Tenkan_sen", tenkan),
        Column::new("Kijun_sen", kijun),
        Column::new("Senkou_Span_A", shift(&span_a, DISPLACEMENT)),
        Column::new("Senkou_Span_B", shift(&span_b, DISPLACEMENT)),
        Column::new("Chikou_Span", shift(series.close(), -DISPLACEMENT)),
    ]
}
