// =============================================================================
// Classic Floor Pivot Points
// =============================================================================
//
// Computed per row from that row's own high, low and close:
//
//   P  = (H + L + C) / 3
//   S1 = 2P - H        R1 = 2P - L
//   S2 = P - (H - L)   R2 = P + (H - L)

use crate::enriched::Column;
use crate::market_data::CandleSeries;

/// One row's pivot levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotLevels {
    pub pivot: f64,
    pub support_1: f64,
    pub resistance_1: f64,
    pub support_2: f64,
    pub resistance_2: f64,
}

impl PivotLevels {
    pub fn from_hlc(high: f64, low: f64, close: f64) -> Self {
        let pivot = (high + low + close) / 3.0;
        let range = high - low;
        Self {
            pivot,
            support_1: 2.0 * pivot - high,
            resistance_1: 2.0 * pivot - low,
            support_2: pivot - range,
            resistance_2: pivot + range,
        }
    }
}

pub fn pp(series: &CandleSeries) -> Vec<Column> {
    let n = series.len();
    let mut pivot = Vec::with_capacity(n);
    let mut s1 = Vec::with_capacity(n);
    let mut r1 = Vec::with_capacity(n);
    let mut s2 = Vec::with_capacity(n);
    let mut r2 = Vec::with_capacity(n);

    for i in 0..n {
        let levels = PivotLevels::from_hlc(series.high()[i], series.low()[i], series.close()[i]);
        pivot.push(levels.pivot);
        s1.push(levels.support_1);
        r1.push(levels.resistance_1);
        s2.push(levels.support_2);
        r2.push(levels.resistance_2);
    }

    vec![
        Column::new("Pivot", pivot),
        Column::new("Support_1", s1),
        Column::new("Resistance_1", r1),
        Column::new("Support_2", s2),
        Column::new("Resistance_2", r2),
    ]
}
