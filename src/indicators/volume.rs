// =============================================================================
// Volume Indicators — OBV, A/D Line, Chaikin Money Flow, VWAP
// =============================================================================
//
// OBV, A/D Line and VWAP are cumulative: one forward pass carrying a running
// accumulator, so row `i` depends on rows `0..=i` only.
//
//   OBV_0 = 0
//   OBV_t = OBV_{t-1} + V   if close rises
//         = OBV_{t-1} - V   if close falls
//         = OBV_{t-1}       otherwise
//
//   MFM   = ((C - L) - (H - C)) / (H - L)      undefined when H == L
//   MFV   = MFM * V
//   AD    = running sum of MFV (undefined rows are skipped, not propagated)
//   CMF   = Σ(MFV, p) / Σ(V, p)
//
//   TP    = (H + L + C) / 3
//   VWAP  = Σ(TP * V) / Σ(V)                   running sums from row 0
// =============================================================================

use crate::enriched::Column;
use crate::indicators::window::{cumsum, rolling_sum, safe_div};
use crate::market_data::CandleSeries;

/// On-Balance Volume series.
pub fn calculate_obv(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(closes.len());
    let mut obv = 0.0;
    for i in 0..closes.len() {
        if i > 0 {
            if closes[i] > closes[i - 1] {
                obv += volumes[i];
            } else if closes[i] < closes[i - 1] {
                obv -= volumes[i];
            }
        }
        out.push(obv);
    }
    out
}

/// Money Flow Volume per row.
pub fn money_flow_volume(series: &CandleSeries) -> Vec<f64> {
    (0..series.len())
        .map(|i| {
            let (h, l, c) = (series.high()[i], series.low()[i], series.close()[i]);
            let multiplier = safe_div((c - l) - (h - c), h - l);
            multiplier * series.volume()[i]
        })
        .collect()
}

/// Typical price `(H + L + C) / 3` per row.
pub fn typical_price(series: &CandleSeries) -> Vec<f64> {
    (0..series.len())
        .map(|i| (series.high()[i] + series.low()[i] + series.close()[i]) / 3.0)
        .collect()
}

pub fn calculate_vwap(series: &CandleSeries) -> Vec<f64> {
    let tp = typical_price(series);
    let tp_volume: Vec<f64> = tp.iter().zip(series.volume()).map(|(p, v)| p * v).collect();
    let cum_tp_volume = cumsum(&tp_volume);
    let cum_volume = cumsum(series.volume());
    cum_tp_volume
        .iter()
        .zip(&cum_volume)
        .map(|(&pv, &v)| safe_div(pv, v))
        .collect()
}

pub fn obv(series: &CandleSeries) -> Vec<Column> {
    vec![Column::new(
        "OBV",
        calculate_obv(series.close(), series.volume()),
    )]
}

pub fn al(series: &CandleSeries) -> Vec<Column> {
    vec![Column::new("AD_Line", cumsum(&money_flow_volume(series)))]
}

pub fn cmf(series: &CandleSeries, period: usize) -> Vec<Column> {
    let mfv_sum = rolling_sum(&money_flow_volume(series), period);
    let volume_sum = rolling_sum(series.volume(), period);
    let values = mfv_sum
        .iter()
        .zip(&volume_sum)
        .map(|(&m, &v)| safe_div(m, v))
        .collect();
    vec![Column::new(format!("CMF_{period}"), values)]
}

pub fn vwap(series: &CandleSeries) -> Vec<Column> {
    vec![Column::new("VWAP", calculate_vwap(series))]
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::candle::fixtures::{assert_close, series_hlcv};

    #[test]
    fn obv_flat_closes_stay_zero() {
        assert_eq!(calculate_obv(&[10.0, 10.0, 10.0], &[5.0, 6.0, 7.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn obv_rises_and_falls_with_close() {
        let obv = calculate_obv(&[10.0, 11.0, 9.0, 9.0, 12.0], &[100.0, 200.0, 50.0, 70.0, 30.0]);
        assert_eq!(obv, vec![0.0, 200.0, 150.0, 150.0, 180.0]);
    }

    #[test]
    fn obv_monotone_for_rising_closes() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let obv = calculate_obv(&closes, &[3.0; 20]);
        assert!(obv.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn obv_empty() {
        assert!(calculate_obv(&[], &[]).is_empty());
    }

    #[test]
    fn vwap_two_row_scenario() {
        let series = series_hlcv(&[(12.0, 8.0, 10.0, 100.0), (22.0, 18.0, 20.0, 200.0)]);
        let col = &vwap(&series)[0];
        assert_eq!(col.name, "VWAP");
        assert_close(col.values[0], 10.0);
        assert_close(col.values[1], 5000.0 / 300.0);
    }

    #[test]
    fn vwap_zero_volume_prefix_is_undefined() {
        let series = series_hlcv(&[(12.0, 8.0, 10.0, 0.0), (22.0, 18.0, 20.0, 10.0)]);
        let v = calculate_vwap(&series);
        assert!(v[0].is_nan());
        assert_close(v[1], 20.0);
    }

    #[test]
    fn ad_line_accumulates_and_skips_zero_range_rows() {
        let series = series_hlcv(&[
            (10.0, 0.0, 10.0, 100.0), // MFM = 1  -> +100
            (10.0, 10.0, 10.0, 50.0), // H == L    -> undefined
            (10.0, 0.0, 0.0, 40.0),   // MFM = -1 -> -40
        ]);
        let ad = &al(&series)[0];
        assert_eq!(ad.name, "AD_Line");
        assert_close(ad.values[0], 100.0);
        assert!(ad.values[1].is_nan());
        assert_close(ad.values[2], 60.0);
    }

    #[test]
    fn cmf_known_values() {
        let series = series_hlcv(&[
            (10.0, 0.0, 10.0, 100.0), // MFV  100
            (10.0, 0.0, 5.0, 100.0),  // MFV    0
            (10.0, 0.0, 0.0, 200.0),  // MFV -200
        ]);
        let col = &cmf(&series, 2)[0];
        assert_eq!(col.name, "CMF_2");
        assert!(col.values[0].is_nan());
        assert_close(col.values[1], 0.5);
        assert_close(col.values[2], -200.0 / 300.0);
    }
}
