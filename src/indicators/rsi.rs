// =============================================================================
// Relative Strength Index (RSI) & Chande Momentum Oscillator (CMO)
// =============================================================================
//
// Both start from the close-to-close deltas, split into gains and losses:
//
//   gain_t = delta_t if delta_t > 0 else 0
//   loss_t = -delta_t if delta_t < 0 else 0
//
// Row 0 has no delta; it contributes a zero gain and a zero loss, so both
// indicators are defined from row `period - 1`.
//
// RSI (simple rolling means, not Wilder's smoothing):
//   RS  = mean(gain, p) / mean(loss, p)
//   RSI = 100 - 100 / (1 + RS)            undefined when mean(loss) == 0
//
// CMO (rolling sums):
//   CMO = (Σgain - Σloss) / (Σgain + Σloss) * 100
// =============================================================================

use crate::enriched::Column;
use crate::indicators::window::{diff, rolling_mean, rolling_sum, safe_div};
use crate::market_data::CandleSeries;

/// Split close deltas into (gains, losses), losses as positive magnitudes.
pub fn gains_and_losses(closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let deltas = diff(closes);
    let gains = deltas.iter().map(|&d| if d > 0.0 { d } else { 0.0 }).collect();
    let losses = deltas.iter().map(|&d| if d < 0.0 { -d } else { 0.0 }).collect();
    (gains, losses)
}

/// Compute the full RSI series for the given `closes` and `period`.
///
/// # Edge cases
/// - Rows before `period - 1` are undefined.
/// - Average loss of zero (no down moves in the window) is undefined.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let (gains, losses) = gains_and_losses(closes);
    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| {
            let rs = safe_div(g, l);
            100.0 - 100.0 / (1.0 + rs)
        })
        .collect()
}

/// Compute the Chande Momentum Oscillator.
///
/// A window without any movement (Σgain + Σloss == 0) is undefined.
pub fn calculate_cmo(closes: &[f64], period: usize) -> Vec<f64> {
    let (gains, losses) = gains_and_losses(closes);
    let sum_gain = rolling_sum(&gains, period);
    let sum_loss = rolling_sum(&losses, period);

    sum_gain
        .iter()
        .zip(&sum_loss)
        .map(|(&g, &l)| safe_div(g - l, g + l) * 100.0)
        .collect()
}

pub fn rsi(series: &CandleSeries, period: usize) -> Vec<Column> {
    vec![Column::new(
        format!("RSI_{period}"),
        calculate_rsi(series.close(), period),
    )]
}

pub fn cmo(series: &CandleSeries, period: usize) -> Vec<Column> {
    vec![Column::new(
        format!("CMO_{period}"),
        calculate_cmo(series.close(), period),
    )]
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::candle::fixtures::assert_close;

    #[test]
    fn gains_losses_treat_first_row_as_flat() {
        let (g, l) = gains_and_losses(&[10.0, 12.0, 11.0]);
        assert_eq!(g, vec![0.0, 2.0, 0.0]);
        assert_eq!(l, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn rsi_known_values() {
        // deltas: -, +2, -1, +3, -2
        let closes = [10.0, 12.0, 11.0, 14.0, 12.0];
        let rsi = calculate_rsi(&closes, 3);
        assert!(rsi[0].is_nan() && rsi[1].is_nan());
        // window rows 0..=2: gains 0,2,0 -> 2/3; losses 0,0,1 -> 1/3; RS = 2
        assert_close(rsi[2], 100.0 - 100.0 / 3.0);
        // rows 1..=3: gains 2,0,3 -> 5/3; losses 0,1,0 -> 1/3; RS = 5
        assert_close(rsi[3], 100.0 - 100.0 / 6.0);
        // rows 2..=4: gains 0,3,0 -> 1; losses 1,0,2 -> 1; RS = 1
        assert_close(rsi[4], 50.0);
    }

    #[test]
    fn rsi_without_losses_is_undefined() {
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 3);
        assert!(rsi.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_stays_in_range() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        for v in calculate_rsi(&closes, 14).into_iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(&v), "RSI out of range: {v}");
        }
    }

    #[test]
    fn cmo_known_values() {
        let closes = [10.0, 12.0, 11.0, 14.0, 12.0];
        let cmo = calculate_cmo(&closes, 3);
        assert!(cmo[1].is_nan());
        // Σg = 2, Σl = 1
        assert_close(cmo[2], 100.0 / 3.0);
        // Σg = 3, Σl = 3
        assert_close(cmo[4], 0.0);
    }

    #[test]
    fn cmo_flat_window_is_undefined() {
        let cmo = calculate_cmo(&[5.0, 5.0, 5.0], 2);
        assert!(cmo[1].is_nan() && cmo[2].is_nan());
    }
}
