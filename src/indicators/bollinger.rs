// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + 2σ),
// and a lower band (SMA - 2σ), where σ is the *sample* standard deviation of
// the closes in the window.

use crate::enriched::Column;
use crate::indicators::window::{rolling_mean, rolling_std};
use crate::market_data::CandleSeries;

/// Band width in standard deviations.
pub const NUM_STD: f64 = 2.0;

/// Bollinger band columns for one period.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// With `period == 1` the sample deviation is undefined, so both outer
/// bands are undefined while the middle band equals the close.
pub fn calculate_bollinger(closes: &[f64], period: usize) -> BollingerBands {
    let middle = rolling_mean(closes, period);
    let std_dev = rolling_std(closes, period);

    let upper = middle.iter().zip(&std_dev).map(|(m, s)| m + NUM_STD * s).collect();
    let lower = middle.iter().zip(&std_dev).map(|(m, s)| m - NUM_STD * s).collect();

    BollingerBands { upper, middle, lower }
}

/// `Middle_Band_p`, `Upper_Band_p`, `Lower_Band_p`.
pub fn bb(series: &CandleSeries, period: usize) -> Vec<Column> {
    let bands = calculate_bollinger(series.close(), period);
    vec![
        Column::new(format!("Middle_Band_{period}"), bands.middle),
        Column::new(format!("Upper_Band_{period}"), bands.upper),
        Column::new(format!("Lower_Band_{period}"), bands.lower),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::candle::fixtures::assert_close;

    #[test]
    fn bollinger_basic() {
        let closes = [1.0, 2.0, 3.0];
        let bb = calculate_bollinger(&closes, 3);
        assert!(bb.middle[1].is_nan());
        assert_close(bb.middle[2], 2.0);
        // sample std of 1,2,3 = 1
        assert_close(bb.upper[2], 4.0);
        assert_close(bb.lower[2], 0.0);
    }

    #[test]
    fn bollinger_flat() {
        let bb = calculate_bollinger(&[100.0; 20], 20);
        assert_close(bb.upper[19], 100.0);
        assert_close(bb.lower[19], 100.0);
    }

    #[test]
    fn bollinger_column_names() {
        let series = crate::market_data::candle::fixtures::series_from_closes(&[1.0; 25]);
        let names: Vec<_> = bb(&series, 20).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Middle_Band_20", "Upper_Band_20", "Lower_Band_20"]);
    }
}
