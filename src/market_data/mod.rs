pub mod candle;

// Re-export for convenient access (e.g. `use crate::market_data::CandleSeries`).
pub use candle::{CandleRecord, CandleSeries};
