// =============================================================================
// Indicator Engine — library root
// =============================================================================
//
// Candle rows in, indicator-enriched rows out:
//
//   market_data  validated, time-ordered candle series
//   indicators   pure indicator functions (one module per family)
//   dispatch     request parsing and the fixed evaluation plan
//   enriched     base series plus computed columns, finalization
//   projection   drop_columns / only_columns
//   engine       plan execution, optionally fanned out on rayon
//   catalog      static indicator metadata
//   api          axum REST surface used by the binary
// =============================================================================

pub mod api;
pub mod app_state;
pub mod catalog;
pub mod dispatch;
pub mod engine;
pub mod enriched;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod projection;
pub mod runtime_config;
pub mod types;

pub use dispatch::{Flag, IndicatorCall, IndicatorKey, IndicatorRequest, MacdParams, Periodic};
pub use engine::Engine;
pub use enriched::{Column, EnrichedSeries, Row};
pub use error::{EngineError, Result};
pub use market_data::{CandleRecord, CandleSeries};
pub use projection::Projection;
pub use runtime_config::EngineConfig;
pub use types::BaseField;
