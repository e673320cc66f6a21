// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator functions.  Each takes a `CandleSeries`
// (plus a period where applicable) and returns the new columns it adds.
// Undefined values are NaN; the finalizer maps them to 0 on output.

pub mod window;

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod channels;
pub mod ema;
pub mod ichimoku;
pub mod pivot;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volume;
