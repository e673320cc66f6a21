// =============================================================================
// Request Dispatcher — indicator keys, parameters and the evaluation plan
// =============================================================================
//
// Keys form a closed set.  Each key maps to a plain function pointer in the
// indicator library, and the plan order is fixed:
//
//   1. periodic   ema sma roc rsi wil atr mom so bb cmo dc cmf cci adx kc
//                 (periods in request order)
//   2. macd       triples in request order
//   3. flags      al tr obv ic pp vwap
//
// All parameter errors are raised while parsing, before any computation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::enriched::Column;
use crate::error::{EngineError, Result};
use crate::indicators::{
    adx, atr, bollinger, cci, channels, ema, ichimoku, pivot, roc, rsi, sma, stochastic, volume,
};
use crate::market_data::CandleSeries;
use crate::projection::Projection;

pub type PeriodicFn = fn(&CandleSeries, usize) -> Vec<Column>;
pub type FlagFn = fn(&CandleSeries) -> Vec<Column>;

const DROP_COLUMNS: &str = "drop_columns";
const ONLY_COLUMNS: &str = "only_columns";

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Indicators parameterised by a single window length.
///
/// Variant order is the application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Periodic {
    Ema,
    Sma,
    Roc,
    Rsi,
    Wil,
    Atr,
    Mom,
    So,
    Bb,
    Cmo,
    Dc,
    Cmf,
    Cci,
    Adx,
    Kc,
}

impl Periodic {
    pub const ALL: [Periodic; 15] = [
        Self::Ema,
        Self::Sma,
        Self::Roc,
        Self::Rsi,
        Self::Wil,
        Self::Atr,
        Self::Mom,
        Self::So,
        Self::Bb,
        Self::Cmo,
        Self::Dc,
        Self::Cmf,
        Self::Cci,
        Self::Adx,
        Self::Kc,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Ema => "ema",
            Self::Sma => "sma",
            Self::Roc => "roc",
            Self::Rsi => "rsi",
            Self::Wil => "wil",
            Self::Atr => "atr",
            Self::Mom => "mom",
            Self::So => "so",
            Self::Bb => "bb",
            Self::Cmo => "cmo",
            Self::Dc => "dc",
            Self::Cmf => "cmf",
            Self::Cci => "cci",
            Self::Adx => "adx",
            Self::Kc => "kc",
        }
    }

    pub fn function(self) -> PeriodicFn {
        match self {
            Self::Ema => ema::ema,
            Self::Sma => sma::sma,
            Self::Roc => roc::roc,
            Self::Rsi => rsi::rsi,
            Self::Wil => stochastic::wil,
            Self::Atr => atr::atr,
            Self::Mom => roc::mom,
            Self::So => stochastic::so,
            Self::Bb => bollinger::bb,
            Self::Cmo => rsi::cmo,
            Self::Dc => channels::dc,
            Self::Cmf => volume::cmf,
            Self::Cci => cci::cci,
            Self::Adx => adx::adx,
            Self::Kc => channels::kc,
        }
    }
}

/// Parameterless indicators switched on by a boolean.
///
/// Variant order is the application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    Al,
    Tr,
    Obv,
    Ic,
    Pp,
    Vwap,
}

impl Flag {
    pub const ALL: [Flag; 6] = [Self::Al, Self::Tr, Self::Obv, Self::Ic, Self::Pp, Self::Vwap];

    pub fn key(self) -> &'static str {
        match self {
            Self::Al => "al",
            Self::Tr => "tr",
            Self::Obv => "obv",
            Self::Ic => "ic",
            Self::Pp => "pp",
            Self::Vwap => "vwap",
        }
    }

    pub fn function(self) -> FlagFn {
        match self {
            Self::Al => volume::al,
            Self::Tr => atr::tr,
            Self::Obv => volume::obv,
            Self::Ic => ichimoku::ic,
            Self::Pp => pivot::pp,
            Self::Vwap => volume::vwap,
        }
    }
}

/// Any request key that names an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorKey {
    Periodic(Periodic),
    Macd,
    Flag(Flag),
}

impl IndicatorKey {
    /// Every key, in application order.
    pub fn all() -> Vec<IndicatorKey> {
        Periodic::ALL
            .iter()
            .map(|&p| Self::Periodic(p))
            .chain(std::iter::once(Self::Macd))
            .chain(Flag::ALL.iter().map(|&f| Self::Flag(f)))
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Periodic(p) => p.key(),
            Self::Macd => "macd",
            Self::Flag(f) => f.key(),
        }
    }
}

impl FromStr for IndicatorKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| EngineError::UnknownIndicator(s.to_string()))
    }
}

impl fmt::Display for IndicatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MACD parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    pub short: usize,
    pub long: usize,
    pub signal: usize,
}

impl MacdParams {
    pub fn new(short: usize, long: usize, signal: usize) -> Result<Self> {
        if short == 0 || long == 0 || signal == 0 {
            return Err(macd_format_error());
        }
        Ok(Self {
            short,
            long,
            signal,
        })
    }
}

fn macd_format_error() -> EngineError {
    EngineError::Parameter("Invalid format for MACD. Provide 'short,long,signal'.".into())
}

impl FromStr for MacdParams {
    type Err = EngineError;

    /// `"short,long,signal"`: exactly three positive integers.
    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<usize>().map_err(|_| macd_format_error()))
            .collect::<Result<Vec<_>>>()?;
        match parts.as_slice() {
            &[short, long, signal] => Self::new(short, long, signal),
            _ => Err(macd_format_error()),
        }
    }
}

impl fmt::Display for MacdParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.short, self.long, self.signal)
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// One indicator application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorCall {
    Periodic(Periodic, usize),
    Macd(MacdParams),
    Flag(Flag),
}

impl IndicatorCall {
    pub fn compute(&self, series: &CandleSeries) -> Vec<Column> {
        match *self {
            Self::Periodic(kind, period) => (kind.function())(series, period),
            Self::Macd(p) => ema::macd(series, p.short, p.long, p.signal),
            Self::Flag(flag) => (flag.function())(series),
        }
    }
}

impl fmt::Display for IndicatorCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Periodic(kind, period) => write!(f, "{}({period})", kind.key()),
            Self::Macd(p) => write!(f, "macd({p})"),
            Self::Flag(flag) => f.write_str(flag.key()),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A validated indicator query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorRequest {
    periodic: BTreeMap<Periodic, Vec<usize>>,
    macd: Vec<MacdParams>,
    flags: BTreeSet<Flag>,
    projection: Projection,
}

impl IndicatorRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(mut self, kind: Periodic, period: usize) -> Result<Self> {
        if period == 0 {
            return Err(EngineError::Parameter(format!(
                "period for `{}` must be a positive integer",
                kind.key()
            )));
        }
        self.periodic.entry(kind).or_default().push(period);
        Ok(self)
    }

    pub fn macd(mut self, params: MacdParams) -> Self {
        self.macd.push(params);
        self
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Parse the JSON query object, e.g.
    /// `{"sma": [5, 10], "macd": ["12,26,9"], "obv": true, "drop_columns": ["Volume"]}`.
    ///
    /// A scalar is accepted where a list is expected and `null` counts as
    /// absent.
    pub fn from_query(query: &Map<String, Value>) -> Result<Self> {
        let mut request = Self::new();
        let mut drop = Vec::new();
        let mut only = Vec::new();

        for (name, value) in query {
            if value.is_null() {
                continue;
            }
            match name.to_ascii_lowercase().as_str() {
                DROP_COLUMNS => drop.extend(string_list(name, value)?),
                ONLY_COLUMNS => only.extend(string_list(name, value)?),
                _ => match name.parse::<IndicatorKey>()? {
                    IndicatorKey::Periodic(kind) => {
                        for item in as_list(value) {
                            request = request.period(kind, parse_period(kind, item)?)?;
                        }
                    }
                    IndicatorKey::Macd => {
                        for item in as_list(value) {
                            let spec = item.as_str().ok_or_else(macd_format_error)?;
                            request = request.macd(spec.parse()?);
                        }
                    }
                    IndicatorKey::Flag(flag) => match value {
                        Value::Bool(true) => request = request.flag(flag),
                        Value::Bool(false) => {}
                        other => {
                            return Err(EngineError::Parameter(format!(
                                "`{name}` must be a boolean, got {other}"
                            )))
                        }
                    },
                },
            }
        }

        Ok(request.with_projection(Projection::from_lists(drop, only)?))
    }

    /// Calls in application order.
    pub fn plan(&self) -> Vec<IndicatorCall> {
        let periodic = self
            .periodic
            .iter()
            .flat_map(|(&kind, periods)| periods.iter().map(move |&p| IndicatorCall::Periodic(kind, p)));
        let macd = self.macd.iter().map(|&p| IndicatorCall::Macd(p));
        let flags = self.flags.iter().map(|&f| IndicatorCall::Flag(f));
        periodic.chain(macd).chain(flags).collect()
    }
}

fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn string_list(name: &str, value: &Value) -> Result<Vec<String>> {
    as_list(value)
        .into_iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| EngineError::Parameter(format!("`{name}` entries must be strings")))
        })
        .collect()
}

fn parse_period(kind: Periodic, value: &Value) -> Result<usize> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .filter(|&p| p > 0)
        .and_then(|p| usize::try_from(p).ok())
        .ok_or_else(|| {
            EngineError::Parameter(format!(
                "period for `{}` must be a positive integer, got {value}",
                kind.key()
            ))
        })
}
