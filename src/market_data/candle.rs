use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::types::BaseField;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV candle as stored by the market-data table.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleRecord {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: DateTime<Utc>,
    pub quote_volume: f64,
    pub trades_count: u64,
    pub taker_buy_volume: f64,
    pub taker_buy_quote_volume: f64,
}

impl CandleRecord {
    /// Render one base field as a JSON scalar.
    pub fn field_value(&self, field: BaseField) -> Value {
        match field {
            BaseField::OpenTime => Value::String(format_timestamp(&self.open_time)),
            BaseField::Open => number(self.open),
            BaseField::High => number(self.high),
            BaseField::Low => number(self.low),
            BaseField::Close => number(self.close),
            BaseField::Volume => number(self.volume),
            BaseField::CloseTime => Value::String(format_timestamp(&self.close_time)),
            BaseField::QuoteAssetVolume => number(self.quote_volume),
            BaseField::NumberOfTrades => Value::from(self.trades_count),
            BaseField::TakerBuyBaseAssetVolume => number(self.taker_buy_volume),
            BaseField::TakerBuyQuoteAssetVolume => number(self.taker_buy_quote_volume),
        }
    }

    fn numeric_fields(&self) -> [(BaseField, f64); 8] {
        [
            (BaseField::Open, self.open),
            (BaseField::High, self.high),
            (BaseField::Low, self.low),
            (BaseField::Close, self.close),
            (BaseField::Volume, self.volume),
            (BaseField::QuoteAssetVolume, self.quote_volume),
            (BaseField::TakerBuyBaseAssetVolume, self.taker_buy_volume),
            (BaseField::TakerBuyQuoteAssetVolume, self.taker_buy_quote_volume),
        ]
    }
}

fn number(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or(Value::from(0.0), Value::Number)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
}

// ---------------------------------------------------------------------------
// CandleSeries -- validated, time-ordered, immutable
// ---------------------------------------------------------------------------

/// Ascending-by-`open_time` candle sequence.
///
/// Alongside the records the series keeps contiguous `f64` columns for the
/// fields indicators read (high, low, close, volume).
#[derive(Debug, Clone, Default)]
pub struct CandleSeries {
    records: Vec<CandleRecord>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl CandleSeries {
    /// Build a series from typed records.
    ///
    /// Rejects non-finite price/volume values and sorts by `open_time`
    /// (stable, so rows sharing an open time keep their relative order).
    pub fn new(mut records: Vec<CandleRecord>) -> Result<Self> {
        for (row, record) in records.iter().enumerate() {
            for (field, value) in record.numeric_fields() {
                if !value.is_finite() {
                    return Err(EngineError::validation(row, field.wire_name(), "is not finite"));
                }
            }
        }

        records.sort_by_key(|r| r.open_time);

        let high = records.iter().map(|r| r.high).collect();
        let low = records.iter().map(|r| r.low).collect();
        let close = records.iter().map(|r| r.close).collect();
        let volume = records.iter().map(|r| r.volume).collect();

        Ok(Self {
            records,
            high,
            low,
            close,
            volume,
        })
    }

    /// Ingest raw JSON rows as delivered by the market-data store.
    ///
    /// Every row must be an object carrying all eleven schema fields.
    pub fn from_rows(rows: &[Value]) -> Result<Self> {
        let records = rows
            .iter()
            .enumerate()
            .map(|(row, value)| parse_row(row, value))
            .collect::<Result<Vec<_>>>()?;

        debug!(rows = records.len(), "candle rows ingested");
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CandleRecord] {
        &self.records
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> &[f64] {
        &self.volume
    }
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

fn parse_row(row: usize, value: &Value) -> Result<CandleRecord> {
    let obj = value
        .as_object()
        .ok_or_else(|| EngineError::validation(row, "*", "row is not a JSON object"))?;

    Ok(CandleRecord {
        open_time: parse_timestamp(obj, row, BaseField::OpenTime)?,
        open: parse_f64(obj, row, BaseField::Open)?,
        high: parse_f64(obj, row, BaseField::High)?,
        low: parse_f64(obj, row, BaseField::Low)?,
        close: parse_f64(obj, row, BaseField::Close)?,
        volume: parse_f64(obj, row, BaseField::Volume)?,
        close_time: parse_timestamp(obj, row, BaseField::CloseTime)?,
        quote_volume: parse_f64(obj, row, BaseField::QuoteAssetVolume)?,
        trades_count: parse_u64(obj, row, BaseField::NumberOfTrades)?,
        taker_buy_volume: parse_f64(obj, row, BaseField::TakerBuyBaseAssetVolume)?,
        taker_buy_quote_volume: parse_f64(obj, row, BaseField::TakerBuyQuoteAssetVolume)?,
    })
}

/// Find `field` in a row, accepting any spelling [`BaseField::lookup`] accepts.
fn lookup<'a>(obj: &'a Map<String, Value>, row: usize, field: BaseField) -> Result<&'a Value> {
    obj.get(field.wire_name())
        .or_else(|| {
            obj.iter()
                .find(|(k, _)| BaseField::lookup(k) == Some(field))
                .map(|(_, v)| v)
        })
        .filter(|v| !v.is_null())
        .ok_or_else(|| EngineError::validation(row, field.wire_name(), "is missing"))
}

/// Exchange feeds send decimals as JSON strings; accept both forms.
fn parse_f64(obj: &Map<String, Value>, row: usize, field: BaseField) -> Result<f64> {
    let name = field.wire_name();
    let value = match lookup(obj, row, field)? {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| EngineError::validation(row, name, format!("is not numeric: {s:?}")))?,
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| EngineError::validation(row, name, "is not a valid f64"))?,
        _ => return Err(EngineError::validation(row, name, "has unexpected JSON type")),
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::validation(row, name, "is not finite"))
    }
}

fn parse_u64(obj: &Map<String, Value>, row: usize, field: BaseField) -> Result<u64> {
    let name = field.wire_name();
    let parsed = match lookup(obj, row, field)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| EngineError::validation(row, name, "is not a non-negative integer"))
}

fn parse_timestamp(obj: &Map<String, Value>, row: usize, field: BaseField) -> Result<DateTime<Utc>> {
    let name = field.wire_name();
    let parsed = match lookup(obj, row, field)? {
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    };
    parsed.ok_or_else(|| EngineError::validation(row, name, "is not a valid timestamp"))
}

/// Epoch milliseconds, RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS[.fff]` taken
/// as UTC.
fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ms) = s.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp_millis(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
