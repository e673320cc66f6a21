// =============================================================================
// Enriched Series — base candles plus computed indicator columns
// =============================================================================
//
// The base series is shared (`Arc`) and never mutated.  Indicator output is
// kept columnar: one `Column` per computed series, in application order.
// Projection only hides base fields or removes computed columns; it never
// touches values.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::market_data::CandleSeries;
use crate::types::BaseField;

/// One named computed series, aligned 1:1 with the base records.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Output row: an ordered JSON object.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct EnrichedSeries {
    base: Arc<CandleSeries>,
    visible: Vec<BaseField>,
    columns: Vec<Column>,
}

impl EnrichedSeries {
    /// All eleven base fields visible, no computed columns.
    pub fn new(base: Arc<CandleSeries>) -> Self {
        Self {
            base,
            visible: BaseField::ALL.to_vec(),
            columns: Vec::new(),
        }
    }

    pub fn base(&self) -> &CandleSeries {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    pub fn visible_fields(&self) -> &[BaseField] {
        &self.visible
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Append computed columns.  A column whose name already exists replaces
    /// the old values in place and keeps its original position.
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        for column in columns {
            match self.columns.iter_mut().find(|c| c.name == column.name) {
                Some(existing) => existing.values = column.values,
                None => self.columns.push(column),
            }
        }
        self
    }

    /// Remove computed columns by exact name and hide base fields by schema
    /// name.  Names matching neither are ignored.
    pub fn without(mut self, names: &[String]) -> Self {
        for name in names {
            if let Some(pos) = self.columns.iter().position(|c| &c.name == name) {
                self.columns.remove(pos);
            } else if let Some(field) = BaseField::lookup(name) {
                self.visible.retain(|f| *f != field);
            }
        }
        self
    }

    /// Keep only the given base fields visible.  Computed columns stay.
    pub fn keep_base(mut self, fields: &[BaseField]) -> Self {
        self.visible.retain(|f| fields.contains(f));
        self
    }

    /// Serialize to ordered rows: visible base fields in schema order, then
    /// computed columns in application order.  NaN and ±∞ become 0.
    pub fn finalize(&self) -> Vec<Row> {
        self.base
            .records()
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let mut row = Map::with_capacity(self.visible.len() + self.columns.len());
                for &field in &self.visible {
                    row.insert(field.wire_name().to_string(), record.field_value(field));
                }
                for column in &self.columns {
                    row.insert(column.name.clone(), finite_or_zero(column.values[i]));
                }
                row
            })
            .collect()
    }
}

/// Undefined values become a float `0.0` so every computed column keeps a
/// single numeric type.
fn finite_or_zero(v: f64) -> Value {
    let v = if v.is_finite() { v } else { 0.0 };
    Value::from(v)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::candle::fixtures::series_from_closes;

    fn enriched() -> EnrichedSeries {
        EnrichedSeries::new(Arc::new(series_from_closes(&[1.0, 2.0])))
    }

    // ---- with_columns ----

    #[test]
    fn appends_in_order() {
        let e = enriched()
            .with_columns(vec![Column::new("A", vec![1.0, 2.0])])
            .with_columns(vec![Column::new("B", vec![3.0, 4.0])]);
        let names: Vec<_> = e.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn same_name_replaces_in_place() {
        let e = enriched()
            .with_columns(vec![
                Column::new("A", vec![1.0, 2.0]),
                Column::new("B", vec![3.0, 4.0]),
            ])
            .with_columns(vec![Column::new("A", vec![9.0, 9.0])]);
        assert_eq!(e.columns().len(), 2);
        assert_eq!(e.columns()[0].name, "A");
        assert_eq!(e.columns()[0].values, vec![9.0, 9.0]);
    }

    #[test]
    fn base_series_is_untouched() {
        let e = enriched().with_columns(vec![Column::new("Close", vec![0.0, 0.0])]);
        assert_eq!(e.base().close(), &[1.0, 2.0]);
    }

    // ---- projection helpers ----

    #[test]
    fn without_hides_base_and_drops_computed() {
        let e = enriched()
            .with_columns(vec![Column::new("SMA_2", vec![f64::NAN, 1.5])])
            .without(&["Volume".into(), "SMA_2".into(), "Nope".into()]);
        assert!(!e.visible_fields().contains(&BaseField::Volume));
        assert_eq!(e.visible_fields().len(), 10);
        assert!(e.column("SMA_2").is_none());
    }

    #[test]
    fn keep_base_keeps_computed_columns() {
        let e = enriched()
            .with_columns(vec![Column::new("OBV", vec![0.0, 100.0])])
            .keep_base(&[BaseField::Close]);
        assert_eq!(e.visible_fields(), &[BaseField::Close]);
        assert!(e.column("OBV").is_some());
    }

    // ---- finalize ----

    #[test]
    fn finalize_orders_fields_and_sanitizes() {
        let e = enriched()
            .with_columns(vec![Column::new("X", vec![f64::NAN, f64::INFINITY])])
            .keep_base(&[BaseField::OpenTime, BaseField::Close, BaseField::NumberOfTrades]);
        let rows = e.finalize();
        assert_eq!(rows.len(), 2);

        let keys: Vec<_> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Open_time", "Close", "Number_of_Trades", "X"]);
        assert_eq!(rows[0]["Open_time"], Value::String("1970-01-01T00:00:00Z".into()));
        assert_eq!(rows[0]["Number_of_Trades"], Value::from(50u64));
        assert_eq!(rows[0]["X"], Value::from(0.0));
        assert_eq!(rows[1]["X"], Value::from(0.0));
        assert_eq!(rows[1]["Close"].as_f64(), Some(2.0));
    }

    #[test]
    fn undefined_values_serialize_as_float_zero() {
        let e = enriched().with_columns(vec![Column::new("ROC_1", vec![f64::NAN, 1.0])]);
        let rows = e.finalize();
        assert!(rows[0]["ROC_1"].is_f64());
        let text = serde_json::to_string(&rows[0]).unwrap();
        assert!(text.contains("\"ROC_1\":0.0"), "{text}");
    }

    #[test]
    fn finalize_empty_series() {
        let e = EnrichedSeries::new(Arc::new(CandleSeries::default()));
        assert!(e.is_empty());
        assert!(e.finalize().is_empty());
    }
}
