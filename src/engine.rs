// =============================================================================
// Indicator Engine — runs a dispatch plan over a candle series
// =============================================================================
//
// Pipeline:
//   raw rows ─► CandleSeries ─► plan ─► columns ─► EnrichedSeries
//            ─► projection ─► finalize ─► ordered JSON rows
//
// Every call in a plan reads only the base series, so the calls are
// independent.  With `parallel` on and a large enough series they fan out on
// the rayon pool; results are merged back in plan order, giving output
// identical to sequential evaluation.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::dispatch::{IndicatorCall, IndicatorRequest};
use crate::enriched::{Column, EnrichedSeries, Row};
use crate::error::Result;
use crate::market_data::CandleSeries;
use crate::runtime_config::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
    parallel: bool,
    parallel_min_rows: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Engine {
    pub fn new(parallel: bool, parallel_min_rows: usize) -> Self {
        Self {
            parallel,
            parallel_min_rows,
        }
    }

    pub fn sequential() -> Self {
        Self::new(false, usize::MAX)
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.parallel, config.parallel_min_rows)
    }

    fn fan_out(&self, rows: usize, calls: usize) -> bool {
        self.parallel && calls > 1 && rows >= self.parallel_min_rows
    }

    /// Apply every call of `request` to `series` and the request's
    /// projection.  Columns land in plan order.
    pub fn enrich(&self, series: Arc<CandleSeries>, request: &IndicatorRequest) -> EnrichedSeries {
        self.enrich_plan(series, request, &request.plan())
    }

    fn enrich_plan(
        &self,
        series: Arc<CandleSeries>,
        request: &IndicatorRequest,
        plan: &[IndicatorCall],
    ) -> EnrichedSeries {
        let computed: Vec<Vec<Column>> = if self.fan_out(series.len(), plan.len()) {
            plan.par_iter().map(|call| evaluate(call, &series)).collect()
        } else {
            plan.iter().map(|call| evaluate(call, &series)).collect()
        };

        let enriched = computed
            .into_iter()
            .fold(EnrichedSeries::new(series), EnrichedSeries::with_columns);

        request.projection().apply(enriched)
    }

    /// Full request: validate the query and the candle rows, compute, and
    /// return finalized rows.  All input errors surface before any indicator
    /// runs.
    pub fn run(&self, rows: &[Value], query: &Map<String, Value>) -> Result<Vec<Row>> {
        let started = Instant::now();
        let request = IndicatorRequest::from_query(query)?;
        let series = Arc::new(CandleSeries::from_rows(rows)?);
        let plan = request.plan();
        let parallel = self.fan_out(series.len(), plan.len());

        let enriched = self.enrich_plan(series, &request, &plan);
        let output = enriched.finalize();

        info!(
            rows = output.len(),
            indicators = plan.len(),
            columns = enriched.columns().len(),
            parallel,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "indicator request complete"
        );

        Ok(output)
    }
}

fn evaluate(call: &IndicatorCall, series: &CandleSeries) -> Vec<Column> {
    let columns = call.compute(series);
    debug!(indicator = %call, columns = columns.len(), "indicator applied");
    columns
}
