// =============================================================================
// Column Projection — drop_columns / only_columns
// =============================================================================

use crate::enriched::EnrichedSeries;
use crate::error::{EngineError, Result};
use crate::types::BaseField;

/// Output column filter applied after all indicators have run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    None,
    /// Remove these names (base fields or computed columns) when present.
    Drop(Vec<String>),
    /// Show only these base fields; computed columns are always kept.
    Only(Vec<BaseField>),
}

impl Projection {
    /// Build from the two raw lists.  Both non-empty is rejected; every
    /// `only` entry must name a base field.
    pub fn from_lists(drop: Vec<String>, only: Vec<String>) -> Result<Self> {
        match (drop.is_empty(), only.is_empty()) {
            (false, false) => Err(EngineError::ConflictingProjection),
            (false, true) => Ok(Self::Drop(drop)),
            (true, false) => {
                let fields = only
                    .iter()
                    .map(|name| name.parse::<BaseField>())
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Only(fields))
            }
            (true, true) => Ok(Self::None),
        }
    }

    pub fn apply(&self, series: EnrichedSeries) -> EnrichedSeries {
        match self {
            Self::None => series,
            Self::Drop(names) => series.without(names),
            Self::Only(fields) => series.keep_base(fields),
        }
    }
}
