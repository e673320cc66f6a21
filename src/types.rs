// =============================================================================
// Shared types used across the indicator engine
// =============================================================================

use std::str::FromStr;

use crate::error::EngineError;

/// One of the eleven fields of the fixed candle schema.
///
/// Variant order is the schema order; output rows list base fields in this
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseField {
    OpenTime,
    Open,
    High,
    Low,
    Close,
    Volume,
    CloseTime,
    QuoteAssetVolume,
    NumberOfTrades,
    TakerBuyBaseAssetVolume,
    TakerBuyQuoteAssetVolume,
}

impl BaseField {
    pub const ALL: [BaseField; 11] = [
        Self::OpenTime,
        Self::Open,
        Self::High,
        Self::Low,
        Self::Close,
        Self::Volume,
        Self::CloseTime,
        Self::QuoteAssetVolume,
        Self::NumberOfTrades,
        Self::TakerBuyBaseAssetVolume,
        Self::TakerBuyQuoteAssetVolume,
    ];

    /// Column name as stored by the market-data table.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::OpenTime => "Open_time",
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::Volume => "Volume",
            Self::CloseTime => "Close_time",
            Self::QuoteAssetVolume => "Quote_Asset_Volume",
            Self::NumberOfTrades => "Number_of_Trades",
            Self::TakerBuyBaseAssetVolume => "Taker_Buy_Base_Asset_Volume",
            Self::TakerBuyQuoteAssetVolume => "Taker_Buy_Quote_Asset_Volume",
        }
    }

    /// Case- and underscore-insensitive lookup (`OpenTime`, `open_time`,
    /// `Open_time` all resolve to [`BaseField::OpenTime`]).
    pub fn lookup(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        Self::ALL
            .iter()
            .copied()
            .find(|f| normalize(f.wire_name()) == wanted)
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for BaseField {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| EngineError::Parameter(format!("unknown base column `{s}`")))
    }
}

impl std::fmt::Display for BaseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_underscores() {
        assert_eq!(BaseField::lookup("Open_time"), Some(BaseField::OpenTime));
        assert_eq!(BaseField::lookup("OpenTime"), Some(BaseField::OpenTime));
        assert_eq!(
            BaseField::lookup("taker_buy_quote_asset_volume"),
            Some(BaseField::TakerBuyQuoteAssetVolume)
        );
        assert_eq!(BaseField::lookup("close"), Some(BaseField::Close));
        assert_eq!(BaseField::lookup("SMA_5"), None);
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!("Closee".parse::<BaseField>().is_err());
        assert_eq!("NUMBER_OF_TRADES".parse::<BaseField>().unwrap(), BaseField::NumberOfTrades);
    }

    #[test]
    fn display_uses_wire_name() {
        assert_eq!(BaseField::QuoteAssetVolume.to_string(), "Quote_Asset_Volume");
        assert_eq!(BaseField::ALL.len(), 11);
    }
}
