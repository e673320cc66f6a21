// =============================================================================
// Indicator Catalog — static metadata served by the listing endpoints
// =============================================================================

use serde::Serialize;

use crate::dispatch::{Flag, IndicatorKey, Periodic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterInfo {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub formula: &'static str,
    pub columns: &'static str,
    pub parameters: &'static [ParameterInfo],
    pub usage: &'static [&'static str],
}

const PERIOD: &[ParameterInfo] = &[ParameterInfo {
    name: "period",
    kind: "integer",
    description: "Window length in candles.",
}];

const NONE: &[ParameterInfo] = &[];

const MACD_PARAMS: &[ParameterInfo] = &[
    ParameterInfo {
        name: "short_period",
        kind: "integer",
        description: "Fast EMA span (e.g. 12).",
    },
    ParameterInfo {
        name: "long_period",
        kind: "integer",
        description: "Slow EMA span (e.g. 26).",
    },
    ParameterInfo {
        name: "signal_period",
        kind: "integer",
        description: "Signal-line EMA span (e.g. 9).",
    },
];

impl IndicatorKey {
    pub fn catalog(self) -> &'static IndicatorInfo {
        match self {
            Self::Periodic(p) => periodic_info(p),
            Self::Macd => &MACD,
            Self::Flag(f) => flag_info(f),
        }
    }
}

/// Catalog entries for every key, in application order.
pub fn all() -> Vec<&'static IndicatorInfo> {
    IndicatorKey::all().into_iter().map(IndicatorKey::catalog).collect()
}

fn periodic_info(kind: Periodic) -> &'static IndicatorInfo {
    match kind {
        Periodic::Ema => &EMA,
        Periodic::Sma => &SMA,
        Periodic::Roc => &ROC,
        Periodic::Rsi => &RSI,
        Periodic::Wil => &WIL,
        Periodic::Atr => &ATR,
        Periodic::Mom => &MOM,
        Periodic::So => &SO,
        Periodic::Bb => &BB,
        Periodic::Cmo => &CMO,
        Periodic::Dc => &DC,
        Periodic::Cmf => &CMF,
        Periodic::Cci => &CCI,
        Periodic::Adx => &ADX,
        Periodic::Kc => &KC,
    }
}

fn flag_info(flag: Flag) -> &'static IndicatorInfo {
    match flag {
        Flag::Al => &AL,
        Flag::Tr => &TR,
        Flag::Obv => &OBV,
        Flag::Ic => &IC,
        Flag::Pp => &PP,
        Flag::Vwap => &VWAP,
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

static SMA: IndicatorInfo = IndicatorInfo {
    key: "sma",
    name: "Simple Moving Average (SMA)",
    description: "Average closing price over the last N candles.",
    formula: "SMA = (sum of Close over N) / N",
    columns: "SMA_{period}",
    parameters: PERIOD,
    usage: &["Trend direction: a rising SMA marks an uptrend.", "Dynamic support and resistance."],
};

static EMA: IndicatorInfo = IndicatorInfo {
    key: "ema",
    name: "Exponential Moving Average (EMA)",
    description: "Moving average that weights recent closes more heavily than older ones.",
    formula: "alpha = 2 / (N + 1); EMA_t = sum((1-alpha)^i * Close_(t-i)) / sum((1-alpha)^i)",
    columns: "EMA_{period}",
    parameters: PERIOD,
    usage: &["Faster reaction to price changes than SMA.", "Short-term trend following."],
};

static ROC: IndicatorInfo = IndicatorInfo {
    key: "roc",
    name: "Rate of Change (ROC)",
    description: "Percentage change of the close versus N candles ago.",
    formula: "ROC = (Close_t - Close_(t-N)) / Close_(t-N) * 100",
    columns: "ROC_{period}",
    parameters: PERIOD,
    usage: &["Overbought and oversold readings.", "Momentum shifts."],
};

static RSI: IndicatorInfo = IndicatorInfo {
    key: "rsi",
    name: "Relative Strength Index (RSI)",
    description: "Ratio of average gains to average losses, scaled to 0..100.",
    formula: "RSI = 100 - 100 / (1 + mean(Gain, N) / mean(Loss, N))",
    columns: "RSI_{period}",
    parameters: PERIOD,
    usage: &["Overbought above 70, oversold below 30.", "Divergence against price."],
};

static WIL: IndicatorInfo = IndicatorInfo {
    key: "wil",
    name: "Williams %R (WIL)",
    description: "Position of the close inside the N-candle high/low range, scaled to -100..0.",
    formula: "WIL = (Highest High - Close) / (Highest High - Lowest Low) * -100",
    columns: "WIL_{period}",
    parameters: PERIOD,
    usage: &["Overbought above -20, oversold below -80."],
};

static ATR: IndicatorInfo = IndicatorInfo {
    key: "atr",
    name: "Average True Range (ATR)",
    description: "Average of the true range over N candles; a volatility gauge.",
    formula: "ATR = mean(TR, N)",
    columns: "ATR_{period}",
    parameters: PERIOD,
    usage: &["Volatility-scaled stop distances.", "Position sizing."],
};

static MOM: IndicatorInfo = IndicatorInfo {
    key: "mom",
    name: "Momentum (MOM)",
    description: "Absolute change of the close versus N candles ago.",
    formula: "MOM = Close_t - Close_(t-N)",
    columns: "MOM_{period}",
    parameters: PERIOD,
    usage: &["Zero-line crossings.", "Trend acceleration."],
};

static SO: IndicatorInfo = IndicatorInfo {
    key: "so",
    name: "Stochastic Oscillator (%K)",
    description: "Position of the close inside the N-candle high/low range, scaled to 0..100.",
    formula: "SO_%K = (Close - Lowest Low) / (Highest High - Lowest Low) * 100",
    columns: "SO_%K_{period}",
    parameters: PERIOD,
    usage: &["Overbought above 80, oversold below 20."],
};

static BB: IndicatorInfo = IndicatorInfo {
    key: "bb",
    name: "Bollinger Bands (BB)",
    description: "SMA with bands two sample standard deviations above and below.",
    formula: "Middle = SMA(N); Upper = Middle + 2 * StdDev(N); Lower = Middle - 2 * StdDev(N)",
    columns: "Middle_Band_{period}, Upper_Band_{period}, Lower_Band_{period}",
    parameters: PERIOD,
    usage: &["Volatility squeezes and expansions.", "Mean-reversion extremes."],
};

static CMO: IndicatorInfo = IndicatorInfo {
    key: "cmo",
    name: "Chande Momentum Oscillator (CMO)",
    description: "Net gains over total movement across N candles, scaled to -100..100.",
    formula: "CMO = (sum(Gain, N) - sum(Loss, N)) / (sum(Gain, N) + sum(Loss, N)) * 100",
    columns: "CMO_{period}",
    parameters: PERIOD,
    usage: &["Overbought above 50, oversold below -50."],
};

static DC: IndicatorInfo = IndicatorInfo {
    key: "dc",
    name: "Donchian Channels (DC)",
    description: "Highest high and lowest low over N candles, with their midpoint.",
    formula: "Upper = max(High, N); Lower = min(Low, N); Mid = (Upper + Lower) / 2",
    columns: "Donchian_Upper_{period}, Donchian_Lower_{period}, Donchian_Mid_{period}",
    parameters: PERIOD,
    usage: &["Breakout levels.", "Trend following."],
};

static CMF: IndicatorInfo = IndicatorInfo {
    key: "cmf",
    name: "Chaikin Money Flow (CMF)",
    description: "Money-flow volume relative to total volume over N candles.",
    formula: "CMF = sum(MFV, N) / sum(Volume, N)",
    columns: "CMF_{period}",
    parameters: PERIOD,
    usage: &["Buying pressure above 0, selling pressure below 0."],
};

static CCI: IndicatorInfo = IndicatorInfo {
    key: "cci",
    name: "Commodity Channel Index (CCI)",
    description: "Deviation of the typical price from its average, in units of mean deviation.",
    formula: "TP = (High + Low + Close) / 3; CCI = (TP - SMA(TP, N)) / (0.015 * MeanDev(TP, N))",
    columns: "CCI_{period}",
    parameters: PERIOD,
    usage: &["Overbought above 100, oversold below -100."],
};

static ADX: IndicatorInfo = IndicatorInfo {
    key: "adx",
    name: "Average Directional Index (ADX)",
    description: "Strength of the prevailing trend regardless of its direction.",
    formula: "+DI = 100 * mean(+DM, N) / mean(TR, N); -DI likewise; \
              DX = 100 * |+DI - -DI| / (+DI + -DI); ADX = mean(DX, N)",
    columns: "ADX_{period}",
    parameters: PERIOD,
    usage: &["Trending above 25, ranging below 20."],
};

static KC: IndicatorInfo = IndicatorInfo {
    key: "kc",
    name: "Keltner Channels (KC)",
    description: "SMA envelope with bands two ATRs away.",
    formula: "Middle = SMA(N); Upper = Middle + 2 * ATR(N); Lower = Middle - 2 * ATR(N)",
    columns: "KC_Middle_Band_{period}, KC_Upper_Band_{period}, KC_Lower_Band_{period}",
    parameters: PERIOD,
    usage: &["Breakouts beyond the bands.", "Volatility regime."],
};

static MACD: IndicatorInfo = IndicatorInfo {
    key: "macd",
    name: "Moving Average Convergence Divergence (MACD)",
    description: "Difference of a fast and a slow EMA, plus an EMA of that difference.",
    formula: "MACD Line = EMA(Close, short) - EMA(Close, long); Signal Line = EMA(MACD Line, signal); \
              EMA_0 = x_0, EMA_t = (1 - alpha) * EMA_(t-1) + alpha * x_t",
    columns: "MACD_Line_{short}_{long}, Signal_Line_{short}_{long}_{signal}",
    parameters: MACD_PARAMS,
    usage: &["Signal-line crossovers.", "Zero-line crossovers."],
};

static AL: IndicatorInfo = IndicatorInfo {
    key: "al",
    name: "Accumulation/Distribution Line (A/D Line)",
    description: "Running total of money-flow volume.",
    formula: "MFM = ((Close - Low) - (High - Close)) / (High - Low); MFV = MFM * Volume; \
              AD = cumulative sum of MFV",
    columns: "AD_Line",
    parameters: NONE,
    usage: &["Divergence between price and volume."],
};

static TR: IndicatorInfo = IndicatorInfo {
    key: "tr",
    name: "True Range (TR)",
    description: "Largest of the candle range and the gaps from the previous close.",
    formula: "TR = max(High - Low, |High - Previous Close|, |Low - Previous Close|)",
    columns: "TR",
    parameters: NONE,
    usage: &["Raw per-candle volatility."],
};

static OBV: IndicatorInfo = IndicatorInfo {
    key: "obv",
    name: "On-Balance Volume (OBV)",
    description: "Cumulative volume signed by the direction of the close.",
    formula: "OBV_0 = 0; OBV_t = OBV_(t-1) + Volume if Close rises, - Volume if it falls, unchanged otherwise",
    columns: "OBV",
    parameters: NONE,
    usage: &["Volume confirmation of price trends."],
};

static IC: IndicatorInfo = IndicatorInfo {
    key: "ic",
    name: "Ichimoku Cloud (IC)",
    description: "Five lines describing trend, momentum and support/resistance.",
    formula: "Tenkan = midpoint(9); Kijun = midpoint(26); Span A = (Tenkan + Kijun) / 2 shifted 26 ahead; \
              Span B = midpoint(52) shifted 26 ahead; Chikou = Close shifted 26 back",
    columns: "Tenkan_sen, Kijun_sen, Senkou_Span_A, Senkou_Span_B, Chikou_Span",
    parameters: NONE,
    usage: &["Price above the cloud is bullish, below is bearish."],
};

static PP: IndicatorInfo = IndicatorInfo {
    key: "pp",
    name: "Pivot Points (PP)",
    description: "Floor-trader support and resistance levels from each candle.",
    formula: "P = (High + Low + Close) / 3; R1 = 2P - Low; S1 = 2P - High; R2 = P + (High - Low); S2 = P - (High - Low)",
    columns: "Pivot, Support_1, Resistance_1, Support_2, Resistance_2",
    parameters: NONE,
    usage: &["Intraday support and resistance."],
};

static VWAP: IndicatorInfo = IndicatorInfo {
    key: "vwap",
    name: "Volume-Weighted Average Price (VWAP)",
    description: "Running average of the typical price weighted by volume.",
    formula: "VWAP = cumsum(TP * Volume) / cumsum(Volume)",
    columns: "VWAP",
    parameters: NONE,
    usage: &["Benchmark for execution quality."],
};
