//! The standard indicator source table.
//!
//! Order within each spec is the fallback order: the dedicated index first,
//! then a general-purpose history provider, then proxies.

use super::resolver::{IndicatorSpec, SourceAttempt};
use crate::domain::{IndicatorKey, ProviderKind};

/// UUP (dollar bullish ETF) → approximate DXY points.
pub const DXY_PER_UUP: f64 = 3.7;

/// Index-style yield quotes (`I:TNX`) are yield × 10.
pub const TNX_POINTS_PER_PERCENT: f64 = 10.0;

pub fn standard_specs() -> Vec<IndicatorSpec> {
    use ProviderKind::*;

    vec![
        IndicatorSpec::new(IndicatorKey::Spy)
            .source(SourceAttempt::new(PolygonAggs, "SPY"))
            .source(SourceAttempt::new(FinnhubCandles, "SPY"))
            .source(SourceAttempt::new(YahooChart, "SPY")),
        IndicatorSpec::new(IndicatorKey::Vix)
            .within(5.0, 100.0)
            .source(SourceAttempt::new(YahooChart, "^VIX"))
            .source(SourceAttempt::new(PolygonAggs, "I:VIX")),
        IndicatorSpec::new(IndicatorKey::Dxy)
            .within(80.0, 130.0)
            .source(SourceAttempt::new(YahooChart, "DX-Y.NYB"))
            .source(SourceAttempt::new(PolygonAggs, "UUP").scaled(DXY_PER_UUP).proxy()),
        IndicatorSpec::new(IndicatorKey::Tnx)
            .within(0.5, 15.0)
            .source(SourceAttempt::new(YahooChart, "^TNX"))
            .source(SourceAttempt::new(PolygonAggs, "I:TNX").divided(TNX_POINTS_PER_PERCENT))
            .source(SourceAttempt::new(FredCsv, "DGS10")),
        IndicatorSpec::new(IndicatorKey::Btc)
            .source(SourceAttempt::new(PolygonAggs, "X:BTCUSD"))
            .source(SourceAttempt::new(YahooChart, "BTC-USD")),
        IndicatorSpec::new(IndicatorKey::Cl)
            .within(20.0, 200.0)
            .source(SourceAttempt::new(YahooChart, "CL=F"))
            .source(SourceAttempt::new(FredCsv, "DCOILWTICO")),
    ]
}
