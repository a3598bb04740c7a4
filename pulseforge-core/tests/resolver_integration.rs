//! Resolver driven through the real adapters and the standard source table,
//! with canned upstream responses.

use chrono::NaiveDate;
use pulseforge_core::data::{
    standard_specs, ApiKey, Finnhub, FixtureTransport, FredCsv, PolygonAggs, ProviderSet,
    YahooChart,
};
use pulseforge_core::{FetchWindow, IndicatorKey, ProviderKind, Resolver};
use serde_json::{json, Value};

// 2024-01-02 12:00 UTC
const NOON_SECS: i64 = 1_704_196_800;
const DAY_SECS: i64 = 86_400;

fn polygon_body(closes: &[f64]) -> Value {
    let results: Vec<Value> = closes
        .iter()
        .enumerate()
        .map(|(i, c)| json!({"t": (NOON_SECS + i as i64 * DAY_SECS) * 1000, "c": c, "v": 1_000_000}))
        .collect();
    json!({"status": "OK", "results": results})
}

fn yahoo_body(closes: &[f64]) -> Value {
    let timestamps: Vec<i64> = (0..closes.len() as i64)
        .map(|i| NOON_SECS + i * DAY_SECS)
        .collect();
    json!({
        "chart": {
            "result": [{
                "timestamp": timestamps,
                "indicators": {"quote": [{"close": closes, "volume": vec![0; closes.len()]}]}
            }],
            "error": null
        }
    })
}

fn all_providers() -> ProviderSet {
    ProviderSet::new()
        .with(Box::new(PolygonAggs::new(ApiKey::new("poly-key").unwrap())))
        .with(Box::new(Finnhub::new(ApiKey::new("finn-key").unwrap())))
        .with(Box::new(YahooChart::new()))
        .with(Box::new(FredCsv::new()))
}

fn window() -> FetchWindow {
    FetchWindow::trailing(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), 120)
}

#[test]
fn every_indicator_falls_back_as_configured() {
    let transport = FixtureTransport::new()
        // SPY: Polygon primary succeeds
        .json("ticker/SPY/", polygon_body(&[470.0, 472.0, 474.5]))
        // VIX: Yahoo not found, Polygon index succeeds
        .json(
            "chart/%5EVIX?",
            json!({"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}}),
        )
        .json("ticker/I:VIX/", polygon_body(&[13.2, 13.9]))
        // DXY: Yahoo implausible, UUP proxy scaled
        .json("chart/DX-Y.NYB?", yahoo_body(&[1.04, 1.05]))
        .json("ticker/UUP/", polygon_body(&[28.0, 28.1]))
        // TNX: Yahoo 500, Polygon index in yield×10
        .status("chart/%5ETNX?", 500)
        .json("ticker/I:TNX/", polygon_body(&[39.5, 40.2]))
        // BTC: nothing anywhere
        // CL: Yahoo negative print, FRED succeeds
        .json("chart/CL=F?", yahoo_body(&[-37.63]))
        .text(
            "fredgraph.csv?id=DCOILWTICO",
            "observation_date,DCOILWTICO\n2024-01-02,70.38\n2024-01-03,.\n2024-01-04,72.19\n",
        );

    let providers = all_providers();
    let resolver = Resolver::new(&transport, &providers, window());
    let set = resolver.resolve_all(&standard_specs());

    assert_eq!(
        set.keys(),
        vec![IndicatorKey::Spy, IndicatorKey::Vix, IndicatorKey::Dxy, IndicatorKey::Tnx, IndicatorKey::Cl]
    );
    assert_eq!(set.missing(), vec![IndicatorKey::Btc]);

    let spy = set.get(IndicatorKey::Spy).unwrap();
    assert_eq!(spy.provenance.provider, ProviderKind::PolygonAggs);
    assert_eq!(spy.series.values(), &[470.0, 472.0, 474.5]);

    let vix = set.get(IndicatorKey::Vix).unwrap();
    assert_eq!(vix.provenance.provider, ProviderKind::PolygonAggs);
    assert_eq!(vix.series.last_value(), Some(13.9));

    let dxy = set.get(IndicatorKey::Dxy).unwrap();
    assert!(dxy.is_proxy);
    assert!((dxy.series.last_value().unwrap() - 28.1 * 3.7).abs() < 1e-9);

    let tnx = set.get(IndicatorKey::Tnx).unwrap();
    assert!(!tnx.is_proxy);
    assert!((tnx.series.last_value().unwrap() - 4.02).abs() < 1e-9);

    let cl = set.get(IndicatorKey::Cl).unwrap();
    assert_eq!(cl.provenance.provider, ProviderKind::FredCsv);
    assert_eq!(cl.series.values(), &[70.38, 72.19]);
}

#[test]
fn missing_credentials_skip_keyed_providers_without_requests() {
    let transport = FixtureTransport::new().json("chart/SPY?", yahoo_body(&[470.0, 471.0]));
    let providers = ProviderSet::new()
        .with(Box::new(YahooChart::new()))
        .with(Box::new(FredCsv::new()));
    let resolver = Resolver::new(&transport, &providers, window());

    let spy_spec = standard_specs()
        .into_iter()
        .find(|s| s.key == IndicatorKey::Spy)
        .unwrap();
    let spy = resolver.resolve(&spy_spec).unwrap();

    assert_eq!(spy.provenance.provider, ProviderKind::YahooChart);
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains("query2.finance.yahoo.com"));
}

#[test]
fn credentials_never_appear_in_urls() {
    let transport = FixtureTransport::new();
    let providers = all_providers();
    let resolver = Resolver::new(&transport, &providers, window());
    let set = resolver.resolve_all(&standard_specs());

    assert!(set.is_empty());
    for url in transport.requests() {
        assert!(!url.contains("poly-key"), "{url}");
        assert!(!url.contains("finn-key"), "{url}");
    }
}
