//! Latest-session quote snapshots for sector ETFs and the watchlist.

use crate::config::{ApiKeys, SectorEntry};
use crate::output::{SectorMap, SectorQuote, WatchlistEntry};
use pulseforge_core::data::{Finnhub, Quote, QuoteSource, Throttle, Transport, YahooChart};
use pulseforge_core::Direction;
use tracing::{debug, warn};

pub const DERIVED_NOTE: &str = "derived from daily closes";

/// Quote endpoints in fallback order: Finnhub (when keyed), then a quote
/// reconstructed from Yahoo daily closes.
pub fn quote_sources(keys: &ApiKeys) -> Vec<Box<dyn QuoteSource>> {
    let mut sources: Vec<Box<dyn QuoteSource>> = Vec::new();
    if let Some(key) = &keys.finnhub {
        sources.push(Box::new(Finnhub::new(key.clone())));
    }
    sources.push(Box::new(YahooChart::new()));
    sources
}

/// Walks the quote sources for one symbol at a time, spacing out requests.
pub struct QuoteFetcher<'a> {
    transport: &'a dyn Transport,
    sources: &'a [Box<dyn QuoteSource>],
    throttle: &'a Throttle,
}

impl<'a> QuoteFetcher<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        sources: &'a [Box<dyn QuoteSource>],
        throttle: &'a Throttle,
    ) -> Self {
        Self {
            transport,
            sources,
            throttle,
        }
    }

    /// First quote any source returns, or `None` after logging each failure.
    pub fn fetch(&self, symbol: &str) -> Option<Quote> {
        for source in self.sources {
            self.throttle.wait();
            match source.fetch_quote(self.transport, symbol) {
                Ok(quote) => {
                    debug!(symbol, source = source.name(), price = quote.price, "quote");
                    return Some(quote);
                }
                Err(e) => {
                    warn!(symbol, source = source.name(), error = %e, "quote failed");
                }
            }
        }
        None
    }

    /// Quotes for every sector that resolves, in configured order.
    pub fn sectors(&self, sectors: &[SectorEntry]) -> SectorMap {
        let mut out = SectorMap::default();
        for sector in sectors {
            if let Some(q) = self.fetch(&sector.symbol) {
                out.push(
                    sector.name.clone(),
                    SectorQuote {
                        symbol: sector.symbol.clone(),
                        price: q.price,
                        change_pct: q.change_pct,
                    },
                );
            }
        }
        out
    }

    /// Watchlist rows for every ticker that resolves, in configured order.
    pub fn watchlist(&self, tickers: &[String], threshold_pct: f64) -> Vec<WatchlistEntry> {
        tickers
            .iter()
            .filter_map(|ticker| {
                let q = self.fetch(ticker)?;
                Some(WatchlistEntry {
                    ticker: ticker.clone(),
                    price: q.price,
                    change_pct: q.change_pct,
                    signal: daily_signal(q.change_pct, threshold_pct),
                    notes: if q.derived {
                        DERIVED_NOTE.to_string()
                    } else {
                        String::new()
                    },
                })
            })
            .collect()
    }
}

/// Direction of a single session's move against a symmetric threshold.
pub fn daily_signal(change_pct: f64, threshold_pct: f64) -> Direction {
    if change_pct > threshold_pct {
        Direction::Bullish
    } else if change_pct < -threshold_pct {
        Direction::Bearish
    } else {
        Direction::Neutral
    }
}
