//! Canned-response transport for offline runs and tests.
//!
//! Routes are matched by substring against the requested URL, first match
//! wins. Unmatched URLs answer HTTP 404, which the resolver treats like any
//! other failed attempt.

use super::provider::{DataError, Transport};
use std::cell::RefCell;

#[derive(Debug, Clone)]
enum Canned {
    Body(Body),
    Status(u16),
}

#[derive(Debug, Clone)]
enum Body {
    Json(serde_json::Value),
    Text(String),
}

#[derive(Debug, Default)]
pub struct FixtureTransport {
    routes: Vec<(String, Canned)>,
    requests: RefCell<Vec<String>>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, fragment: impl Into<String>, body: serde_json::Value) -> Self {
        self.routes.push((fragment.into(), Canned::Body(Body::Json(body))));
        self
    }

    pub fn text(mut self, fragment: impl Into<String>, body: impl Into<String>) -> Self {
        self.routes.push((fragment.into(), Canned::Body(Body::Text(body.into()))));
        self
    }

    pub fn status(mut self, fragment: impl Into<String>, status: u16) -> Self {
        self.routes.push((fragment.into(), Canned::Status(status)));
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn lookup(&self, url: &str) -> Result<Body, DataError> {
        self.requests.borrow_mut().push(url.to_string());
        let canned = self
            .routes
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, canned)| canned.clone())
            .unwrap_or(Canned::Status(404));

        match canned {
            Canned::Body(body) => Ok(body),
            Canned::Status(status) => Err(DataError::HttpStatus {
                url: url.to_string(),
                status,
            }),
        }
    }
}

impl Transport for FixtureTransport {
    fn fetch_json(
        &self,
        url: &str,
        _headers: &[(&str, &str)],
    ) -> Result<serde_json::Value, DataError> {
        match self.lookup(url)? {
            Body::Json(value) => Ok(value),
            Body::Text(body) => serde_json::from_str(&body)
                .map_err(|e| DataError::ResponseFormat(format!("invalid JSON: {e}"))),
        }
    }

    fn fetch_text(&self, url: &str) -> Result<String, DataError> {
        match self.lookup(url)? {
            Body::Json(value) => Ok(value.to_string()),
            Body::Text(body) => Ok(body),
        }
    }
}
