//! Recording fake for the outbound HTTP seam.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use stockwatch_market_data::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use tokio::time::Instant;

type Handler = dyn Fn(&Url) -> Result<HttpResponse, TransportError> + Send + Sync;

/// Answers every request through `handler` and remembers what was asked.
pub struct RecordingTransport {
    handler: Box<Handler>,
    calls: Mutex<Vec<(Url, Instant)>>,
}

impl RecordingTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&Url) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Transport that answers every request with the same status and body.
    pub fn fixed(status: StatusCode, body: &'static str) -> Arc<Self> {
        Self::new(move |_| Ok(HttpResponse::new(status, body)))
    }

    pub fn urls(&self) -> Vec<Url> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn hosts(&self) -> Vec<String> {
        self.urls()
            .iter()
            .map(|url| url.host_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.url.clone(), Instant::now()));
        (self.handler)(&request.url)
    }
}

/// Value of a query parameter, if present.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

pub fn ok(body: impl Into<String>) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(StatusCode::OK, body))
}
