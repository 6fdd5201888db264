//! In-memory transport fake (testing only)
//!
//! `MemoryTransport` answers requests from a per-path script and records
//! every request it sees, so tests can assert on call counts, headers and
//! peak concurrency without network access.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::transport::{ApiRequest, ApiResponse, Transport};
use crate::Result;

/// Scripted transport keyed by URL path.
///
/// Responses queued for a path are served in order; the last one is
/// sticky and answers every further request. Unscripted paths get a 404.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    routes: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response, to make concurrency observable
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a response for `path`
    pub fn on(&self, path: &str, response: ApiResponse) -> &Self {
        let mut routes = self.routes.lock().unwrap();
        routes
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Queue a 200 JSON response for `path`
    pub fn on_json(&self, path: &str, body: serde_json::Value) -> &Self {
        self.on(path, ApiResponse::json(200, &body))
    }

    /// All requests seen so far, in arrival order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose path equals `path`
    pub fn hits(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .count()
    }

    /// Highest number of requests observed in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn next_response(&self, path: &str) -> ApiResponse {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(path) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => ApiResponse::json(404, &json!({ "message": format!("no route for {path}") })),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let response = self.next_response(&path_of(&request.url));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(response)
    }
}

fn path_of(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}
