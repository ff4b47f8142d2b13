//! Scripted documentation service for tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;

use doc_versions::documentation::api::DocumentationApi;
use doc_versions::documentation::error::FetchError;
use doc_versions::documentation::types::{VersionListResult, VersionRecord};

/// A request the fake received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch,
    Regenerate(String),
    Delete(String),
}

struct Step<T> {
    gate: Option<Arc<Notify>>,
    result: Result<T, FetchError>,
}

/// Documentation service answering from a queue of scripted responses
///
/// A gated response waits until its `Notify` is signalled, which lets tests
/// hold a request in flight.
#[derive(Default)]
pub struct ScriptedApi {
    fetches: Mutex<VecDeque<Step<VersionListResult>>>,
    regenerates: Mutex<VecDeque<Step<()>>>,
    deletes: Mutex<VecDeque<Step<()>>>,
    calls: Mutex<Vec<Call>>,
    cancelled: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fetch(self, result: Result<VersionListResult, FetchError>) -> Self {
        push(&self.fetches, None, result);
        self
    }

    pub fn with_gated_fetch(
        self,
        gate: &Arc<Notify>,
        result: Result<VersionListResult, FetchError>,
    ) -> Self {
        push(&self.fetches, Some(Arc::clone(gate)), result);
        self
    }

    pub fn with_regenerate(self, result: Result<(), FetchError>) -> Self {
        push(&self.regenerates, None, result);
        self
    }

    pub fn with_gated_regenerate(self, gate: &Arc<Notify>, result: Result<(), FetchError>) -> Self {
        push(&self.regenerates, Some(Arc::clone(gate)), result);
        self
    }

    pub fn with_delete(self, result: Result<(), FetchError>) -> Self {
        push(&self.deletes, None, result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests dropped before they completed
    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    async fn answer<T>(
        &self,
        call: Call,
        queue: &Mutex<VecDeque<Step<T>>>,
    ) -> Result<T, FetchError> {
        self.calls.lock().unwrap().push(call.clone());
        let step = queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {call:?}"));

        let mut guard = CancelGuard {
            counter: &self.cancelled,
            armed: true,
        };
        if let Some(gate) = step.gate {
            gate.notified().await;
        }
        guard.armed = false;
        step.result
    }
}

fn push<T>(
    queue: &Mutex<VecDeque<Step<T>>>,
    gate: Option<Arc<Notify>>,
    result: Result<T, FetchError>,
) {
    queue.lock().unwrap().push_back(Step { gate, result });
}

struct CancelGuard<'a> {
    counter: &'a AtomicUsize,
    armed: bool,
}

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl DocumentationApi for ScriptedApi {
    async fn fetch_versions(&self) -> Result<VersionListResult, FetchError> {
        self.answer(Call::Fetch, &self.fetches).await
    }

    async fn regenerate(&self, version: &str) -> Result<(), FetchError> {
        self.answer(Call::Regenerate(version.to_string()), &self.regenerates)
            .await
    }

    async fn delete(&self, version: &str) -> Result<(), FetchError> {
        self.answer(Call::Delete(version.to_string()), &self.deletes)
            .await
    }
}

/// `1.0.0` never generated, `1.2.0` generated on 2023-01-01, in service order
#[allow(dead_code)]
pub fn sample_versions() -> VersionListResult {
    VersionListResult::new(vec![
        VersionRecord::new("1.0.0", None),
        VersionRecord::new(
            "1.2.0",
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()),
        ),
    ])
}
