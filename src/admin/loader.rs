//! Version list loader with last-call-wins semantics

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::documentation::api::DocumentationApi;
use crate::documentation::error::FetchError;
use crate::documentation::types::{FetchState, VersionListResult};

/// Identifies the newest issued load and whether the view is still mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Epoch {
    generation: u64,
    mounted: bool,
}

/// Owns the `FetchState` cell of one admin view
///
/// Only the loader writes the state. Every `load` bumps a generation
/// counter; a response is applied only if its generation is still the
/// newest, and a superseded request future is dropped as soon as a newer
/// load starts or the view unmounts.
pub struct VersionListLoader {
    api: Arc<dyn DocumentationApi>,
    state: watch::Sender<FetchState>,
    epoch: watch::Sender<Epoch>,
}

impl VersionListLoader {
    pub fn new(api: Arc<dyn DocumentationApi>) -> Self {
        Self {
            api,
            state: watch::Sender::new(FetchState::Idle),
            epoch: watch::Sender::new(Epoch {
                generation: 0,
                mounted: true,
            }),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every applied state change
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        self.epoch.borrow().mounted
    }

    /// Re-enable state updates after an `unmount`
    pub fn mount(&self) {
        self.epoch.send_if_modified(|epoch| {
            let changed = !epoch.mounted;
            epoch.mounted = true;
            changed
        });
    }

    /// Cancel any in-flight fetch and stop applying state updates
    pub fn unmount(&self) {
        self.epoch.send_modify(|epoch| {
            epoch.generation += 1;
            epoch.mounted = false;
        });
        debug!("Version list unmounted, in-flight fetch cancelled");
    }

    /// Fetch the version list and return the state after this call settles
    ///
    /// Never fails: errors are stored as `FetchState::Failure`. When a newer
    /// call supersedes this one, the returned state is whatever the cell
    /// holds at that moment.
    pub async fn load(&self) -> FetchState {
        let Some(ticket) = self.begin() else {
            debug!("Ignoring load on unmounted version list");
            return self.state();
        };

        let mut epoch = self.epoch.subscribe();
        let outcome = tokio::select! {
            result = self.api.fetch_versions() => Some(result),
            _ = wait_superseded(&mut epoch, ticket) => None,
        };

        match outcome {
            Some(result) => self.apply(ticket, result),
            None => debug!("Fetch #{} superseded before completion", ticket),
        }

        self.state()
    }

    fn begin(&self) -> Option<u64> {
        let mut ticket = None;
        self.epoch.send_if_modified(|epoch| {
            if !epoch.mounted {
                return false;
            }
            epoch.generation += 1;
            ticket = Some(epoch.generation);
            self.state.send_replace(FetchState::Loading);
            true
        });
        if let Some(ticket) = ticket {
            debug!("Fetch #{} started", ticket);
        }
        ticket
    }

    fn apply(&self, ticket: u64, result: Result<VersionListResult, FetchError>) {
        // Holding the epoch read guard keeps a newer `begin` from interleaving
        let epoch = self.epoch.borrow();
        if !epoch.mounted || epoch.generation != ticket {
            debug!("Discarding stale response of fetch #{}", ticket);
            return;
        }

        let next = match result {
            Ok(result) => {
                debug!(
                    "Fetch #{} loaded {} documentation versions",
                    ticket,
                    result.versions.len()
                );
                FetchState::Success(result)
            }
            Err(e) => {
                warn!("Fetch #{} failed ({}): {}", ticket, e.reason().as_str(), e);
                FetchState::Failure(e)
            }
        };
        self.state.send_replace(next);
    }
}

async fn wait_superseded(epoch: &mut watch::Receiver<Epoch>, ticket: u64) {
    // Errs only once the loader itself is gone
    let _ = epoch.wait_for(|e| e.generation != ticket).await;
}
