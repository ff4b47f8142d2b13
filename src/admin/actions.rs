//! Open, regenerate and delete actions on documentation versions

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::admin::collaborators::{NotificationLevel, Notifier, Permission, PermissionGate};
use crate::admin::loader::VersionListLoader;
use crate::documentation::api::DocumentationApi;
use crate::documentation::error::{ActionError, ActionKind};
use crate::documentation::types::{DEFAULT_PREFIX, FetchState};

/// Runs mutating actions one at a time and refreshes the loader afterwards
pub struct VersionActions {
    api: Arc<dyn DocumentationApi>,
    loader: Arc<VersionListLoader>,
    notifier: Arc<dyn Notifier>,
    permissions: Arc<dyn PermissionGate>,
    viewer_base_url: String,
    in_progress: Mutex<Option<ActionKind>>,
}

/// Clears the in-progress slot when the action finishes or is dropped
struct InProgressGuard<'a> {
    slot: &'a Mutex<Option<ActionKind>>,
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        *lock(self.slot) = None;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl VersionActions {
    pub fn new(
        api: Arc<dyn DocumentationApi>,
        loader: Arc<VersionListLoader>,
        notifier: Arc<dyn Notifier>,
        permissions: Arc<dyn PermissionGate>,
        viewer_base_url: &str,
    ) -> Self {
        Self {
            api,
            loader,
            notifier,
            permissions,
            viewer_base_url: viewer_base_url.trim_end_matches('/').to_string(),
            in_progress: Mutex::new(None),
        }
    }

    /// The mutating action currently running, if any
    pub fn in_progress(&self) -> Option<ActionKind> {
        *lock(&self.in_progress)
    }

    pub async fn regenerate(&self, version: &str) -> Result<(), ActionError> {
        self.run(ActionKind::Regenerate, version).await
    }

    pub async fn delete(&self, version: &str) -> Result<(), ActionError> {
        self.run(ActionKind::Delete, version).await
    }

    /// Viewer URL of one version
    pub fn open(&self, version: &str) -> Result<String, ActionError> {
        let result = self.viewer_url(version);
        if let Err(e) = &result {
            self.notifier.notify(NotificationLevel::Error, &e.to_string());
        }
        result
    }

    /// Viewer URL of the version the service reports as current
    pub fn open_current(&self) -> Result<String, ActionError> {
        let current = match self.loader.state() {
            FetchState::Success(result) => result.current_version,
            _ => None,
        };
        match current {
            Some(version) => self.open(&version),
            None => {
                let err = ActionError::NoCurrentVersion;
                self.notifier.notify(NotificationLevel::Error, &err.to_string());
                Err(err)
            }
        }
    }

    fn viewer_url(&self, version: &str) -> Result<String, ActionError> {
        if !self.permissions.allows(Permission::Open) {
            return Err(ActionError::PermissionDenied(Permission::Open));
        }

        let prefix = match self.loader.state() {
            FetchState::Success(result) => {
                if !result.contains(version) {
                    return Err(ActionError::UnknownVersion(version.to_string()));
                }
                result.prefix
            }
            _ => DEFAULT_PREFIX.to_string(),
        };

        Ok(format!("{}{}/v{}", self.viewer_base_url, prefix, version))
    }

    async fn run(&self, kind: ActionKind, version: &str) -> Result<(), ActionError> {
        let outcome = self.execute(kind, version).await;
        match &outcome {
            Ok(()) => {
                let message = match kind {
                    ActionKind::Regenerate => {
                        format!("Successfully regenerated documentation v{version}")
                    }
                    ActionKind::Delete => format!("Successfully deleted documentation v{version}"),
                };
                self.notifier.notify(NotificationLevel::Info, &message);
            }
            Err(e) => self.notifier.notify(NotificationLevel::Error, &e.to_string()),
        }
        outcome
    }

    async fn execute(&self, kind: ActionKind, version: &str) -> Result<(), ActionError> {
        let permission = match kind {
            ActionKind::Regenerate => Permission::Regenerate,
            ActionKind::Delete => Permission::Delete,
        };
        if !self.permissions.allows(permission) {
            return Err(ActionError::PermissionDenied(permission));
        }

        let _guard = self.begin(kind)?;
        self.check_target(kind, version)?;

        debug!("Running {} for documentation {}", kind, version);
        match kind {
            ActionKind::Regenerate => self.api.regenerate(version).await?,
            ActionKind::Delete => self.api.delete(version).await?,
        }

        // The version set changed on the server: reload before releasing the slot
        self.loader.load().await;
        Ok(())
    }

    fn begin(&self, kind: ActionKind) -> Result<InProgressGuard<'_>, ActionError> {
        let mut slot = lock(&self.in_progress);
        if let Some(running) = *slot {
            return Err(ActionError::Conflict {
                requested: kind,
                running,
            });
        }
        *slot = Some(kind);
        Ok(InProgressGuard {
            slot: &self.in_progress,
        })
    }

    /// Validate against the loaded list; without one the service decides
    fn check_target(&self, kind: ActionKind, version: &str) -> Result<(), ActionError> {
        let FetchState::Success(result) = self.loader.state() else {
            return Ok(());
        };
        if !result.contains(version) {
            return Err(ActionError::UnknownVersion(version.to_string()));
        }
        if kind == ActionKind::Delete && result.current_version.as_deref() == Some(version) {
            return Err(ActionError::CurrentVersion(version.to_string()));
        }
        Ok(())
    }
}
