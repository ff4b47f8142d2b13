//! Collaborators injected into the admin page: notifications and permissions

use std::collections::HashSet;

#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Receives the outcome of every action
#[cfg_attr(test, automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str);
}

/// Permission required to enable an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Open,
    Regenerate,
    Delete,
}

impl Permission {
    /// Permission descriptor understood by the CMS
    pub fn descriptor(&self) -> &'static str {
        match self {
            Permission::Open => "plugin::documentation.read",
            Permission::Regenerate => "plugin::documentation.settings.regenerate",
            Permission::Delete => "plugin::documentation.settings.update",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.descriptor())
    }
}

/// Decides whether an action may be rendered enabled
#[cfg_attr(test, automock)]
pub trait PermissionGate: Send + Sync {
    fn allows(&self, permission: Permission) -> bool;
}

/// Notifier that writes to the tracing log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Info => info!("{}", message),
            NotificationLevel::Error => error!("{}", message),
        }
    }
}

#[derive(Debug, Default)]
pub struct AllowAll;

impl PermissionGate for AllowAll {
    fn allows(&self, _permission: Permission) -> bool {
        true
    }
}

/// Fixed set of granted permissions
#[derive(Debug, Default, Clone)]
pub struct StaticPermissions {
    granted: HashSet<Permission>,
}

impl StaticPermissions {
    pub fn new(granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            granted: granted.into_iter().collect(),
        }
    }
}

impl PermissionGate for StaticPermissions {
    fn allows(&self, permission: Permission) -> bool {
        self.granted.contains(&permission)
    }
}
