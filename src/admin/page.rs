//! Documentation plugin admin page

use std::sync::Arc;

use serde::Serialize;

use crate::admin::actions::VersionActions;
use crate::admin::collaborators::{Notifier, PermissionGate};
use crate::admin::loader::VersionListLoader;
use crate::admin::view::{
    Affordance, AllowedActions, DisabledReason, RenderModel, ViewContext, render,
};
use crate::documentation::api::DocumentationApi;
use crate::documentation::error::ActionError;
use crate::documentation::types::FetchState;

pub const PAGE_TITLE: &str = "Documentation";
pub const PAGE_SUBTITLE: &str = "Configure the documentation plugin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageModel {
    pub header: HeaderModel,
    pub body: RenderModel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderModel {
    pub title: String,
    pub subtitle: String,
    /// Opens the viewer on the current version
    pub open_documentation: Affordance,
}

/// One instance of the version list page
pub struct PluginPage {
    loader: Arc<VersionListLoader>,
    actions: VersionActions,
    permissions: Arc<dyn PermissionGate>,
}

impl PluginPage {
    pub fn new(
        api: Arc<dyn DocumentationApi>,
        notifier: Arc<dyn Notifier>,
        permissions: Arc<dyn PermissionGate>,
        viewer_base_url: &str,
    ) -> Self {
        let loader = Arc::new(VersionListLoader::new(Arc::clone(&api)));
        let actions = VersionActions::new(
            api,
            Arc::clone(&loader),
            notifier,
            Arc::clone(&permissions),
            viewer_base_url,
        );
        Self {
            loader,
            actions,
            permissions,
        }
    }

    pub fn loader(&self) -> &Arc<VersionListLoader> {
        &self.loader
    }

    pub fn state(&self) -> FetchState {
        self.loader.state()
    }

    /// Start the initial fetch and wait for it to settle
    pub async fn mount(&self) -> FetchState {
        self.loader.mount();
        self.loader.load().await
    }

    pub fn unmount(&self) {
        self.loader.unmount();
    }

    pub fn render(&self) -> PageModel {
        let state = self.loader.state();
        let ctx = ViewContext {
            action_in_progress: self.actions.in_progress().is_some(),
            allowed: AllowedActions::from_gate(self.permissions.as_ref()),
        };

        let has_current = state
            .result()
            .is_some_and(|result| result.current_version.is_some());
        let open_reason = if ctx.action_in_progress {
            Some(DisabledReason::ActionInProgress)
        } else if !ctx.allowed.open {
            Some(DisabledReason::PermissionDenied)
        } else if !has_current {
            Some(DisabledReason::NoCurrentVersion)
        } else {
            None
        };

        PageModel {
            header: HeaderModel {
                title: PAGE_TITLE.to_string(),
                subtitle: PAGE_SUBTITLE.to_string(),
                open_documentation: Affordance::new("Open Documentation".to_string(), open_reason),
            },
            body: render(&state, &ctx),
        }
    }

    pub async fn regenerate(&self, version: &str) -> Result<(), ActionError> {
        self.actions.regenerate(version).await
    }

    pub async fn delete(&self, version: &str) -> Result<(), ActionError> {
        self.actions.delete(version).await
    }

    pub fn open(&self, version: &str) -> Result<String, ActionError> {
        self.actions.open(version)
    }

    pub fn open_documentation(&self) -> Result<String, ActionError> {
        self.actions.open_current()
    }
}
