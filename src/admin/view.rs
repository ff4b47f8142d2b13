//! Pure projection from `FetchState` to what the admin page displays

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::admin::collaborators::{Permission, PermissionGate};
use crate::documentation::error::FailureReason;
use crate::documentation::semver::sort_by_precedence;
use crate::documentation::types::{FetchState, VersionListResult};

/// Format of the "Last Generated" cell
const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderModel {
    Loading,
    Empty,
    EmptyWithError {
        reason: FailureReason,
        message: String,
    },
    Table {
        rows: Vec<Row>,
    },
}

impl RenderModel {
    pub fn kind(&self) -> &'static str {
        match self {
            RenderModel::Loading => "loading",
            RenderModel::Empty => "empty",
            RenderModel::EmptyWithError { .. } => "empty_with_error",
            RenderModel::Table { .. } => "table",
        }
    }

    pub fn rows(&self) -> &[Row] {
        match self {
            RenderModel::Table { rows } => rows,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: String,
    pub generated_at: Option<DateTime<Utc>>,
    /// Blank when the version was never generated
    pub generated_at_label: String,
    pub is_current: bool,
    pub actions: RowActions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowActions {
    pub open: Affordance,
    pub regenerate: Affordance,
    pub delete: Affordance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affordance {
    pub label: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_reason: Option<DisabledReason>,
}

impl Affordance {
    pub fn new(label: String, disabled_reason: Option<DisabledReason>) -> Self {
        Self {
            label,
            enabled: disabled_reason.is_none(),
            disabled_reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabledReason {
    ActionInProgress,
    PermissionDenied,
    CurrentVersion,
    NoCurrentVersion,
}

/// Outcome of the permission gate for each action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowedActions {
    pub open: bool,
    pub regenerate: bool,
    pub delete: bool,
}

impl Default for AllowedActions {
    fn default() -> Self {
        Self {
            open: true,
            regenerate: true,
            delete: true,
        }
    }
}

impl AllowedActions {
    pub fn from_gate(gate: &dyn PermissionGate) -> Self {
        Self {
            open: gate.allows(Permission::Open),
            regenerate: gate.allows(Permission::Regenerate),
            delete: gate.allows(Permission::Delete),
        }
    }
}

/// Inputs to `render` besides the fetch state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewContext {
    /// A mutating action is running: every row action is disabled
    pub action_in_progress: bool,
    pub allowed: AllowedActions,
}

pub fn render(state: &FetchState, ctx: &ViewContext) -> RenderModel {
    match state {
        FetchState::Idle | FetchState::Loading => RenderModel::Loading,
        FetchState::Failure(e) => RenderModel::EmptyWithError {
            reason: e.reason(),
            message: e.to_string(),
        },
        FetchState::Success(result) if result.is_empty() => RenderModel::Empty,
        FetchState::Success(result) => RenderModel::Table {
            rows: build_rows(result, ctx),
        },
    }
}

fn build_rows(result: &VersionListResult, ctx: &ViewContext) -> Vec<Row> {
    let mut records = result.versions.clone();
    sort_by_precedence(&mut records);

    records
        .into_iter()
        .map(|record| {
            let is_current = result.current_version.as_deref() == Some(record.id.as_str());
            let gate = |allowed: bool| {
                if ctx.action_in_progress {
                    Some(DisabledReason::ActionInProgress)
                } else if !allowed {
                    Some(DisabledReason::PermissionDenied)
                } else {
                    None
                }
            };

            let delete_reason = gate(ctx.allowed.delete)
                .or(is_current.then_some(DisabledReason::CurrentVersion));

            let actions = RowActions {
                open: Affordance::new(format!("Open {}", record.id), gate(ctx.allowed.open)),
                regenerate: Affordance::new(
                    format!("Regenerate {}", record.id),
                    gate(ctx.allowed.regenerate),
                ),
                delete: Affordance::new(format!("Delete {}", record.id), delete_reason),
            };

            Row {
                generated_at_label: record
                    .generated_at
                    .map(|at| at.format(GENERATED_AT_FORMAT).to_string())
                    .unwrap_or_default(),
                generated_at: record.generated_at,
                id: record.id,
                is_current,
                actions,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::collaborators::MockPermissionGate;
    use crate::documentation::error::FetchError;
    use crate::documentation::types::VersionRecord;
    use chrono::TimeZone;
    use rstest::rstest;

    fn ids(model: &RenderModel) -> Vec<&str> {
        model.rows().iter().map(|r| r.id.as_str()).collect()
    }

    fn success(ids: &[&str]) -> FetchState {
        FetchState::Success(VersionListResult::new(
            ids.iter().map(|id| VersionRecord::new(*id, None)).collect(),
        ))
    }

    #[rstest]
    #[case::idle(FetchState::Idle)]
    #[case::loading(FetchState::Loading)]
    fn render_shows_loader_before_data_arrives(#[case] state: FetchState) {
        assert_eq!(render(&state, &ViewContext::default()), RenderModel::Loading);
    }

    #[rstest]
    #[case(FetchError::Network("connection reset".into()), FailureReason::Network)]
    #[case(FetchError::Server { status: 500, message: None }, FailureReason::Server)]
    #[case(FetchError::Parse("missing field `versions`".into()), FailureReason::Parse)]
    fn render_failure_is_empty_with_error(#[case] err: FetchError, #[case] reason: FailureReason) {
        let model = render(&FetchState::Failure(err.clone()), &ViewContext::default());

        assert_eq!(model.kind(), "empty_with_error");
        assert_eq!(
            model,
            RenderModel::EmptyWithError {
                reason,
                message: err.to_string()
            }
        );
        assert!(model.rows().is_empty());
    }

    #[test]
    fn render_empty_success_is_empty() {
        assert_eq!(render(&success(&[]), &ViewContext::default()), RenderModel::Empty);
    }

    #[test]
    fn render_sorts_rows_and_blanks_never_generated_cells() {
        let generated = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let state = FetchState::Success(VersionListResult::new(vec![
            VersionRecord::new("1.0.0", None),
            VersionRecord::new("1.2.0", Some(generated)),
        ]));

        let model = render(&state, &ViewContext::default());

        assert_eq!(ids(&model), vec!["1.2.0", "1.0.0"]);
        let rows = model.rows();
        assert_eq!(rows[0].generated_at_label, "2023-01-01 00:00");
        assert_eq!(rows[1].generated_at, None);
        assert_eq!(rows[1].generated_at_label, "");
    }

    #[test]
    fn render_rows_are_a_permutation_of_the_input() {
        let input = ["0.9.0", "v2.1", "latest", "2.0.0-rc.1", "10.0.0", "2.0.0"];
        let model = render(&success(&input), &ViewContext::default());

        assert_eq!(
            ids(&model),
            vec!["10.0.0", "v2.1", "2.0.0", "2.0.0-rc.1", "0.9.0", "latest"]
        );
        let mut sorted_input = input.to_vec();
        let mut sorted_rows = ids(&model);
        sorted_input.sort();
        sorted_rows.sort();
        assert_eq!(sorted_input, sorted_rows);
    }

    #[test]
    fn render_enables_all_actions_by_default() {
        let model = render(&success(&["1.2.0"]), &ViewContext::default());
        let actions = &model.rows()[0].actions;

        assert_eq!(
            actions,
            &RowActions {
                open: Affordance::new("Open 1.2.0".into(), None),
                regenerate: Affordance::new("Regenerate 1.2.0".into(), None),
                delete: Affordance::new("Delete 1.2.0".into(), None),
            }
        );
    }

    #[test]
    fn render_disables_every_action_while_an_action_is_in_progress() {
        let ctx = ViewContext {
            action_in_progress: true,
            ..ViewContext::default()
        };
        let model = render(&success(&["1.0.0", "1.2.0", "2.0.0"]), &ctx);

        for row in model.rows() {
            for affordance in [&row.actions.open, &row.actions.regenerate, &row.actions.delete] {
                assert!(!affordance.enabled);
                assert_eq!(affordance.disabled_reason, Some(DisabledReason::ActionInProgress));
            }
        }
    }

    #[test]
    fn render_disables_delete_of_current_version_only() {
        let state = FetchState::Success(
            VersionListResult::new(vec![
                VersionRecord::new("1.0.0", None),
                VersionRecord::new("1.2.0", None),
            ])
            .with_current_version("1.0.0"),
        );

        let model = render(&state, &ViewContext::default());
        let rows = model.rows();

        assert!(!rows[0].is_current);
        assert!(rows[0].actions.delete.enabled);
        assert!(rows[1].is_current);
        assert_eq!(
            rows[1].actions.delete.disabled_reason,
            Some(DisabledReason::CurrentVersion)
        );
        assert!(rows[1].actions.open.enabled);
        assert!(rows[1].actions.regenerate.enabled);
    }

    #[test]
    fn render_disables_actions_the_gate_denies() {
        let mut gate = MockPermissionGate::new();
        gate.expect_allows()
            .returning(|permission| permission == Permission::Open);
        let ctx = ViewContext {
            action_in_progress: false,
            allowed: AllowedActions::from_gate(&gate),
        };

        let model = render(&success(&["1.0.0"]), &ctx);
        let actions = &model.rows()[0].actions;

        assert!(actions.open.enabled);
        assert_eq!(
            actions.regenerate.disabled_reason,
            Some(DisabledReason::PermissionDenied)
        );
        assert_eq!(
            actions.delete.disabled_reason,
            Some(DisabledReason::PermissionDenied)
        );
    }

    #[test]
    fn render_model_serializes_with_kind_tag() {
        let model = render(&success(&[]), &ViewContext::default());
        assert_eq!(serde_json::to_value(&model).unwrap(), serde_json::json!({ "kind": "empty" }));

        let model = render(
            &FetchState::Failure(FetchError::Network("down".into())),
            &ViewContext::default(),
        );
        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            serde_json::json!({
                "kind": "empty_with_error",
                "reason": "network",
                "message": "Network error: down"
            })
        );
    }
}
