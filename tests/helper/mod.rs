pub mod api;
pub mod notifier;

#[allow(unused_imports)]
pub use api::{Call, ScriptedApi, sample_versions};
#[allow(unused_imports)]
pub use notifier::RecordingNotifier;
