//! Admin page for documentation versions
//!
//! - [`loader`]: Fetches the version list, last call wins
//! - [`view`]: Pure `FetchState` to `RenderModel` projection
//! - [`actions`]: Open, regenerate and delete with a single in-progress slot
//! - [`collaborators`]: Notification and permission traits
//! - [`page`]: Composition of the above for one page instance

pub mod actions;
pub mod collaborators;
pub mod loader;
pub mod page;
pub mod view;
