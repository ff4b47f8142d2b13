//! Documentation service layer
//!
//! Types, wire parsing and the HTTP client for the documentation versions
//! endpoint, plus the version-precedence ordering used by the admin view.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │ DocumentationApi │◀────│ HttpDocumentation│
//! │     (trait)      │     │   Api (reqwest)  │
//! └──────────────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ VersionListResult│────▶│      semver      │
//! │     (types)      │     │   (precedence)   │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`api`]: Service trait used by the admin layer
//! - [`http`]: reqwest implementation of the service trait
//! - [`error`]: Fetch and action error types
//! - [`semver`]: Version parsing and precedence ordering
//! - [`types`]: `VersionRecord`, `VersionListResult`, `FetchState`

pub mod api;
pub mod error;
pub mod http;
pub mod semver;
pub mod types;
