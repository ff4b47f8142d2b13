pub mod admin;
pub mod config;
pub mod documentation;
pub mod logging;
