//! Filesystem document store for the daily plan engine.
//!
//! Plan documents live as `<kind>.json` files in one data directory,
//! configured through [`DataConfig`].

pub mod config;
pub mod json_dir;

pub use config::DataConfig;
pub use json_dir::{JsonDir, StoreError, load_daily_plan, load_documents};
