//! Core logic for the `oderland` hosting-account CLI.
//!
//! Two halves live here. The `api` module wraps the control panel's CLI
//! binaries (`uapi` / `cpapi2`) behind the [`api::AccountApi`] trait and is
//! used by the provisioning commands and the domain resolver. Everything else
//! implements the odercache subsystem: relocating a docroot subdirectory onto
//! the per-account cache area and replacing it with a symlink, tracking the
//! migrated paths in a JSON config document, and reporting on them.

pub mod api;
pub mod config;
pub mod context;
pub mod domains;
pub mod error;
pub mod fsops;
pub mod list;
pub mod migrate;
pub mod path;

pub use context::CacheContext;
pub use error::{OderError, Result};
