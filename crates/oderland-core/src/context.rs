//! Per-account cache layout.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::path::home_relative;

/// Fixed directory layout of the odercache subsystem for one account.
///
/// Passed explicitly into every operation that touches the cache; there is no
/// shared global state.
#[derive(Debug, Clone)]
pub struct CacheContext {
    /// Account home directory.
    pub home: PathBuf,
    /// Storage area the migrated directories live in.
    pub cache_dir: PathBuf,
    /// Companion tree holding the pre-created directory skeletons.
    pub skeleton_dir: PathBuf,
    /// Persisted cache config document.
    pub config_path: PathBuf,
}

impl CacheContext {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let state_dir = home.join(".oderland").join("odercache");
        Self {
            cache_dir: home.join("odercache"),
            skeleton_dir: state_dir.join("dirs"),
            config_path: state_dir.join("config.json"),
            home,
        }
    }

    /// Where `rel` under `docroot` lives inside the storage area.
    pub fn mirrored_path(&self, docroot: &Path, rel: &str) -> Result<PathBuf> {
        Ok(self.cache_dir.join(home_relative(docroot)?).join(rel))
    }

    /// The matching path inside the skeleton tree.
    pub fn skeleton_path(&self, docroot: &Path, rel: &str) -> Result<PathBuf> {
        Ok(self.skeleton_dir.join(home_relative(docroot)?).join(rel))
    }
}
