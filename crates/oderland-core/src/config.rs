//! Persisted cache config document.
//!
//! A single JSON object mapping domain name to a set of migrated
//! relative paths, each marked by an empty object:
//!
//! ```json
//! {
//!   "example.com": { "cache": {}, "wp-content/uploads": {} }
//! }
//! ```
//!
//! The document is loaded whole, mutated in memory, and rewritten whole on
//! every change. There is no locking: concurrent invocations against the same
//! account can clobber each other's writes (last writer wins). Key order is
//! insertion order, which the lister relies on for its output ordering.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{OderError, Result};

#[derive(Debug, Clone)]
pub struct CacheConfig {
    path: PathBuf,
    doc: Map<String, Value>,
}

impl CacheConfig {
    /// Reads the config file. A missing file is an empty document; a file
    /// that exists but does not hold a JSON object is [`OderError::ConfigCorrupt`].
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(raw) => {
                let value: Value =
                    serde_json::from_str(&raw).map_err(|e| OderError::ConfigCorrupt {
                        path: path.clone(),
                        reason: e.to_string(),
                    })?;
                match value {
                    Value::Object(map) => map,
                    other => {
                        return Err(OderError::ConfigCorrupt {
                            path,
                            reason: format!("expected a JSON object, found {other}"),
                        })
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                return Err(OderError::io(
                    format!("failed to read cache config {}", path.display()),
                    e,
                ))
            }
        };
        Ok(Self { path, doc })
    }

    /// Adds the marker for `(domain, rel)` and rewrites the document.
    /// A no-op on the document itself if the marker is already present.
    pub fn add_entry(&mut self, domain: &str, rel: &str) -> Result<()> {
        let paths = self
            .doc
            .entry(domain.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = paths {
            map.entry(rel.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        self.save()
    }

    /// Removes the marker for `(domain, rel)` and rewrites the document. The
    /// domain key goes away with its last path.
    pub fn remove_entry(&mut self, domain: &str, rel: &str) -> Result<()> {
        if let Some(Value::Object(paths)) = self.doc.get_mut(domain) {
            paths.remove(rel);
            if paths.is_empty() {
                self.doc.remove(domain);
            }
        }
        self.save()
    }

    pub fn contains(&self, domain: &str, rel: &str) -> bool {
        matches!(
            self.doc.get(domain),
            Some(Value::Object(paths)) if paths.contains_key(rel)
        )
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    /// Iterates `(domain, rel)` pairs in document order: domains in insertion
    /// order, paths in insertion order within each domain.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.doc.iter().flat_map(|(domain, paths)| {
            paths
                .as_object()
                .into_iter()
                .flat_map(move |map| map.keys().map(move |rel| (domain.as_str(), rel.as_str())))
        })
    }

    /// Serializes the whole document with stable pretty formatting and a
    /// trailing newline, overwriting the config file. The parent directory is
    /// created lazily on first write.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| OderError::DirectoryCreateFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let mut out = serde_json::to_string_pretty(&Value::Object(self.doc.clone())).map_err(
            |e| OderError::ConfigCorrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            },
        )?;
        out.push('\n');
        fs::write(&self.path, out).map_err(|e| {
            OderError::io(
                format!("failed to write cache config {}", self.path.display()),
                e,
            )
        })?;
        debug!(path = %self.path.display(), "cache config written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("odercache").join("config.json");
        (tmp, path)
    }

    #[test]
    fn missing_file_loads_as_empty_document() {
        let (_tmp, path) = scratch();
        let config = CacheConfig::load(&path).unwrap();
        assert!(config.is_empty());
        assert!(!path.exists(), "load must not create the file");
    }

    #[test]
    fn invalid_json_is_config_corrupt() {
        let (_tmp, path) = scratch();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            CacheConfig::load(&path),
            Err(OderError::ConfigCorrupt { .. })
        ));

        fs::write(&path, "[1,2,3]").unwrap();
        assert!(matches!(
            CacheConfig::load(&path),
            Err(OderError::ConfigCorrupt { .. })
        ));
    }

    #[test]
    fn add_then_remove_round_trips_to_prior_state() {
        let (_tmp, path) = scratch();
        let mut config = CacheConfig::load(&path).unwrap();
        config.add_entry("example.com", "cache").unwrap();
        assert!(config.contains("example.com", "cache"));

        config.remove_entry("example.com", "cache").unwrap();
        assert!(config.is_empty(), "domain key must go with its last path");

        let reloaded = CacheConfig::load(&path).unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn add_entry_twice_is_idempotent() {
        let (_tmp, path) = scratch();
        let mut config = CacheConfig::load(&path).unwrap();
        config.add_entry("example.com", "cache").unwrap();
        let first = fs::read_to_string(&path).unwrap();
        config.add_entry("example.com", "cache").unwrap();
        let second = fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn save_load_reproduces_the_document() {
        let (_tmp, path) = scratch();
        let mut config = CacheConfig::load(&path).unwrap();
        config.add_entry("b.example", "z").unwrap();
        config.add_entry("a.example", "cache").unwrap();
        config.add_entry("b.example", "a").unwrap();

        let reloaded = CacheConfig::load(&path).unwrap();
        let got: Vec<_> = reloaded.entries().collect();
        assert_eq!(
            got,
            vec![("b.example", "z"), ("b.example", "a"), ("a.example", "cache")],
            "iteration must follow insertion order, not lexical order"
        );
    }

    #[test]
    fn removing_one_path_keeps_the_domain() {
        let (_tmp, path) = scratch();
        let mut config = CacheConfig::load(&path).unwrap();
        config.add_entry("example.com", "cache").unwrap();
        config.add_entry("example.com", "tmp").unwrap();
        config.remove_entry("example.com", "cache").unwrap();
        assert!(config.contains("example.com", "tmp"));
        assert!(!config.contains("example.com", "cache"));
    }

    #[test]
    fn written_file_ends_with_a_newline() {
        let (_tmp, path) = scratch();
        let mut config = CacheConfig::load(&path).unwrap();
        config.add_entry("example.com", "cache").unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with('\n'));
        assert_eq!(
            serde_json::from_str::<Value>(&raw).unwrap(),
            serde_json::json!({"example.com": {"cache": {}}})
        );
    }
}
