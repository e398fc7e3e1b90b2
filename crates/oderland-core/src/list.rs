//! Reporting on migrated directories.

use std::collections::BTreeMap;

use crate::config::CacheConfig;
use crate::context::CacheContext;
use crate::domains::DomainRecord;
use crate::error::Result;
use crate::fsops;

/// Derived row of the cache report; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub domain: String,
    pub rel_path: String,
    pub size_mib: u64,
}

/// Walks the config document in its own order and measures each surviving
/// entry. Entries whose domain no longer resolves are skipped, as are entries
/// whose mirrored directory is gone from the storage area — the filesystem is
/// trusted over the config.
pub fn collect(
    ctx: &CacheContext,
    config: &CacheConfig,
    domains: &BTreeMap<String, DomainRecord>,
) -> Result<Vec<CacheEntry>> {
    let mut entries = Vec::new();
    for (domain, rel) in config.entries() {
        let Some(record) = domains.get(domain) else {
            continue;
        };
        let mirrored = ctx.mirrored_path(&record.docroot, rel)?;
        if !mirrored.is_dir() {
            continue;
        }
        let bytes = fsops::dir_size_bytes(&mirrored)?;
        entries.push(CacheEntry {
            domain: domain.to_string(),
            rel_path: rel.to_string(),
            size_mib: bytes / 1024 / 1024,
        });
    }
    Ok(entries)
}

/// Fixed-width table with a header row and a separator rule sized to the
/// longest domain name; column widths are driven by the longest domain and
/// path encountered.
pub fn render_report(entries: &[CacheEntry]) -> String {
    let domain_width = entries
        .iter()
        .map(|e| e.domain.len())
        .max()
        .unwrap_or(0)
        .max("DOMAIN".len());
    let path_width = entries
        .iter()
        .map(|e| e.rel_path.len())
        .max()
        .unwrap_or(0)
        .max("PATH".len());

    let header = format!(
        "{:<domain_width$} | {:<path_width$} | SIZE (MiB)",
        "DOMAIN", "PATH"
    );
    let mut out = String::new();
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(domain_width));
    out.push('\n');
    for entry in entries {
        out.push_str(&format!(
            "{:<domain_width$} | {:<path_width$} | {}\n",
            entry.domain, entry.rel_path, entry.size_mib
        ));
    }
    out
}
