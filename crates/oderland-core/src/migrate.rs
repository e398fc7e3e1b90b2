//! The migration engine: moves a docroot subdirectory onto the cache area
//! and replaces it with a symlink.
//!
//! Two terminal outcomes, no persisted intermediate state. A failure after
//! the backup rename leaves the original directory as `.bak_*` and the
//! active path absent; that inconsistency is left for the operator, the
//! backup being the one safety net against data loss.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::context::CacheContext;
use crate::domains::DomainRecord;
use crate::error::{OderError, Result};
use crate::fsops;

/// Headroom required on the cache filesystem beyond the measured size of the
/// directory being migrated.
pub const HEADROOM_BYTES: u64 = 1024 * 1024;

/// Migrates `rel` under the domain's docroot into the cache area. On success
/// the caller records the entry in the cache config.
pub fn enable(ctx: &CacheContext, record: &DomainRecord, rel: &str) -> Result<()> {
    let source = record.docroot.join(rel);

    let already_link = fs::symlink_metadata(&source)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if already_link {
        return Err(OderError::AlreadyMigrated { path: source });
    }

    let cache_target = ctx.mirrored_path(&record.docroot, rel)?;
    let skeleton_target = ctx.skeleton_path(&record.docroot, rel)?;

    if source.is_dir() {
        let available = fsops::available_space(&ctx.cache_dir)?;
        migrate_existing(&source, &cache_target, &skeleton_target, available)?;
    } else {
        create_empty_targets(&source, &cache_target, &skeleton_target)?;
    }

    link_into_cache(&source, &cache_target)
}

/// Migrate-existing branch: capacity check, tree replication, file copy,
/// then the backup rename. The symlink is created afterwards by the caller.
fn migrate_existing(
    source: &Path,
    cache_target: &Path,
    skeleton_target: &Path,
    available: u64,
) -> Result<()> {
    let size = fsops::dir_size_bytes(source)?;
    if size + HEADROOM_BYTES > available {
        return Err(OderError::InsufficientSpace {
            needed: size + HEADROOM_BYTES,
            available,
        });
    }

    fsops::replicate_skeleton(source, cache_target)?;
    fsops::replicate_skeleton(source, skeleton_target)?;
    fsops::copy_tree(source, cache_target)?;

    let backup = backup_path(source)?;
    fs::rename(source, &backup).map_err(|e| {
        OderError::io(
            format!(
                "failed to move {} aside to {}",
                source.display(),
                backup.display()
            ),
            e,
        )
    })?;
    info!(
        source = %source.display(),
        backup = %backup.display(),
        size_bytes = size,
        "directory migrated into cache; backup left for manual cleanup"
    );
    Ok(())
}

/// No-existing-path branch: pre-create the source parent and both mirrored
/// targets with restrictive permissions.
fn create_empty_targets(source: &Path, cache_target: &Path, skeleton_target: &Path) -> Result<()> {
    if let Some(parent) = source.parent() {
        fsops::mkdir_restricted(parent)?;
    }
    fsops::mkdir_restricted(cache_target)?;
    fsops::mkdir_restricted(skeleton_target)?;
    Ok(())
}

fn link_into_cache(source: &Path, cache_target: &Path) -> Result<()> {
    #[cfg(unix)]
    let made = std::os::unix::fs::symlink(cache_target, source);
    #[cfg(not(unix))]
    let made = std::os::windows::fs::symlink_dir(cache_target, source);
    made.map_err(|e| OderError::SymlinkFailed {
        link: source.to_path_buf(),
        target: cache_target.to_path_buf(),
        source: e,
    })
}

/// Sibling backup name embedding the current unix time:
/// `.bak_<unix_time>_<original_name>`.
fn backup_path(source: &Path) -> Result<PathBuf> {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| OderError::InvalidPath {
            path: source.display().to_string(),
            reason: "source directory has no usable name".to_string(),
        })?;
    let parent = source.parent().ok_or_else(|| OderError::InvalidPath {
        path: source.display().to_string(),
        reason: "source directory has no parent".to_string(),
    })?;
    let ts = chrono::Utc::now().timestamp();
    Ok(parent.join(format!(".bak_{ts}_{name}")))
}
