//! Filesystem and platform primitives used by the migration engine and the
//! lister. Each call is a blocking, non-retryable unit: any failure is fatal
//! to the current invocation.

use std::fs;
use std::path::Path;

use filetime::FileTime;
use sysinfo::Disks;
use tracing::warn;
use walkdir::WalkDir;

use crate::error::{OderError, Result};

/// Recursive disk usage of `path`, counting regular files only.
pub fn dir_size_bytes(path: &Path) -> Result<u64> {
    let mut total = 0u64;
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| {
            OderError::io(format!("failed to walk {}", path.display()), e.into())
        })?;
        if entry.file_type().is_file() {
            let meta = entry.metadata().map_err(|e| {
                OderError::io(
                    format!("failed to stat {}", entry.path().display()),
                    e.into(),
                )
            })?;
            total += meta.len();
        }
    }
    Ok(total)
}

/// Free space on the filesystem holding `path`, taken from the mounted disk
/// with the longest mount-point prefix. The path itself does not have to
/// exist yet.
pub fn available_space(path: &Path) -> Result<u64> {
    let disks = Disks::new_with_refreshed_list();
    let mut best: Option<&sysinfo::Disk> = None;
    for disk in disks.list() {
        if path.starts_with(disk.mount_point()) {
            let longer = best.map_or(true, |b| {
                disk.mount_point().as_os_str().len() > b.mount_point().as_os_str().len()
            });
            if longer {
                best = Some(disk);
            }
        }
    }
    match best {
        Some(disk) => Ok(disk.available_space()),
        None => Err(OderError::io(
            format!("no mounted filesystem found for {}", path.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "mount point not found"),
        )),
    }
}

/// Recreates the directory skeleton of `src` under `dest`, carrying over
/// directory permissions where possible.
pub fn replicate_skeleton(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry
            .map_err(|e| OderError::io(format!("failed to walk {}", src.display()), e.into()))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let rel = entry.path().strip_prefix(src).map_err(|e| {
            OderError::io(
                format!("path {} escaped {}", entry.path().display(), src.display()),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        let target = dest.join(rel);
        fs::create_dir_all(&target).map_err(|e| OderError::DirectoryCreateFailed {
            path: target.clone(),
            source: e,
        })?;
        match entry.metadata() {
            Ok(meta) => {
                if let Err(e) = fs::set_permissions(&target, meta.permissions()) {
                    warn!(path = %target.display(), error = %e, "could not carry over directory permissions");
                }
            }
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "could not read directory permissions");
            }
        }
    }
    Ok(())
}

/// Copies every regular file under `src` into the mirrored location under
/// `dest`, preserving permissions (via `fs::copy`) and modification times.
/// Symlinks inside the tree are not followed and not copied.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry
            .map_err(|e| OderError::io(format!("failed to walk {}", src.display()), e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(src).map_err(|e| {
            OderError::io(
                format!("path {} escaped {}", entry.path().display(), src.display()),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        let target = dest.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| OderError::DirectoryCreateFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::copy(entry.path(), &target).map_err(|e| {
            OderError::io(
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                ),
                e,
            )
        })?;
        let meta = entry.metadata().map_err(|e| {
            OderError::io(
                format!("failed to stat {}", entry.path().display()),
                e.into(),
            )
        })?;
        let mtime = FileTime::from_last_modification_time(&meta);
        filetime::set_file_mtime(&target, mtime).map_err(|e| {
            OderError::io(
                format!("failed to set mtime on {}", target.display()),
                e,
            )
        })?;
    }
    Ok(())
}

/// Creates `path` (and any missing parents) with restrictive permissions,
/// then verifies it actually exists. An already existing directory is fine.
pub fn mkdir_restricted(path: &Path) -> Result<()> {
    if !path.is_dir() {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder
            .create(path)
            .map_err(|e| OderError::DirectoryCreateFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }
    if !path.is_dir() {
        return Err(OderError::DirectoryCreateFailed {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "directory missing after creation",
            ),
        });
    }
    Ok(())
}
