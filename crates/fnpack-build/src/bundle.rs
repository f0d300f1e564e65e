//! Bundle stage: archive the dependency tree and top-level outputs.
//!
//! # Reproducibility
//!
//! Two runs over the same content give byte-identical archives because:
//! - entries are fed to the archiver in a sorted, stable order
//! - every entry's mtime was pinned by the normalize stage
//! - `-X` drops uid/gid and extended timestamp fields
//! - a previous archive is deleted first, so `zip` never updates in place

use std::path::Path;

use fnpack_core::ARTIFACT_FILE_NAME;

use crate::layout::{artifact_path, bundle_entries};
use crate::runner::Invocation;
use crate::stage::{StageContext, StageError};

/// `zip -X -q bundle.zip -@` with one entry name per stdin line.
pub(crate) fn invocation(ctx: &StageContext<'_>) -> Result<Invocation, StageError> {
    let entries = bundle_entries(ctx)?;
    if entries.is_empty() {
        return Err(StageError::NothingToBundle {
            dependency_dir: ctx.layout.dependency_dir.clone(),
            extension: ctx.layout.output_extension.clone(),
        });
    }

    let mut stdin = entries.join("\n").into_bytes();
    stdin.push(b'\n');

    Ok(Invocation::new(ctx.toolchain.archiver.as_str(), ctx.source_dir)
        .args(["-X", "-q", ARTIFACT_FILE_NAME, "-@"])
        .stdin(stdin))
}

pub(crate) fn describe(ctx: &StageContext<'_>) -> String {
    format!(
        "{archiver} -X -q {ARTIFACT_FILE_NAME} -@ < {dir} {dir}/** *.{ext}",
        archiver = ctx.toolchain.archiver,
        dir = ctx.layout.dependency_dir,
        ext = ctx.layout.output_extension,
    )
}

/// Delete an archive left by an earlier run.
pub(crate) fn remove_stale_archive(source_dir: &Path) -> Result<(), StageError> {
    let path = artifact_path(source_dir);
    if path.exists() {
        tracing::debug!(path = %path.display(), "removing previous archive");
        std::fs::remove_file(&path).map_err(|e| StageError::RemoveArchive {
            path: path.clone(),
            source: e,
        })?;
    }
    Ok(())
}
