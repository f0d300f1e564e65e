use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::stage::{StageContext, StageError};

/// Top-level files in `dir` whose name ends in `.{extension}`, sorted by name.
///
/// Only the top level is considered: `tsc` writes its output next to the
/// sources and nested `.js` files belong to the dependency directory.
pub fn top_level_outputs(dir: &Path, extension: &str) -> Result<Vec<String>, StageError> {
    let suffix = format!(".{extension}");
    let scan_err = |e: std::io::Error| StageError::Scan {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(scan_err)? {
        let entry = entry.map_err(scan_err)?;
        if entry.file_type().map_err(scan_err)?.is_dir() {
            continue;
        }
        let file_name = entry.file_name();
        if file_name.len() <= suffix.len()
            || !file_name.as_encoded_bytes().ends_with(suffix.as_bytes())
        {
            continue;
        }
        // The archiver reads names line by line, so bundled names must be text.
        let Some(name) = file_name.to_str() else {
            return Err(StageError::NonUtf8Path { path: entry.path() });
        };
        names.push(name.to_owned());
    }
    names.sort();
    Ok(names)
}

/// Every entry under the dependency directory (the directory itself
/// included), relative to `dir`, in depth-first order with siblings sorted by
/// name. Empty when the directory does not exist.
///
/// Directory symlinks (`link:` dependencies, workspace packages) are
/// descended into and their files listed under the link's own path, the
/// same view `zip` has when it follows the link.
pub fn dependency_entries(dir: &Path, dependency_dir: &str) -> Result<Vec<String>, StageError> {
    let root = dir.join(dependency_dir);
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = match e.path() {
                Some(path) => path.to_path_buf(),
                None => root.clone(),
            };
            StageError::Scan {
                path,
                source: e.into(),
            }
        })?;
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| StageError::Scan {
                path: entry.path().to_path_buf(),
                source: std::io::Error::other(e),
            })?;
        match relative.to_str() {
            Some(name) => entries.push(name.to_owned()),
            None => {
                return Err(StageError::NonUtf8Path {
                    path: entry.path().to_path_buf(),
                });
            }
        }
    }
    Ok(entries)
}

/// Everything that goes into the archive: the dependency tree first, then
/// top-level output files. Normalize and Bundle both use this list so the
/// timestamps that get rewritten are exactly the ones that get archived.
pub fn bundle_entries(ctx: &StageContext<'_>) -> Result<Vec<String>, StageError> {
    let mut entries = dependency_entries(ctx.source_dir, &ctx.layout.dependency_dir)?;
    entries.extend(top_level_outputs(
        ctx.source_dir,
        &ctx.layout.output_extension,
    )?);
    Ok(entries)
}

/// Path of the archive for `dir`.
pub fn artifact_path(dir: &Path) -> PathBuf {
    dir.join(fnpack_core::ARTIFACT_FILE_NAME)
}
