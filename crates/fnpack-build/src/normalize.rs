//! Normalize stage: pin every bundled entry's mtime to the Unix epoch.
//!
//! Zip entries record modification times, so without this two runs over
//! identical content produce different archives.

use crate::layout::bundle_entries;
use crate::runner::Invocation;
use crate::stage::{StageContext, StageError};

/// Instant every bundled entry is stamped with, in `touch -d` syntax.
pub const EPOCH: &str = "@0";

/// `xargs -0 -r touch -c -d @0 --` with the entry list on stdin.
///
/// Going through `xargs` keeps large dependency trees under the argument
/// length limit. Symlinks are dereferenced: `zip` archives what a link
/// points to, so that is what gets stamped. `-c` never creates files.
pub(crate) fn invocation(ctx: &StageContext<'_>) -> Result<Invocation, StageError> {
    let entries = bundle_entries(ctx)?;

    let mut stdin = Vec::new();
    for entry in &entries {
        stdin.extend_from_slice(entry.as_bytes());
        stdin.push(0);
    }

    Ok(Invocation::new("xargs", ctx.source_dir)
        .args(["-0", "-r", "touch", "-c", "-d", EPOCH, "--"])
        .stdin(stdin))
}

pub(crate) fn describe(ctx: &StageContext<'_>) -> String {
    format!(
        "touch -c -d {EPOCH} -- {dir} {dir}/** *.{ext}",
        dir = ctx.layout.dependency_dir,
        ext = ctx.layout.output_extension,
    )
}
