//! Clean stage: return the source directory to its source-only state.

use fnpack_core::ARTIFACT_FILE_NAME;

use crate::layout::top_level_outputs;
use crate::runner::Invocation;
use crate::stage::{StageContext, StageError};

/// `rm -rf --` over every byproduct of a previous run.
///
/// Names that do not exist are still passed; `rm -f` ignores them, which
/// keeps the stage a successful no-op on a fresh checkout. Top-level outputs
/// are only removed when the language compiles to them; for interpreted
/// functions they are the sources.
pub(crate) fn invocation(ctx: &StageContext<'_>) -> Result<Invocation, StageError> {
    let mut targets = Vec::new();
    if ctx.language.requires_compile() {
        targets.extend(top_level_outputs(
            ctx.source_dir,
            &ctx.layout.output_extension,
        )?);
    }
    targets.extend(removed_names(ctx));

    Ok(Invocation::new("rm", ctx.source_dir)
        .args(["-rf", "--"])
        .args(targets))
}

pub(crate) fn describe(ctx: &StageContext<'_>) -> String {
    let mut parts = vec!["rm -rf --".to_owned()];
    if ctx.language.requires_compile() {
        parts.push(format!("*.{}", ctx.layout.output_extension));
    }
    parts.extend(removed_names(ctx));
    parts.join(" ")
}

fn removed_names(ctx: &StageContext<'_>) -> Vec<String> {
    let mut names = vec![
        ctx.layout.dependency_dir.clone(),
        ARTIFACT_FILE_NAME.to_owned(),
    ];
    names.extend(ctx.layout.lockfiles.iter().cloned());
    names
}
