//! Install stage: materialize dependencies without a lockfile.

use crate::runner::Invocation;
use crate::stage::{StageContext, StageError};

pub(crate) fn invocation(ctx: &StageContext<'_>) -> Result<Invocation, StageError> {
    Invocation::from_command_line(&ctx.toolchain.installer, ctx.source_dir).ok_or(
        StageError::EmptyCommand {
            field: "toolchain.installer",
        },
    )
}
