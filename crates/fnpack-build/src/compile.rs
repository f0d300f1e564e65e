//! Compile stage, only planned for compiled languages.

use crate::runner::Invocation;
use crate::stage::{StageContext, StageError};

pub(crate) fn invocation(ctx: &StageContext<'_>) -> Result<Invocation, StageError> {
    Invocation::from_command_line(&ctx.toolchain.compiler, ctx.source_dir).ok_or(
        StageError::EmptyCommand {
            field: "toolchain.compiler",
        },
    )
}
