use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fnpack_core::{Language, LayoutConfig, ToolchainConfig};

use crate::runner::{Invocation, ProcessError, ProcessOutput, ProcessRunner};
use crate::{bundle, clean, compile, install, normalize};

/// One step of the packaging pipeline.
///
/// Variants are declared in execution order; `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Clean,
    Install,
    Compile,
    Normalize,
    Bundle,
}

impl Stage {
    /// The ordered stage list for a language variant. Interpreted sources
    /// never get a compile stage.
    pub fn plan(language: Language) -> Vec<Stage> {
        let mut stages = vec![Stage::Clean, Stage::Install];
        if language.requires_compile() {
            stages.push(Stage::Compile);
        }
        stages.extend([Stage::Normalize, Stage::Bundle]);
        stages
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Install => "install",
            Self::Compile => "compile",
            Self::Normalize => "normalize",
            Self::Bundle => "bundle",
        }
    }

    /// Build the process invocation for this stage from the current state of
    /// the source directory. Does not touch the filesystem beyond reading it.
    pub fn invocation(self, ctx: &StageContext<'_>) -> Result<Invocation, StageError> {
        match self {
            Self::Clean => clean::invocation(ctx),
            Self::Install => install::invocation(ctx),
            Self::Compile => compile::invocation(ctx),
            Self::Normalize => normalize::invocation(ctx),
            Self::Bundle => bundle::invocation(ctx),
        }
    }

    /// Human-readable command for `fnpack plan`, independent of what is
    /// currently on disk.
    pub fn describe(self, ctx: &StageContext<'_>) -> String {
        match self {
            Self::Clean => clean::describe(ctx),
            Self::Install => ctx.toolchain.installer.join(" "),
            Self::Compile => ctx.toolchain.compiler.join(" "),
            Self::Normalize => normalize::describe(ctx),
            Self::Bundle => bundle::describe(ctx),
        }
    }

    /// Run this stage to completion.
    ///
    /// `timeout` bounds the external process only; expiry drops the process
    /// future, which kills the child.
    pub async fn execute<R: ProcessRunner>(
        self,
        ctx: &StageContext<'_>,
        runner: &R,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, StageError> {
        if self == Self::Bundle {
            bundle::remove_stale_archive(ctx.source_dir)?;
        }

        let invocation = self.invocation(ctx)?;
        tracing::debug!(stage = %self, command = %invocation.command_line(), "invoking");

        let run = runner.run(&invocation);
        let output = match timeout {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|elapsed| StageError::TimedOut {
                    limit,
                    source: elapsed,
                })??,
            None => run.await?,
        };
        Ok(output)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a stage needs to know: where to run and which tools/layout to use.
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub source_dir: &'a Path,
    pub language: Language,
    pub toolchain: &'a ToolchainConfig,
    pub layout: &'a LayoutConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("failed to scan {path}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8 and cannot be passed to the archiver")]
    NonUtf8Path { path: PathBuf },

    #[error("failed to remove previous archive {path}")]
    RemoveArchive {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("`{field}` command is empty")]
    EmptyCommand { field: &'static str },

    #[error("nothing to bundle — no {dependency_dir}/ and no top-level *.{extension} files")]
    NothingToBundle {
        dependency_dir: String,
        extension: String,
    },

    #[error("process did not finish within {}s", limit.as_secs())]
    TimedOut {
        limit: Duration,
        source: tokio::time::error::Elapsed,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),
}
