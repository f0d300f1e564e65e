use std::path::PathBuf;
use std::time::{Duration, Instant};

use fnpack_core::{FnpackConfig, LayoutConfig, PackageRequest, ToolchainConfig};

use crate::runner::{ProcessOutput, ProcessRunner, TokioRunner};
use crate::stage::{Stage, StageContext, StageError};

/// Where a pipeline run currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Pending,
    Running(Stage),
    Succeeded(PathBuf),
    /// `cause` is the rendered stage error, tool diagnostics included.
    Failed { stage: Stage, cause: String },
}

/// Result of one stage that completed successfully.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub elapsed: Duration,
    pub output: ProcessOutput,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    /// `<source_dir>/bundle.zip`
    pub artifact: PathBuf,
    pub stages: Vec<StageReport>,
}

/// Runs the packaging stages over a source directory, parameterized over the
/// process runner for testability.
///
/// Stages run strictly one after another; the first failure ends the run and
/// leaves the directory as that stage left it. Packaging the same directory
/// from two pipelines at once is not supported.
pub struct Pipeline<R: ProcessRunner = TokioRunner> {
    runner: R,
    toolchain: ToolchainConfig,
    layout: LayoutConfig,
}

impl Pipeline<TokioRunner> {
    pub fn new(config: &FnpackConfig) -> Self {
        Self::with_runner(TokioRunner, config)
    }
}

impl<R: ProcessRunner> Pipeline<R> {
    pub fn with_runner(runner: R, config: &FnpackConfig) -> Self {
        Self {
            runner,
            toolchain: config.toolchain.clone(),
            layout: config.layout.clone(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn context<'a>(&'a self, request: &'a PackageRequest) -> StageContext<'a> {
        StageContext {
            source_dir: &request.source_dir,
            language: request.language,
            toolchain: &self.toolchain,
            layout: &self.layout,
        }
    }

    fn timeout(&self) -> Option<Duration> {
        self.toolchain.stage_timeout_secs.map(Duration::from_secs)
    }

    /// Ordered stages with the command each would run, without running them.
    pub fn plan(&self, request: &PackageRequest) -> Vec<(Stage, String)> {
        let ctx = self.context(request);
        Stage::plan(request.language)
            .into_iter()
            .map(|stage| (stage, stage.describe(&ctx)))
            .collect()
    }

    /// Package `request.source_dir` into `bundle.zip`.
    pub async fn run(&self, request: &PackageRequest) -> Result<PackageOutcome, PipelineError> {
        self.run_observed(request, &mut |_| {}).await
    }

    /// Like [`run`](Self::run), reporting every state transition to `observe`.
    pub async fn run_observed(
        &self,
        request: &PackageRequest,
        observe: &mut (dyn FnMut(&RunState) + Send),
    ) -> Result<PackageOutcome, PipelineError> {
        observe(&RunState::Pending);
        request.validate_source_dir()?;

        let stages = Stage::plan(request.language);
        let reports = self.run_stages(request, &stages, observe).await?;

        let artifact = request.artifact_path();
        tracing::info!(artifact = %artifact.display(), "package ready");
        observe(&RunState::Succeeded(artifact.clone()));

        Ok(PackageOutcome {
            artifact,
            stages: reports,
        })
    }

    /// Run only the clean stage. This is the recovery step after a failed run.
    pub async fn clean(&self, request: &PackageRequest) -> Result<StageReport, PipelineError> {
        request.validate_source_dir()?;
        let mut reports = self
            .run_stages(request, &[Stage::Clean], &mut |_| {})
            .await?;
        reports.pop().ok_or(PipelineError::NoStages)
    }

    async fn run_stages(
        &self,
        request: &PackageRequest,
        stages: &[Stage],
        observe: &mut (dyn FnMut(&RunState) + Send),
    ) -> Result<Vec<StageReport>, PipelineError> {
        let ctx = self.context(request);
        let timeout = self.timeout();
        let mut reports = Vec::with_capacity(stages.len());

        for &stage in stages {
            observe(&RunState::Running(stage));
            tracing::info!(stage = %stage, dir = %request.source_dir.display(), "stage started");
            let started = Instant::now();

            match stage.execute(&ctx, &self.runner, timeout).await {
                Ok(output) => {
                    let elapsed = started.elapsed();
                    tracing::info!(
                        stage = %stage,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "stage finished"
                    );
                    reports.push(StageReport {
                        stage,
                        elapsed,
                        output,
                    });
                }
                Err(source) => {
                    tracing::warn!(stage = %stage, error = %source, "stage failed");
                    observe(&RunState::Failed {
                        stage,
                        cause: source.to_string(),
                    });
                    return Err(PipelineError::Stage { stage, source });
                }
            }
        }

        Ok(reports)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid package request")]
    Request(#[from] fnpack_core::Error),

    #[error("{stage} stage failed")]
    Stage { stage: Stage, source: StageError },

    #[error("no stages to run")]
    NoStages,
}

impl PipelineError {
    /// The stage that failed, if the run got that far.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            Self::Request(_) | Self::NoStages => None,
        }
    }
}
