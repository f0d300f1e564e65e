use std::collections::HashSet;
use std::path::{Path, PathBuf};

use fnpack_build::{Pipeline, RunState};
use fnpack_core::FunctionManifest;
use tokio::task::JoinSet;

use crate::FunctionArgs;

/// Package every directory concurrently. Each directory runs its own
/// pipeline; a failure in one does not stop the others.
pub async fn package(dirs: Vec<PathBuf>, function: FunctionArgs, json: bool) -> anyhow::Result<()> {
    let dirs = if dirs.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        dirs
    };
    let dirs = dedup_dirs(dirs);

    let mut tasks = JoinSet::new();
    for (index, dir) in dirs.iter().cloned().enumerate() {
        let function = function.clone();
        tasks.spawn(async move {
            let result = package_one(&dir, &function).await;
            (index, result)
        });
    }

    let mut results: Vec<Option<anyhow::Result<FunctionManifest>>> =
        dirs.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        results[index] = Some(result);
    }

    let mut manifests = Vec::new();
    let mut failed = 0usize;
    for (dir, result) in dirs.iter().zip(results) {
        match result {
            Some(Ok(manifest)) => manifests.push(manifest),
            Some(Err(e)) => {
                failed += 1;
                eprintln!("error: {}: {e:#}", dir.display());
            }
            None => {
                failed += 1;
                eprintln!("error: {}: packaging task did not report", dir.display());
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&manifests)?);
    } else {
        for manifest in &manifests {
            println!("{}", manifest.artifact.display());
            println!("  handler: {}", manifest.handler);
            println!("  runtime: {}", manifest.runtime);
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} function(s) failed to package", dirs.len());
    }
    Ok(())
}

async fn package_one(dir: &Path, function: &FunctionArgs) -> anyhow::Result<FunctionManifest> {
    let (config, request) = super::load_request(dir, function)?;
    let pipeline = Pipeline::new(&config);
    let label = dir.display().to_string();

    let outcome = pipeline
        .run_observed(&request, &mut |state| report_progress(&label, state))
        .await?;
    Ok(FunctionManifest::new(&request, &outcome.artifact))
}

fn report_progress(label: &str, state: &RunState) {
    match state {
        RunState::Pending => {}
        RunState::Running(stage) => eprintln!("[{label}] {stage}"),
        RunState::Succeeded(artifact) => eprintln!("[{label}] done: {}", artifact.display()),
        RunState::Failed { stage, cause } => eprintln!("[{label}] {stage} failed: {cause}"),
    }
}

/// Two pipelines must never share a directory, so paths that resolve to the
/// same place collapse into the first one given.
fn dedup_dirs(dirs: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let key = match dir.canonicalize() {
            Ok(canonical) => canonical,
            Err(e) => {
                // Left for the pipeline to reject with a proper message.
                tracing::debug!(dir = %dir.display(), error = %e, "cannot canonicalize");
                dir.clone()
            }
        };
        if seen.insert(key) {
            unique.push(dir);
        } else {
            tracing::warn!(dir = %dir.display(), "directory given more than once, packaging it once");
        }
    }
    unique
}
