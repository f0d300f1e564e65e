use std::path::Path;

use fnpack_build::Pipeline;

use crate::FunctionArgs;

/// Print the stages a package run would execute, without running anything.
pub fn plan(dir: &Path, function: &FunctionArgs) -> anyhow::Result<()> {
    let (config, request) = super::load_request(dir, function)?;
    let pipeline = Pipeline::new(&config);

    println!(
        "{} ({}, {})",
        request.source_dir.display(),
        request.language,
        request.language.runtime()
    );
    for (i, (stage, command)) in pipeline.plan(&request).iter().enumerate() {
        println!("  {}. {:<10} {command}", i + 1, stage.name());
    }
    if !request.language.requires_compile() {
        println!("  compile skipped: {} sources ship as-is", request.language);
    }
    println!("  artifact: {}", request.artifact_path().display());
    Ok(())
}
