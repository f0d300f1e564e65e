use std::path::Path;

use fnpack_build::Pipeline;

use crate::FunctionArgs;

/// Run the clean stage on its own.
pub async fn clean(dir: &Path, function: &FunctionArgs) -> anyhow::Result<()> {
    let (config, request) = super::load_request(dir, function)?;
    let pipeline = Pipeline::new(&config);
    let report = pipeline.clean(&request).await?;

    println!(
        "Cleaned {} ({} ms)",
        request.source_dir.display(),
        report.elapsed.as_millis()
    );
    Ok(())
}
