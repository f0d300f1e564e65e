use std::path::Path;

use fnpack_core::{CONFIG_FILE_NAME, Language};

const TEMPLATE: &str = r#"[function]
language = "{language}"  # "ts" runs the compiler, "js" ships sources as-is
# handler = "index.handler"
# role = "arn:aws:iam::123456789012:role/my-function"

# [function.environment]
# LOG_LEVEL = "info"

[toolchain]
# installer = ["yarn", "--no-lockfile"]
# compiler = ["tsc"]
# archiver = "zip"
# stage_timeout_secs = 600

[layout]
# dependency_dir = "node_modules"
# output_extension = "js"
# lockfiles = ["package-lock.json"]
"#;

/// Write a commented fnpack.toml for a `language` function into `dir`.
pub fn init(dir: &Path, language: Language) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }

    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        eprintln!("{} already exists, skipping", path.display());
        return Ok(());
    }

    std::fs::write(&path, TEMPLATE.replace("{language}", language.as_str()))?;
    println!("Created {}", path.display());
    println!();
    println!("Next steps:");
    println!("  fnpack doctor {}", dir.display());
    println!("  fnpack package {}", dir.display());
    Ok(())
}
