use std::path::Path;

use fnpack_build::{CheckResult, Doctor};
use fnpack_core::{CONFIG_FILE_NAME, FnpackConfig, Language};

use crate::FunctionArgs;

pub async fn doctor(dir: &Path, function: &FunctionArgs) -> anyhow::Result<()> {
    // A broken fnpack.toml is reported, and the default toolchain is probed instead.
    let (mut config, config_check) = match FnpackConfig::load(dir) {
        Ok(config) if dir.join(CONFIG_FILE_NAME).exists() => (config, CheckResult::ok("Found")),
        Ok(config) => (config, CheckResult::ok("Not found, using defaults")),
        Err(e) => (FnpackConfig::default(), CheckResult::fail(&e.to_string())),
    };
    super::apply_overrides(&mut config, function);

    // Without a language every tool is probed, the compiler included.
    let language = match config.function.language {
        Some(language) => language,
        None => Language::Compiled,
    };

    let doctor = Doctor::new();
    let mut report = doctor.check(&config, language, dir).await;
    report.config_file = config_check;

    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed, see above for details");
    }

    Ok(())
}
