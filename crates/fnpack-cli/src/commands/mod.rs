mod clean;
mod doctor;
mod init;
mod package;
mod plan;

use std::path::Path;

use fnpack_core::{FnpackConfig, PackageRequest};

use crate::FunctionArgs;

pub use clean::clean;
pub use doctor::doctor;
pub use init::init;
pub use package::package;
pub use plan::plan;

/// Load fnpack.toml from `dir`, apply command-line overrides and build the
/// request for that directory.
pub(crate) fn load_request(
    dir: &Path,
    overrides: &FunctionArgs,
) -> anyhow::Result<(FnpackConfig, PackageRequest)> {
    let mut config = FnpackConfig::load(dir)?;
    apply_overrides(&mut config, overrides);
    let request = config.request(dir)?;
    Ok((config, request))
}

pub(crate) fn apply_overrides(config: &mut FnpackConfig, overrides: &FunctionArgs) {
    if let Some(language) = overrides.language {
        config.function.language = Some(language);
    }
    if let Some(handler) = &overrides.handler {
        config.function.handler = handler.clone();
    }
}
