use std::collections::BTreeMap;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::{Language, PackageRequest};

/// File name of the optional per-function config.
pub const CONFIG_FILE_NAME: &str = "fnpack.toml";

/// fnpack.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FnpackConfig {
    #[serde(default)]
    pub function: FunctionConfig,
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionConfig {
    /// Source language (`ts` or `js`). Required before a request can be built.
    #[serde(default)]
    pub language: Option<Language>,
    /// Entrypoint (defaults to index.handler)
    #[serde(default = "default_handler")]
    pub handler: String,
    /// Execution role, passed through untouched
    pub role: Option<String>,
    /// Runtime environment variables, passed through untouched
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Dependency installer command line. Must not read or write a lockfile.
    #[serde(default = "default_installer")]
    pub installer: Vec<String>,
    /// Compiler command line, only run for `ts` functions
    #[serde(default = "default_compiler")]
    pub compiler: Vec<String>,
    /// Archiver binary (zip-compatible, reads names from stdin with `-@`)
    #[serde(default = "default_archiver")]
    pub archiver: String,
    /// Upper bound on each stage's external process, in seconds
    #[serde(default)]
    pub stage_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Directory the installer materializes dependencies into
    #[serde(default = "default_dependency_dir")]
    pub dependency_dir: String,
    /// Extension of the top-level files that end up in the bundle
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
    /// Lockfiles removed before every install
    #[serde(default = "default_lockfiles")]
    pub lockfiles: Vec<String>,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        Self {
            language: None,
            handler: default_handler(),
            role: None,
            environment: BTreeMap::new(),
        }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            installer: default_installer(),
            compiler: default_compiler(),
            archiver: default_archiver(),
            stage_timeout_secs: None,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            dependency_dir: default_dependency_dir(),
            output_extension: default_output_extension(),
            lockfiles: default_lockfiles(),
        }
    }
}

impl FnpackConfig {
    /// Load from fnpack.toml in the given directory, or return defaults if not found.
    ///
    /// The loaded config is validated before it is returned.
    pub fn load(source_dir: &Path) -> crate::Result<Self> {
        let config_path = source_dir.join(CONFIG_FILE_NAME);
        let config = if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })?
        } else {
            tracing::debug!(dir = %source_dir.display(), "no fnpack.toml, using defaults");
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.toolchain.installer.is_empty() {
            return Err(invalid("toolchain.installer", "command must not be empty"));
        }
        if self.toolchain.compiler.is_empty() {
            return Err(invalid("toolchain.compiler", "command must not be empty"));
        }
        if self.toolchain.archiver.trim().is_empty() {
            return Err(invalid("toolchain.archiver", "command must not be empty"));
        }
        if self.toolchain.stage_timeout_secs == Some(0) {
            return Err(invalid(
                "toolchain.stage_timeout_secs",
                "timeout must be at least one second",
            ));
        }

        validate_entry_name("layout.dependency_dir", &self.layout.dependency_dir)?;
        for lockfile in &self.layout.lockfiles {
            validate_entry_name("layout.lockfiles", lockfile)?;
        }

        let ext = &self.layout.output_extension;
        if ext.is_empty() || ext.contains(['.', '/', '\\', '*']) {
            return Err(invalid(
                "layout.output_extension",
                "must be a bare extension such as `js`",
            ));
        }

        Ok(())
    }

    /// Build a [`PackageRequest`] for `source_dir` from the `[function]` table.
    ///
    /// Fails with [`Error::LanguageNotSet`](crate::Error::LanguageNotSet) when
    /// no language was configured.
    pub fn request(&self, source_dir: &Path) -> crate::Result<PackageRequest> {
        let language = self
            .function
            .language
            .ok_or_else(|| crate::Error::LanguageNotSet(source_dir.to_path_buf()))?;
        let mut request = PackageRequest::new(source_dir, language)
            .with_handler(self.function.handler.clone())
            .with_environment(self.function.environment.clone());
        request.role = self.function.role.clone();
        Ok(request)
    }
}

/// Layout entries are deleted with `rm -rf`, so they must stay a single
/// plain name inside the source directory.
fn validate_entry_name(field: &'static str, name: &str) -> crate::Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid(
            field,
            &format!("{name:?} must be a single name inside the source directory"),
        )),
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::Error {
    crate::Error::InvalidConfig {
        field,
        reason: reason.to_owned(),
    }
}

fn default_handler() -> String {
    crate::DEFAULT_HANDLER.to_owned()
}

fn default_installer() -> Vec<String> {
    vec!["yarn".to_owned(), "--no-lockfile".to_owned()]
}

fn default_compiler() -> Vec<String> {
    vec!["tsc".to_owned()]
}

fn default_archiver() -> String {
    "zip".to_owned()
}

fn default_dependency_dir() -> String {
    "node_modules".to_owned()
}

fn default_output_extension() -> String {
    "js".to_owned()
}

fn default_lockfiles() -> Vec<String> {
    vec!["package-lock.json".to_owned()]
}
