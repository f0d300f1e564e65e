use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::Language;

/// File name of the archive produced in the source directory.
///
/// Registration layers locate the artifact by this name; changing it is a
/// breaking change.
pub const ARTIFACT_FILE_NAME: &str = "bundle.zip";

/// Entrypoint used when the caller does not supply one.
pub const DEFAULT_HANDLER: &str = "index.handler";

/// Everything the packaging pipeline needs to know about one function.
///
/// `handler`, `environment` and `role` are carried through to the
/// [`FunctionManifest`](crate::FunctionManifest) untouched; the pipeline
/// itself only reads `source_dir` and `language`.
///
/// # Examples
///
/// ```
/// use fnpack_core::{Language, PackageRequest};
///
/// let request = PackageRequest::new("functions/resize", Language::Interpreted)
///     .with_handler("main.handler");
/// assert_eq!(request.handler, "main.handler");
/// assert!(request.artifact_path().ends_with("bundle.zip"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub source_dir: PathBuf,
    pub language: Language,
    pub handler: String,
    pub environment: BTreeMap<String, String>,
    pub role: Option<String>,
}

impl PackageRequest {
    pub fn new(source_dir: impl Into<PathBuf>, language: Language) -> Self {
        Self {
            source_dir: source_dir.into(),
            language,
            handler: DEFAULT_HANDLER.to_owned(),
            environment: BTreeMap::new(),
            role: None,
        }
    }

    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = handler.into();
        self
    }

    pub fn with_environment(mut self, environment: BTreeMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// `<source_dir>/bundle.zip`.
    pub fn artifact_path(&self) -> PathBuf {
        self.source_dir.join(ARTIFACT_FILE_NAME)
    }

    /// Checks that the source directory exists, is a directory, and is
    /// writable. Runs before any stage so configuration problems never leave
    /// a half-cleaned directory behind.
    pub fn validate_source_dir(&self) -> crate::Result<()> {
        check_source_dir(&self.source_dir)
    }
}

fn check_source_dir(dir: &Path) -> crate::Result<()> {
    let metadata = match std::fs::metadata(dir) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(crate::Error::SourceDirMissing(dir.to_path_buf()));
        }
        Err(e) => {
            return Err(crate::Error::SourceDirInaccessible {
                path: dir.to_path_buf(),
                source: e,
            });
        }
    };

    if !metadata.is_dir() {
        return Err(crate::Error::SourceDirNotDirectory(dir.to_path_buf()));
    }

    if metadata.permissions().readonly() {
        return Err(crate::Error::SourceDirReadOnly(dir.to_path_buf()));
    }

    std::fs::read_dir(dir).map_err(|e| crate::Error::SourceDirInaccessible {
        path: dir.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
