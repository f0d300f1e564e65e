use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::PackageRequest;

/// Description of a packaged function, handed to whatever registers it as a
/// deployable resource.
///
/// fnpack never interprets `handler`, `role` or `environment`; they are
/// copied from the request as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionManifest {
    pub artifact: PathBuf,
    pub handler: String,
    pub runtime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl FunctionManifest {
    pub fn new(request: &PackageRequest, artifact: &Path) -> Self {
        Self {
            artifact: artifact.to_path_buf(),
            handler: request.handler.clone(),
            runtime: request.language.runtime().to_owned(),
            role: request.role.clone(),
            environment: request.environment.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
