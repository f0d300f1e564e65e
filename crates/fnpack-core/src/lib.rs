//! Core types and configuration for fnpack.
//!
//! This crate defines the `fnpack.toml` schema ([`FnpackConfig`]), the
//! [`PackageRequest`] consumed by the packaging pipeline, the
//! [`FunctionManifest`] handed to registration layers, and shared error types.

pub mod config;
pub mod error;
pub mod language;
pub mod manifest;
pub mod request;

pub use config::{CONFIG_FILE_NAME, FnpackConfig, FunctionConfig, LayoutConfig, ToolchainConfig};
pub use error::{Error, Result};
pub use language::Language;
pub use manifest::FunctionManifest;
pub use request::{ARTIFACT_FILE_NAME, DEFAULT_HANDLER, PackageRequest};
