use fnpack_core::{Error, FnpackConfig, Language};
use std::path::Path;
use tempfile::TempDir;

fn write_config(dir: &Path, toml: &str) {
    std::fs::write(dir.join("fnpack.toml"), toml).unwrap();
}

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = FnpackConfig::load(tmp.path()).unwrap();

    assert_eq!(config.function.language, None);
    assert_eq!(config.function.handler, "index.handler");
    assert!(config.function.role.is_none());
    assert!(config.function.environment.is_empty());
    assert_eq!(config.toolchain.installer, vec!["yarn", "--no-lockfile"]);
    assert_eq!(config.toolchain.compiler, vec!["tsc"]);
    assert_eq!(config.toolchain.archiver, "zip");
    assert!(config.toolchain.stage_timeout_secs.is_none());
    assert_eq!(config.layout.dependency_dir, "node_modules");
    assert_eq!(config.layout.output_extension, "js");
    assert_eq!(config.layout.lockfiles, vec!["package-lock.json"]);
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    write_config(
        tmp.path(),
        r#"
[function]
language = "js"
handler = "main.run"
role = "arn:aws:iam::123456789012:role/resize"

[function.environment]
BUCKET = "thumbnails"
STAGE = "prod"

[toolchain]
installer = ["npm", "install", "--no-package-lock"]
compiler = ["npx", "tsc", "-p", "."]
archiver = "/usr/bin/zip"
stage_timeout_secs = 120

[layout]
dependency_dir = "vendor"
output_extension = "mjs"
lockfiles = ["package-lock.json", "yarn.lock"]
"#,
    );

    let config = FnpackConfig::load(tmp.path()).unwrap();

    assert_eq!(config.function.language, Some(Language::Interpreted));
    assert_eq!(config.function.handler, "main.run");
    assert_eq!(
        config.function.role.as_deref(),
        Some("arn:aws:iam::123456789012:role/resize")
    );
    assert_eq!(config.function.environment["BUCKET"], "thumbnails");
    assert_eq!(config.function.environment["STAGE"], "prod");
    assert_eq!(
        config.toolchain.installer,
        vec!["npm", "install", "--no-package-lock"]
    );
    assert_eq!(config.toolchain.compiler, vec!["npx", "tsc", "-p", "."]);
    assert_eq!(config.toolchain.archiver, "/usr/bin/zip");
    assert_eq!(config.toolchain.stage_timeout_secs, Some(120));
    assert_eq!(config.layout.dependency_dir, "vendor");
    assert_eq!(config.layout.output_extension, "mjs");
    assert_eq!(
        config.layout.lockfiles,
        vec!["package-lock.json", "yarn.lock"]
    );
}

#[test]
fn load_partial_config_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    write_config(
        tmp.path(),
        r#"
[function]
language = "js"
"#,
    );

    let config = FnpackConfig::load(tmp.path()).unwrap();

    assert_eq!(config.function.language, Some(Language::Interpreted));
    // Defaults preserved
    assert_eq!(config.function.handler, "index.handler");
    assert_eq!(config.toolchain.archiver, "zip");
    assert_eq!(config.layout.dependency_dir, "node_modules");
}

#[test]
fn language_accepts_long_aliases() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "[function]\nlanguage = \"interpreted\"\n");

    let config = FnpackConfig::load(tmp.path()).unwrap();
    assert_eq!(config.function.language, Some(Language::Interpreted));
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "not valid {{{{ toml");

    let result = FnpackConfig::load(tmp.path());
    assert!(matches!(result, Err(Error::ConfigParse { .. })));

    let err = result.unwrap_err().to_string();
    assert!(err.contains("parse"));
}

#[test]
fn load_unknown_language_is_parse_error() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "[function]\nlanguage = \"cobol\"\n");

    let result = FnpackConfig::load(tmp.path());
    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}

#[test]
fn load_empty_config_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "");

    let config = FnpackConfig::load(tmp.path()).unwrap();
    assert_eq!(config.function.handler, "index.handler");
}

// ── Validation Tests ──

#[test]
fn rejects_empty_installer() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "[toolchain]\ninstaller = []\n");

    let result = FnpackConfig::load(tmp.path());
    assert!(matches!(
        result,
        Err(Error::InvalidConfig { field: "toolchain.installer", .. })
    ));
}

#[test]
fn rejects_zero_timeout() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "[toolchain]\nstage_timeout_secs = 0\n");

    let result = FnpackConfig::load(tmp.path());
    assert!(matches!(
        result,
        Err(Error::InvalidConfig { field: "toolchain.stage_timeout_secs", .. })
    ));
}

#[test]
fn rejects_dependency_dir_outside_source() {
    for bad in ["../node_modules", "/tmp/node_modules", "a/b", ".", ""] {
        let config = FnpackConfig {
            layout: fnpack_core::LayoutConfig {
                dependency_dir: bad.to_owned(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(
            matches!(
                config.validate(),
                Err(Error::InvalidConfig { field: "layout.dependency_dir", .. })
            ),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn rejects_lockfile_with_path_separator() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "[layout]\nlockfiles = [\"../package-lock.json\"]\n");

    let result = FnpackConfig::load(tmp.path());
    assert!(matches!(
        result,
        Err(Error::InvalidConfig { field: "layout.lockfiles", .. })
    ));
}

#[test]
fn rejects_dotted_output_extension() {
    for bad in [".js", "*.js", ""] {
        let config = FnpackConfig {
            layout: fnpack_core::LayoutConfig {
                output_extension: bad.to_owned(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err(), "{bad:?} should be rejected");
    }
}

// ── Request construction ──

#[test]
fn request_carries_function_table() {
    let tmp = TempDir::new().unwrap();
    write_config(
        tmp.path(),
        r#"
[function]
language = "js"
handler = "app.main"
role = "lambda-exec"

[function.environment]
LOG_LEVEL = "debug"
"#,
    );

    let config = FnpackConfig::load(tmp.path()).unwrap();
    let request = config.request(tmp.path()).unwrap();

    assert_eq!(request.source_dir, tmp.path());
    assert_eq!(request.language, Language::Interpreted);
    assert_eq!(request.handler, "app.main");
    assert_eq!(request.role.as_deref(), Some("lambda-exec"));
    assert_eq!(request.environment["LOG_LEVEL"], "debug");
    assert_eq!(request.artifact_path(), tmp.path().join("bundle.zip"));
}

#[test]
fn request_requires_language() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("index.js"), "exports.handler = 1;\n").unwrap();

    let config = FnpackConfig::load(tmp.path()).unwrap();
    let result = config.request(tmp.path());

    assert!(matches!(result, Err(Error::LanguageNotSet(ref dir)) if dir == tmp.path()));
    let message = result.unwrap_err().to_string();
    assert!(message.contains("--language"), "{message}");
}

#[test]
fn request_uses_language_from_table() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "[function]\nlanguage = \"ts\"\n");

    let config = FnpackConfig::load(tmp.path()).unwrap();
    assert_eq!(
        config.request(tmp.path()).unwrap().language,
        Language::Compiled
    );
}
