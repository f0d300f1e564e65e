use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("unknown language {0:?} — expected `ts` or `js`")]
    UnknownLanguage(String),

    #[error("no language set for {0}: set `language = \"ts\"` or `\"js\"` under [function] in fnpack.toml, or pass --language")]
    LanguageNotSet(PathBuf),

    // ── Source directory checks ──
    #[error("source directory {0} does not exist")]
    SourceDirMissing(PathBuf),

    #[error("source path {0} is not a directory")]
    SourceDirNotDirectory(PathBuf),

    #[error("failed to inspect source directory {path}")]
    SourceDirInaccessible {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("source directory {0} is read-only — packaging rewrites it in place")]
    SourceDirReadOnly(PathBuf),
}
