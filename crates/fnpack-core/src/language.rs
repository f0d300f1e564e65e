use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language variant of a function's source directory.
///
/// The variant decides whether the pipeline carries a compile stage, and
/// whether top-level `.js` files are build outputs or sources. There is no
/// default.
///
/// # Examples
///
/// ```
/// use fnpack_core::Language;
///
/// let lang: Language = "ts".parse().unwrap();
/// assert!(lang.requires_compile());
/// assert_eq!(lang.runtime(), "nodejs12.x");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// TypeScript sources that `tsc` turns into top-level `.js` files.
    #[serde(rename = "ts", alias = "compiled")]
    Compiled,
    /// Plain JavaScript, bundled as written.
    #[serde(rename = "js", alias = "interpreted")]
    Interpreted,
}

impl Language {
    pub fn requires_compile(self) -> bool {
        matches!(self, Self::Compiled)
    }

    /// Runtime identifier passed through to the registration layer.
    pub fn runtime(self) -> &'static str {
        match self {
            Self::Compiled | Self::Interpreted => "nodejs12.x",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compiled => "ts",
            Self::Interpreted => "js",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ts" | "typescript" | "compiled" => Ok(Self::Compiled),
            "js" | "javascript" | "interpreted" => Ok(Self::Interpreted),
            _ => Err(crate::Error::UnknownLanguage(s.to_owned())),
        }
    }
}
