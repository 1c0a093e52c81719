use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical target path used in reports.
///
/// Normalization rules are intentionally simple and deterministic:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - absolute inputs are preserved as given
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TargetPath(String);

impl Default for TargetPath {
    fn default() -> Self {
        TargetPath::new("<memory>")
    }
}

impl TargetPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while v.starts_with("./") {
            v = v.trim_start_matches("./").to_string();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        Utf8Path::new(self.as_str())
            .extension()
            .map(|e| e.to_ascii_lowercase())
    }
}

impl std::fmt::Display for TargetPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Utf8Path> for TargetPath {
    fn from(value: &Utf8Path) -> Self {
        TargetPath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for TargetPath {
    fn from(value: Utf8PathBuf) -> Self {
        TargetPath::new(value.as_str())
    }
}
