use hcpguard_types::{TargetPath, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source format a document was parsed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Hcl,
    Json,
    Yaml,
    Toml,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Hcl, Format::Json, Format::Yaml, Format::Toml];

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Hcl => "hcl",
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
        }
    }

    /// Map a (case-insensitive) file extension to a format.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_ascii_lowercase().as_str() {
            "hcl" | "tf" | "nomad" => Some(Format::Hcl),
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = hcpguard_types::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| hcpguard_types::UnknownVariant {
                kind: "format",
                value: s.to_string(),
                expected: "hcl, json, yaml, toml".to_string(),
            })
    }
}

/// A parsed configuration file: the canonical value tree plus where it came from.
///
/// Fields are private so a document cannot be mutated once built.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalDocument {
    root: Value,
    source: TargetPath,
    format: Format,
}

impl CanonicalDocument {
    pub fn new(root: Value, source: TargetPath, format: Format) -> Self {
        Self {
            root,
            source,
            format,
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn source(&self) -> &TargetPath {
        &self.source
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn into_root(self) -> Value {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_map_to_formats() {
        assert_eq!(Format::from_extension("HCL"), Some(Format::Hcl));
        assert_eq!(Format::from_extension("tf"), Some(Format::Hcl));
        assert_eq!(Format::from_extension("nomad"), Some(Format::Hcl));
        assert_eq!(Format::from_extension("yml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("toml"), Some(Format::Toml));
        assert_eq!(Format::from_extension("ini"), None);
    }

    #[test]
    fn format_tokens_parse() {
        for format in Format::ALL {
            assert_eq!(format.to_string().parse::<Format>(), Ok(format));
        }
        assert!("xml".parse::<Format>().is_err());
    }
}
