//! One parser per source format, all behind [`FormatParser`].

mod hcl;
mod json;
mod toml;
mod yaml;

use crate::LoadError;
use hcpguard_domain::Format;
use hcpguard_types::Value;

pub use self::hcl::HclParser;
pub use self::json::JsonParser;
pub use self::toml::TomlParser;
pub use self::yaml::YamlParser;

/// Text of one format to a canonical value tree.
pub trait FormatParser: Sync {
    fn format(&self) -> Format;

    /// Parse `text`; the root may be any value (callers decide whether it is acceptable).
    fn parse(&self, text: &str) -> Result<Value, LoadError>;
}

pub fn parser_for(format: Format) -> &'static dyn FormatParser {
    match format {
        Format::Hcl => &HclParser,
        Format::Json => &JsonParser,
        Format::Yaml => &YamlParser,
        Format::Toml => &TomlParser,
    }
}

/// Order used when nothing else identifies the format.
pub const SNIFF_ORDER: [Format; 4] = [Format::Json, Format::Hcl, Format::Toml, Format::Yaml];
