use super::FormatParser;
use crate::LoadError;
use crate::error::line_col;
use hcpguard_domain::Format;
use hcpguard_types::Value;

pub struct TomlParser;

impl FormatParser for TomlParser {
    fn format(&self) -> Format {
        Format::Toml
    }

    fn parse(&self, text: &str) -> Result<Value, LoadError> {
        ::toml::from_str(text).map_err(|err| {
            let location = err.span().map(|span| line_col(text, span.start));
            LoadError::parse(Format::Toml, err.message().trim().to_string(), location)
        })
    }
}
