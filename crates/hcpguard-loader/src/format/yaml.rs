use super::FormatParser;
use crate::LoadError;
use hcpguard_domain::Format;
use hcpguard_types::{SourceLocation, Value};

pub struct YamlParser;

impl FormatParser for YamlParser {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn parse(&self, text: &str) -> Result<Value, LoadError> {
        let mut doc: serde_yaml::Value = serde_yaml::from_str(text).map_err(parse_error)?;
        // `<<` merge keys are resolved before conversion.
        doc.apply_merge().map_err(parse_error)?;
        serde_yaml::from_value(doc).map_err(parse_error)
    }
}

fn parse_error(err: serde_yaml::Error) -> LoadError {
    let location = err.location().map(|loc| SourceLocation {
        line: Some(loc.line() as u32),
        column: Some(loc.column() as u32),
        offset: Some(loc.index()),
    });
    LoadError::parse(Format::Yaml, err.to_string(), location)
}
