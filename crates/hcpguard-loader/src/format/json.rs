use super::FormatParser;
use crate::LoadError;
use hcpguard_domain::Format;
use hcpguard_types::{SourceLocation, Value};

pub struct JsonParser;

impl FormatParser for JsonParser {
    fn format(&self) -> Format {
        Format::Json
    }

    fn parse(&self, text: &str) -> Result<Value, LoadError> {
        serde_json::from_str(text).map_err(|err| {
            let location = (err.line() > 0).then(|| SourceLocation {
                line: Some(err.line() as u32),
                column: Some(err.column() as u32),
                offset: None,
            });
            LoadError::parse(Format::Json, err.to_string(), location)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_number_and_string_literals_apart() {
        let v = JsonParser
            .parse(r#"{"port": 8200, "quoted": "8200", "ratio": 1.0, "none": null}"#)
            .expect("valid json");
        assert_eq!(v.get("port"), Some(&Value::from(8200)));
        assert_eq!(v.get("quoted"), Some(&Value::from("8200")));
        assert_eq!(v.get("ratio"), Some(&Value::from(1)));
        assert_eq!(v.get("none"), Some(&Value::Null));
    }

    #[test]
    fn errors_carry_line_and_column() {
        let err = JsonParser.parse("{\n  \"a\": ,\n}").expect_err("invalid json");
        let loc = err.location().expect("location");
        assert_eq!(loc.line, Some(2));
        assert!(loc.column.is_some());
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        let err = JsonParser.parse("").expect_err("empty");
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
