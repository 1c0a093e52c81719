//! YAML rule files.
//!
//! A rule file is either a top-level list of rule records or a map with a `rules` list. An empty
//! file declares no rules.

use camino::Utf8Path;
use hcpguard_domain::RawRule;
use hcpguard_types::Value;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RuleSourceError {
    #[error("failed to read rule file {name}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in rule file {name}: {message}")]
    Yaml { name: String, message: String },

    #[error("rule file {name}: {reason}")]
    Shape { name: String, reason: String },
}

/// Read and parse a rule file from disk.
pub fn load_rule_file(path: &Utf8Path) -> Result<Vec<RawRule>, RuleSourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| RuleSourceError::Io {
        name: path.to_string(),
        source,
    })?;
    parse_rule_source(path.as_str(), &text)
}

/// Parse rule records from YAML text; `name` is used in error messages.
pub fn parse_rule_source(name: &str, text: &str) -> Result<Vec<RawRule>, RuleSourceError> {
    let root: Value = serde_yaml::from_str(text).map_err(|err| RuleSourceError::Yaml {
        name: name.to_string(),
        message: err.to_string(),
    })?;

    let shape = |reason: String| RuleSourceError::Shape {
        name: name.to_string(),
        reason,
    };

    let entries = match root {
        Value::Null => Vec::new(),
        Value::List(items) => items,
        Value::Map(mut map) => match map.shift_remove("rules") {
            Some(Value::List(items)) => items,
            Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(shape(format!(
                    "'rules' must be a list, found {}",
                    other.type_name()
                )));
            }
            None => {
                return Err(shape(
                    "expected a list of rules or a map with a 'rules' key".to_string(),
                ));
            }
        },
        other => {
            return Err(shape(format!(
                "expected a list of rules, found {}",
                other.type_name()
            )));
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match entry {
            Value::Map(record) => records.push(record),
            other => {
                return Err(shape(format!(
                    "entry {index} is a {}, expected a map",
                    other.type_name()
                )));
            }
        }
    }

    debug!(source = name, rules = records.len(), "rule source parsed");
    Ok(records)
}
