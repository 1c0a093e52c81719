//! HCL bodies to canonical maps.
//!
//! - attributes map to entries, last write wins
//! - one block of a name maps to a `Map`; repeated blocks of that name to a `List<Map>`
//! - the first block label is stored under `type` (unless the body sets it), and all labels
//!   under `labels` when there are two or more
//! - expressions other than literals and plain templates are kept as their HCL source text

use super::FormatParser;
use crate::LoadError;
use ::hcl::expr::{Expression, ObjectKey, TemplateExpr};
use ::hcl::{Block, Body, Structure};
use hcpguard_domain::Format;
use hcpguard_types::{Map, SourceLocation, Value};
use std::collections::HashSet;

pub struct HclParser;

impl FormatParser for HclParser {
    fn format(&self) -> Format {
        Format::Hcl
    }

    fn parse(&self, text: &str) -> Result<Value, LoadError> {
        let body: Body = ::hcl::parse(text).map_err(parse_error)?;
        Ok(Value::Map(body_to_map(body)))
    }
}

fn parse_error(err: ::hcl::Error) -> LoadError {
    let location = match &err {
        ::hcl::Error::Parse(parse) => {
            let loc = parse.location();
            Some(SourceLocation {
                line: Some(loc.line() as u32),
                column: Some(loc.column() as u32),
                offset: Some(loc.offset()),
            })
        }
        _ => None,
    };
    LoadError::parse(Format::Hcl, err.to_string(), location)
}

fn body_to_map(body: Body) -> Map {
    let mut map = Map::new();
    let mut block_keys: HashSet<String> = HashSet::new();

    for structure in body {
        match structure {
            Structure::Attribute(attr) => {
                let key = attr.key.to_string();
                block_keys.remove(&key);
                map.insert(key, expr_to_value(attr.expr));
            }
            Structure::Block(block) => {
                let name = block.identifier.to_string();
                let value = Value::Map(block_to_map(block));
                match map.get_mut(&name) {
                    Some(Value::List(items)) if block_keys.contains(&name) => items.push(value),
                    Some(first) if block_keys.contains(&name) => {
                        let prev = std::mem::take(first);
                        *first = Value::List(vec![prev, value]);
                    }
                    _ => {
                        map.insert(name.clone(), value);
                        block_keys.insert(name);
                    }
                }
            }
        }
    }

    map
}

fn block_to_map(block: Block) -> Map {
    let labels: Vec<String> = block
        .labels
        .iter()
        .map(|label| label.as_str().to_string())
        .collect();
    let mut map = body_to_map(block.body);

    if let Some(first) = labels.first()
        && !map.contains_key("type")
    {
        map.shift_insert(0, "type".to_string(), Value::from(first.as_str()));
    }
    if labels.len() >= 2 && !map.contains_key("labels") {
        let list = labels.into_iter().map(Value::from).collect();
        map.insert("labels".to_string(), Value::List(list));
    }

    map
}

fn expr_to_value(expr: Expression) -> Value {
    match expr {
        Expression::Null => Value::Null,
        Expression::Bool(b) => Value::Bool(b),
        Expression::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else {
                n.as_f64().map_or(Value::Null, Value::from)
            }
        }
        Expression::String(s) => Value::String(s),
        Expression::Array(items) => Value::List(items.into_iter().map(expr_to_value).collect()),
        Expression::Object(object) => Value::Map(
            object
                .into_iter()
                .map(|(key, value)| (object_key(key), expr_to_value(value)))
                .collect(),
        ),
        Expression::TemplateExpr(template) => match *template {
            TemplateExpr::QuotedString(s) => Value::String(s),
            TemplateExpr::Heredoc(heredoc) => Value::String(heredoc.template),
        },
        Expression::Parenthesis(inner) => expr_to_value(*inner),
        other => Value::String(render(&other)),
    }
}

fn object_key(key: ObjectKey) -> String {
    match key {
        ObjectKey::Identifier(ident) => ident.to_string(),
        ObjectKey::Expression(expr) => match expr_to_value(expr) {
            Value::String(s) => s,
            other => other.to_string(),
        },
        #[allow(unreachable_patterns)]
        other => format!("{other:?}"),
    }
}

fn render(expr: &Expression) -> String {
    ::hcl::format::to_string(expr).unwrap_or_else(|_| format!("{expr:?}"))
}
