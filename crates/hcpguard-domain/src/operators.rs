//! Pass/fail semantics for each operator.
//!
//! Nothing here raises: operands that cannot be compared produce a fail with a note.

use crate::path::Resolution;
use hcpguard_types::ids::NOTE_TYPE_MISMATCH;
use hcpguard_types::{Operator, Value};
use regex::Regex;
use std::cmp::Ordering;

/// A rule's `expected` value, prepared for its operator.
#[derive(Clone, Debug)]
pub enum Expected {
    /// `exists` / `absent` take no operand.
    Nothing,
    Value(Value),
    OneOf(Vec<Value>),
    Pattern(Regex),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub passed: bool,
    pub note: Option<String>,
}

impl Outcome {
    fn pass() -> Self {
        Self {
            passed: true,
            note: None,
        }
    }

    fn fail() -> Self {
        Self::default()
    }

    fn from_bool(passed: bool) -> Self {
        Self { passed, note: None }
    }

    fn mismatch(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            note: Some(format!("{NOTE_TYPE_MISMATCH}: {}", detail.into())),
        }
    }
}

pub fn evaluate(op: Operator, resolution: &Resolution<'_>, expected: &Expected) -> Outcome {
    match resolution {
        Resolution::Missing => on_missing(op, expected),
        Resolution::Present(value) => on_value(op, value, expected),
        Resolution::Projected(items) => match op {
            Operator::Exists => Outcome::from_bool(!items.is_empty()),
            Operator::Absent => Outcome::from_bool(items.is_empty()),
            _ => {
                for (index, item) in items.iter().enumerate() {
                    let outcome = on_value(op, item, expected);
                    if !outcome.passed {
                        return Outcome {
                            passed: false,
                            note: outcome.note.map(|n| format!("element {index}: {n}")),
                        };
                    }
                }
                Outcome::pass()
            }
        },
    }
}

fn on_missing(op: Operator, expected: &Expected) -> Outcome {
    match op {
        Operator::Exists | Operator::Equals | Operator::In => Outcome::fail(),
        Operator::Absent => Outcome::pass(),
        // A missing key is "not equal" to anything but an explicit null.
        Operator::NotEquals => Outcome::from_bool(!matches!(expected, Expected::Value(Value::Null))),
        Operator::Regex | Operator::Gt | Operator::Lt => {
            Outcome::mismatch(format!("{op} needs a value but the path is missing"))
        }
    }
}

fn on_value(op: Operator, actual: &Value, expected: &Expected) -> Outcome {
    match (op, expected) {
        (Operator::Exists, _) => Outcome::pass(),
        (Operator::Absent, _) => Outcome::fail(),
        (Operator::Equals, Expected::Value(want)) => Outcome::from_bool(actual == want),
        (Operator::NotEquals, Expected::Value(want)) => Outcome::from_bool(actual != want),
        (Operator::In, Expected::OneOf(options)) => {
            Outcome::from_bool(options.iter().any(|want| want == actual))
        }
        (Operator::Regex, Expected::Pattern(re)) => match actual.scalar_text() {
            Some(text) => Outcome::from_bool(re.is_match(&text)),
            None => Outcome::mismatch(format!("regex needs a scalar, found {}", actual.type_name())),
        },
        (Operator::Gt | Operator::Lt, Expected::Value(bound)) => match order(actual, bound) {
            Ok(ordering) => Outcome::from_bool(if op == Operator::Gt {
                ordering == Ordering::Greater
            } else {
                ordering == Ordering::Less
            }),
            Err(note) => Outcome::mismatch(note),
        },
        (_, _) => Outcome::mismatch(format!("{op} has no usable expected value")),
    }
}

/// Numeric ordering when both sides read as numbers, lexical ordering of the renderings otherwise.
fn order(actual: &Value, bound: &Value) -> Result<Ordering, String> {
    if !actual.is_scalar() {
        return Err(format!("cannot order a {} value", actual.type_name()));
    }
    if let (Value::Number(a), Value::Number(b)) = (actual, bound) {
        return a
            .partial_cmp_value(*b)
            .ok_or_else(|| "numbers are not comparable".to_string());
    }
    if let (Some(a), Some(b)) = (as_number(actual), as_number(bound)) {
        return a
            .partial_cmp(&b)
            .ok_or_else(|| "numbers are not comparable".to_string());
    }
    match (actual.scalar_text(), bound.scalar_text()) {
        (Some(a), Some(b)) => Ok(a.as_ref().cmp(b.as_ref())),
        _ => Err(format!("cannot order against a {} bound", bound.type_name())),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(n.as_f64()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
