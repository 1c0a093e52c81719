//! Path expressions over a canonical value tree.
//!
//! Grammar (whitespace is not allowed anywhere inside an expression):
//!
//! ```text
//! path     := head ( "." field | "[" index "]" )*
//! head     := field | "[" index "]"
//! field    := name | "\"" chars "\"" | "*"
//! name     := [A-Za-z0-9_-]+
//! index    := "*" | integer          (negative integers count from the end)
//! ```
//!
//! Resolution never fails on shape mismatches: a field lookup on a non-map, a missing key, or an
//! out-of-range index simply drops that branch.

use hcpguard_types::Value;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    /// `*`: every value of a map, in document order.
    AnyField,
    Index(i64),
    /// `[*]`: every element of a list.
    AnyIndex,
}

impl Segment {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::AnyField | Segment::AnyIndex)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid path expression '{expr}' at byte {offset}: {reason}")]
pub struct PathSyntaxError {
    pub expr: String,
    pub offset: usize,
    pub reason: String,
}

/// Outcome of resolving a path against a value tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution<'a> {
    /// No wildcard in the path and the chain does not exist.
    Missing,
    /// No wildcard in the path; resolved to exactly one value (possibly `Null`).
    Present(&'a Value),
    /// The path contains a wildcard; values in document order (possibly none).
    Projected(Vec<&'a Value>),
}

impl Resolution<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Resolution::Missing)
    }

    /// Owned copy of what was resolved, for reports. Projections become a list.
    pub fn snapshot(&self) -> Option<Value> {
        match self {
            Resolution::Missing => None,
            Resolution::Present(v) => Some((*v).clone()),
            Resolution::Projected(items) => {
                Some(Value::List(items.iter().map(|v| (*v).clone()).collect()))
            }
        }
    }
}

/// A parsed path expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathExpr {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    AfterDot,
    AfterSegment,
}

impl PathExpr {
    pub fn parse(expr: &str) -> Result<Self, PathSyntaxError> {
        let lead = expr.len() - expr.trim_start().len();
        let body = expr.trim();
        let fail = |at: usize, reason: String| PathSyntaxError {
            expr: expr.to_string(),
            offset: lead + at,
            reason,
        };

        if body.is_empty() {
            return Err(fail(0, "empty path expression".to_string()));
        }

        let bytes = body.as_bytes();
        let mut segments = Vec::new();
        let mut state = State::Start;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            match b {
                b'.' => {
                    if state != State::AfterSegment {
                        return Err(fail(i, "empty field name".to_string()));
                    }
                    state = State::AfterDot;
                    i += 1;
                }
                b'[' => {
                    if state == State::AfterDot {
                        return Err(fail(i, "expected a field name after '.'".to_string()));
                    }
                    let close = body[i..]
                        .find(']')
                        .map(|rel| i + rel)
                        .ok_or_else(|| fail(i, "unclosed '['".to_string()))?;
                    let inner = &body[i + 1..close];
                    let segment = if inner == "*" {
                        Segment::AnyIndex
                    } else if inner.bytes().all(|c| c.is_ascii_digit() || c == b'-') {
                        inner
                            .parse::<i64>()
                            .map(Segment::Index)
                            .map_err(|_| fail(i + 1, format!("invalid index '{inner}'")))?
                    } else {
                        return Err(fail(i + 1, format!("invalid index '{inner}'")));
                    };
                    segments.push(segment);
                    state = State::AfterSegment;
                    i = close + 1;
                }
                b'*' | b'"' | b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' => {
                    if state == State::AfterSegment {
                        return Err(fail(i, "expected '.' or '[' between segments".to_string()));
                    }
                    let (segment, next) = if b == b'*' {
                        (Segment::AnyField, i + 1)
                    } else if b == b'"' {
                        let close = body[i + 1..]
                            .find('"')
                            .map(|rel| i + 1 + rel)
                            .ok_or_else(|| fail(i, "unterminated quoted field".to_string()))?;
                        (Segment::Field(body[i + 1..close].to_string()), close + 1)
                    } else {
                        let end = body[i..]
                            .find(|c: char| !is_name_char(c))
                            .map_or(bytes.len(), |rel| i + rel);
                        (Segment::Field(body[i..end].to_string()), end)
                    };
                    segments.push(segment);
                    state = State::AfterSegment;
                    i = next;
                }
                _ => {
                    let ch = body[i..].chars().next().unwrap_or('?');
                    return Err(fail(i, format!("unexpected character {ch:?}")));
                }
            }
        }

        if state == State::AfterDot {
            return Err(fail(bytes.len(), "trailing '.'".to_string()));
        }

        Ok(Self {
            source: body.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_projection(&self) -> bool {
        self.segments.iter().any(Segment::is_wildcard)
    }

    pub fn resolve<'a>(&self, root: &'a Value) -> Resolution<'a> {
        let mut current: Vec<&'a Value> = vec![root];

        for segment in &self.segments {
            let mut next = Vec::with_capacity(current.len());
            for value in current {
                match segment {
                    Segment::Field(name) => next.extend(value.get(name)),
                    Segment::AnyField => {
                        if let Value::Map(map) = value {
                            next.extend(map.values());
                        }
                    }
                    Segment::Index(index) => {
                        if let Value::List(items) = value {
                            next.extend(list_index(items, *index));
                        }
                    }
                    Segment::AnyIndex => match value {
                        Value::List(items) => next.extend(items.iter()),
                        // A lone block and a one-element list project the same way.
                        Value::Map(_) => next.push(value),
                        _ => {}
                    },
                }
            }
            current = next;
        }

        if self.is_projection() {
            Resolution::Projected(current)
        } else {
            current
                .into_iter()
                .next()
                .map_or(Resolution::Missing, Resolution::Present)
        }
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn list_index(items: &[Value], index: i64) -> Option<&Value> {
    let len = items.len() as i64;
    let pos = if index < 0 { len + index } else { index };
    if (0..len).contains(&pos) {
        items.get(pos as usize)
    } else {
        None
    }
}
