//! Validated, immutable rule index.
//!
//! Records come from an external rule source as plain maps. `RuleRegistry::build` checks every
//! record, collects every violation, and only then either fails or freezes the index. Path and
//! regex compilation problems are not registry errors: they are kept with the rule and reported
//! when it is evaluated.

use crate::operators::Expected;
use crate::path::PathExpr;
use hcpguard_types::ids::{CODE_INVALID_PATTERN, CODE_PATH_SYNTAX};
use hcpguard_types::{EvaluationError, Map, Operator, Product, Severity, Value};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// One rule record as supplied by a rule source.
pub type RawRule = Map;

static RULE_ID: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*(-[A-Z0-9]+)*-[0-9]+$"));

/// A rule record that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleDefinition {
    pub id: String,
    pub title: String,
    pub product: Product,
    pub severity: Severity,
    pub path: String,
    pub operator: Operator,
    pub expected: Option<Value>,
    pub message: String,
    pub remediation: String,
    pub reference: Option<String>,
}

impl RuleDefinition {
    pub fn applies_to(&self, product: Product) -> bool {
        self.product == Product::All || self.product == product
    }
}

/// A rule plus its prepared path and operand.
#[derive(Clone, Debug)]
pub struct CompiledRule {
    definition: RuleDefinition,
    compiled: Result<(PathExpr, Expected), EvaluationError>,
}

impl CompiledRule {
    fn new(definition: RuleDefinition) -> Self {
        let compiled = compile(&definition);
        if let Err(err) = &compiled {
            warn!(rule_id = %definition.id, code = %err.code, "{}", err.message);
        }
        Self {
            definition,
            compiled,
        }
    }

    pub fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    pub fn compiled(&self) -> Result<(&PathExpr, &Expected), &EvaluationError> {
        self.compiled.as_ref().map(|(path, expected)| (path, expected))
    }
}

fn compile(def: &RuleDefinition) -> Result<(PathExpr, Expected), EvaluationError> {
    let path = PathExpr::parse(&def.path).map_err(|err| EvaluationError {
        code: CODE_PATH_SYNTAX.to_string(),
        message: err.to_string(),
    })?;

    let expected = match (def.operator, &def.expected) {
        (Operator::Exists | Operator::Absent, _) | (_, None) => Expected::Nothing,
        (Operator::In, Some(Value::List(options))) => Expected::OneOf(options.clone()),
        (Operator::Regex, Some(Value::String(pattern))) => {
            Expected::Pattern(Regex::new(pattern).map_err(|err| EvaluationError {
                code: CODE_INVALID_PATTERN.to_string(),
                message: format!("invalid regex '{pattern}': {err}"),
            })?)
        }
        (_, Some(value)) => Expected::Value(value.clone()),
    };

    Ok((path, expected))
}

/// A single problem with one rule record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleViolation {
    /// Position of the record in the input, zero-based.
    pub index: usize,
    pub rule_id: Option<String>,
    pub message: String,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule_id {
            Some(id) => write!(f, "rule {id} (record {}): {}", self.index, self.message),
            None => write!(f, "record {}: {}", self.index, self.message),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid rule set ({} violation(s)):\n{}", .violations.len(), render_violations(.violations))]
pub struct RuleDefinitionError {
    pub violations: Vec<RuleViolation>,
}

fn render_violations(violations: &[RuleViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Clone, Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<CompiledRule>,
    by_product: BTreeMap<Product, Vec<usize>>,
    warnings: Vec<RuleViolation>,
}

impl RuleRegistry {
    pub fn build<I>(records: I) -> Result<Self, RuleDefinitionError>
    where
        I: IntoIterator<Item = RawRule>,
    {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();
        let mut definitions = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            if let Some(def) = check_record(index, &record, &mut violations, &mut warnings) {
                definitions.push((index, def));
            }
        }

        check_duplicates(&definitions, &mut violations);

        if !violations.is_empty() {
            return Err(RuleDefinitionError { violations });
        }

        let rules: Vec<CompiledRule> = definitions
            .into_iter()
            .map(|(_, def)| CompiledRule::new(def))
            .collect();

        let mut by_product: BTreeMap<Product, Vec<usize>> = BTreeMap::new();
        for (pos, rule) in rules.iter().enumerate() {
            let def = rule.definition();
            let scopes: &[Product] = if def.product == Product::All {
                &[Product::All, Product::Vault, Product::Consul, Product::Nomad]
            } else {
                std::slice::from_ref(&def.product)
            };
            for scope in scopes {
                by_product.entry(*scope).or_default().push(pos);
            }
        }

        debug!(rules = rules.len(), "rule registry built");
        Ok(Self {
            rules,
            by_product,
            warnings,
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every rule, in declaration order.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Rules applicable to `product`, in declaration order. `Product::All` yields only the rules
    /// scoped to every product.
    pub fn rules_for(&self, product: Product) -> impl Iterator<Item = &CompiledRule> + '_ {
        self.by_product
            .get(&product)
            .into_iter()
            .flatten()
            .map(|pos| &self.rules[*pos])
    }

    /// First rule with this id, in declaration order.
    pub fn find(&self, rule_id: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.definition().id == rule_id)
    }

    /// Non-fatal findings from validation (for example an ignored `expected`).
    pub fn warnings(&self) -> &[RuleViolation] {
        &self.warnings
    }
}

fn check_record(
    index: usize,
    record: &RawRule,
    violations: &mut Vec<RuleViolation>,
    warnings: &mut Vec<RuleViolation>,
) -> Option<RuleDefinition> {
    let mut problems: Vec<String> = Vec::new();

    let id = required_text(record, "id", &mut problems);
    if let Some(id) = &id {
        match RULE_ID.as_ref() {
            Ok(re) if re.is_match(id) => {}
            Ok(_) => problems.push(format!(
                "id '{id}' does not match the PREFIX-NNN pattern (e.g. VLT-001)"
            )),
            Err(err) => problems.push(format!("id pattern unavailable: {err}")),
        }
    }

    let title = required_text(record, "title", &mut problems);
    let message = required_text(record, "message", &mut problems);
    let remediation = required_text(record, "remediation", &mut problems);
    let product: Option<Product> = required_token(record, "product", &mut problems);
    let severity: Option<Severity> = required_token(record, "severity", &mut problems);
    let operator: Option<Operator> = required_token(record, "operator", &mut problems);

    let path = match (record.get("path"), record.get("jmespath")) {
        (Some(value), _) | (None, Some(value)) => match value {
            Value::String(s) => Some(s.clone()),
            other => {
                problems.push(format!("field 'path' must be a string, found {}", other.type_name()));
                None
            }
        },
        (None, None) => {
            problems.push("missing required field 'path'".to_string());
            None
        }
    };

    let reference = match record.get("reference") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            problems.push(format!(
                "field 'reference' must be a string, found {}",
                other.type_name()
            ));
            None
        }
    };

    let expected = record.get("expected").cloned();
    if let Some(op) = operator {
        match (&expected, op.requires_expected()) {
            (None, true) => problems.push(format!("operator '{op}' requires 'expected'")),
            (Some(_), false) => {
                let note = format!("'expected' is ignored for operator '{op}'");
                warn!(rule_id = id.as_deref().unwrap_or("?"), "{note}");
                warnings.push(RuleViolation {
                    index,
                    rule_id: id.clone(),
                    message: note,
                });
            }
            (Some(value), true) => {
                if let Some(problem) = expected_shape(op, value) {
                    problems.push(problem);
                }
            }
            (None, false) => {}
        }
    }

    if !problems.is_empty() {
        violations.extend(problems.into_iter().map(|message| RuleViolation {
            index,
            rule_id: id.clone(),
            message,
        }));
        return None;
    }

    Some(RuleDefinition {
        id: id?,
        title: title?,
        product: product?,
        severity: severity?,
        path: path?,
        operator: operator?,
        expected: if operator?.requires_expected() {
            expected
        } else {
            None
        },
        message: message?,
        remediation: remediation?,
        reference,
    })
}

fn expected_shape(op: Operator, value: &Value) -> Option<String> {
    let ok = match op {
        Operator::In => matches!(value, Value::List(_)),
        Operator::Regex => matches!(value, Value::String(_)),
        Operator::Gt | Operator::Lt => matches!(value, Value::Number(_) | Value::String(_)),
        _ => true,
    };
    (!ok).then(|| {
        let want = match op {
            Operator::In => "a list",
            Operator::Regex => "a string pattern",
            _ => "a number or string",
        };
        format!(
            "operator '{op}' requires 'expected' to be {want}, found {}",
            value.type_name()
        )
    })
}

fn required_text(record: &RawRule, field: &str, problems: &mut Vec<String>) -> Option<String> {
    match record.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::String(_)) => {
            problems.push(format!("field '{field}' must not be empty"));
            None
        }
        Some(other) => {
            problems.push(format!(
                "field '{field}' must be a string, found {}",
                other.type_name()
            ));
            None
        }
        None => {
            problems.push(format!("missing required field '{field}'"));
            None
        }
    }
}

fn required_token<T>(record: &RawRule, field: &str, problems: &mut Vec<String>) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let text = required_text(record, field, problems)?;
    match text.parse::<T>() {
        Ok(v) => Some(v),
        Err(err) => {
            problems.push(err.to_string());
            None
        }
    }
}

/// Ids must be unique within each product's effective set (its own rules plus `all` rules).
fn check_duplicates(definitions: &[(usize, RuleDefinition)], violations: &mut Vec<RuleViolation>) {
    let mut clashes: BTreeMap<(usize, usize), BTreeSet<Product>> = BTreeMap::new();

    for product in Product::CONCRETE {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, def) in definitions {
            if !def.applies_to(product) {
                continue;
            }
            if let Some(first) = seen.get(def.id.as_str()) {
                clashes.entry((*index, *first)).or_default().insert(product);
            } else {
                seen.insert(def.id.as_str(), *index);
            }
        }
    }

    for ((index, first), products) in clashes {
        let id = definitions
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, def)| def.id.clone());
        let scope: Vec<&str> = products.iter().map(|p| p.as_str()).collect();
        violations.push(RuleViolation {
            index,
            rule_id: id,
            message: format!(
                "duplicate id (first declared by record {first}) for product(s): {}",
                scope.join(", ")
            ),
        });
    }
}
