//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Path parsing and resolution never panicking
//! - Numeric equality across literal forms
//! - Conjunctive wildcard semantics
//! - Evaluation determinism and threshold monotonicity

use crate::engine::{evaluate, validate};
use crate::operators::{self, Expected};
use crate::path::{PathExpr, Resolution};
use crate::policy::EffectiveConfig;
use crate::registry::RuleRegistry;
use crate::test_support::raw_rule;
use crate::{CanonicalDocument, Format};
use hcpguard_types::{Map, Operator, OverallStatus, Product, Severity, TargetPath, Value};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,7}").expect("valid regex")
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z0-9 ._-]{0,12}".prop_map(Value::from),
    ]
}

/// Arbitrary value trees, a few levels deep.
fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::List),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|entries| Value::Map(entries.into_iter().collect::<Map>())),
        ]
    })
}

fn arb_path() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        arb_key(),
        Just("*".to_string()),
        (0i64..4).prop_map(|i| format!("{i}")),
    ];
    prop::collection::vec((segment, any::<bool>()), 1..5).prop_map(|parts| {
        let mut out = String::new();
        for (idx, (seg, bracket)) in parts.into_iter().enumerate() {
            let is_index = seg.chars().all(|c| c.is_ascii_digit());
            if bracket || is_index {
                let inner = if seg == "*" || is_index { seg } else { "*".to_string() };
                out.push_str(&format!("[{inner}]"));
            } else {
                if idx > 0 {
                    out.push('.');
                }
                out.push_str(&seg);
            }
        }
        out
    })
}

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Critical),
    ]
}

fn document(root: Value) -> CanonicalDocument {
    CanonicalDocument::new(root, TargetPath::new("prop.json"), Format::Json)
}

// ============================================================================
// Property tests: path engine
// ============================================================================

proptest! {
    /// Parsing never panics; failures always point inside the expression.
    #[test]
    fn path_parse_never_panics(expr in "\\PC{0,24}") {
        if let Err(err) = PathExpr::parse(&expr) {
            prop_assert!(err.offset <= expr.len(), "offset {} beyond {:?}", err.offset, expr);
        }
    }

    /// Generated well-formed paths parse and resolve against any tree without panicking.
    #[test]
    fn generated_paths_resolve(path in arb_path(), root in arb_value()) {
        let parsed = PathExpr::parse(&path);
        prop_assert!(parsed.is_ok(), "{path}: {:?}", parsed.as_ref().err());
        if let Ok(parsed) = parsed {
            let resolution = parsed.resolve(&root);
            if !parsed.is_projection() {
                prop_assert!(!matches!(resolution, Resolution::Projected(_)));
            } else {
                prop_assert!(matches!(resolution, Resolution::Projected(_)));
            }
        }
    }

    /// `*` over a map yields exactly its values, in order.
    #[test]
    fn any_field_projects_every_value(entries in prop::collection::vec((arb_key(), arb_scalar()), 0..8)) {
        let map: Map = entries.into_iter().collect();
        let mut root = Map::new();
        root.insert("m".to_string(), Value::Map(map.clone()));
        let root = Value::Map(root);

        let parsed = PathExpr::parse("m.*").expect("valid path");
        let expected: Vec<&Value> = map.values().collect();
        prop_assert_eq!(parsed.resolve(&root), Resolution::Projected(expected));
    }
}

// ============================================================================
// Property tests: operators
// ============================================================================

proptest! {
    /// Integer and float literals of the same number are equal both ways.
    #[test]
    fn numeric_equality_ignores_literal_form(n in -1_000_000i64..1_000_000) {
        let int = Value::from(n);
        let float = Value::from(n as f64);
        let as_int = Expected::Value(int.clone());
        let as_float = Expected::Value(float.clone());
        prop_assert!(operators::evaluate(Operator::Equals, &Resolution::Present(&float), &as_int).passed);
        prop_assert!(operators::evaluate(Operator::Equals, &Resolution::Present(&int), &as_float).passed);
        prop_assert!(!operators::evaluate(Operator::NotEquals, &Resolution::Present(&int), &as_float).passed);
    }

    /// A wildcard rule passes iff every element passes.
    #[test]
    fn wildcard_checks_are_conjunctive(flags in prop::collection::vec(any::<bool>(), 0..8)) {
        let listeners: Vec<Value> = flags
            .iter()
            .map(|f| {
                let mut m = Map::new();
                m.insert("tls_disable".to_string(), Value::Bool(*f));
                Value::Map(m)
            })
            .collect();
        let mut root = Map::new();
        root.insert("listener".to_string(), Value::List(listeners));
        let root = Value::Map(root);

        let path = PathExpr::parse("listener[*].tls_disable").expect("valid path");
        let resolution = path.resolve(&root);
        let outcome = operators::evaluate(Operator::Equals, &resolution, &Expected::Value(Value::Bool(false)));
        prop_assert_eq!(outcome.passed, flags.iter().all(|f| !f));

        let exists = operators::evaluate(Operator::Exists, &resolution, &Expected::Nothing);
        prop_assert_eq!(exists.passed, !flags.is_empty());
    }

    /// `not_equals` is the negation of `equals` for every present value.
    #[test]
    fn not_equals_negates_equals(actual in arb_value(), want in arb_scalar()) {
        let expected = Expected::Value(want);
        let present = Resolution::Present(&actual);
        let eq = operators::evaluate(Operator::Equals, &present, &expected).passed;
        let ne = operators::evaluate(Operator::NotEquals, &present, &expected).passed;
        prop_assert_ne!(eq, ne);
    }
}

// ============================================================================
// Property tests: orchestration and aggregation
// ============================================================================

proptest! {
    /// One result per applicable rule, in registry order, identical across runs.
    #[test]
    fn evaluation_is_total_ordered_and_deterministic(root in arb_value(), n in 1usize..8) {
        let records: Vec<_> = (0..n)
            .map(|i| {
                let product = if i % 2 == 0 { "all" } else { "vault" };
                raw_rule(&format!("PROP-{i:03}"), product, "a.b[*]", "exists", None)
            })
            .collect();
        let registry = RuleRegistry::build(records).expect("valid rules");
        let doc = document(root);
        let cfg = EffectiveConfig::default();

        let first = evaluate(&doc, Product::Vault, &registry, &cfg);
        let second = evaluate(&doc, Product::Vault, &registry, &cfg);
        prop_assert_eq!(first.len(), n);
        let ids: Vec<String> = first.iter().map(|r| r.rule_id.clone()).collect();
        let want: Vec<String> = (0..n).map(|i| format!("PROP-{i:03}")).collect();
        prop_assert_eq!(ids, want);
        prop_assert_eq!(first, second);
    }

    /// Lowering the fail level never turns a failing report into a passing one.
    #[test]
    fn lower_threshold_is_at_least_as_strict(
        severities in prop::collection::vec(arb_severity(), 1..6),
        high in arb_severity(),
        low in arb_severity(),
    ) {
        prop_assume!(low <= high);
        let records: Vec<_> = severities
            .iter()
            .enumerate()
            .map(|(i, sev)| {
                let mut r = raw_rule(&format!("SEV-{i}"), "nomad", "missing", "exists", None);
                r.insert("severity".to_string(), Value::from(sev.as_str()));
                r
            })
            .collect();
        let registry = RuleRegistry::build(records).expect("valid rules");
        let doc = document(Value::Map(Map::new()));

        let at = |level: Severity| {
            validate(&doc, Product::Nomad, &registry, &EffectiveConfig::with_fail_level(level))
                .overall_status
        };
        if at(high) == OverallStatus::Fail {
            prop_assert_eq!(at(low), OverallStatus::Fail);
        }
    }
}
