//! JSON schemas for the emitted report and the config file.

use hcpguard_settings::HcpguardConfigV1;
use hcpguard_types::ScanReport;

/// JSON schema of the `ScanReport` envelope.
pub fn report_schema() -> serde_json::Value {
    schemars::schema_for!(ScanReport).to_value()
}

/// JSON schema of `hcpguard.toml`.
pub fn config_schema() -> serde_json::Value {
    schemars::schema_for!(HcpguardConfigV1).to_value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_schema_names_the_envelope_fields() {
        let schema = report_schema();
        assert_eq!(schema["title"], "ScanReport");
        let required = schema["required"].as_array().expect("required list");
        for field in ["schema", "tool", "started_at", "status", "summary", "files"] {
            assert!(required.iter().any(|f| f == field), "{field} not required");
        }
    }

    #[test]
    fn config_schema_lists_rule_overrides() {
        let schema = config_schema();
        assert_eq!(schema["title"], "HcpguardConfigV1");
        assert!(schema["properties"].get("rules").is_some());
        assert!(schema["properties"].get("fail_level").is_some());
    }
}
