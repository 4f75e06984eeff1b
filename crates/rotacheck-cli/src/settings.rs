use std::path::{Path, PathBuf};

use rotacheck_core::{Rule, RuleDefinition, ValidationEngine};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::CliError;

/// Settings file looked up in the working directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "rotacheck.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default tracing filter; `RUST_LOG` takes precedence.
    pub log_level: String,
    /// Built-in or configured rules to switch off.
    pub disabled_rules: Vec<RuleRef>,
    /// Extra pattern rules registered after the built-in catalogue.
    pub rules: Vec<EntityRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            disabled_rules: Vec::new(),
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRef {
    pub entity: String,
    pub rule_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRule {
    pub entity: String,
    #[serde(flatten)]
    pub definition: RuleDefinition,
}

/// Resolve which settings file to read, if any.
pub fn settings_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let fallback = PathBuf::from(DEFAULT_SETTINGS_FILE);
            fallback.exists().then_some(fallback)
        }
    }
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}

/// Build an engine from the built-in catalogue plus `settings`.
///
/// Disabled rules are removed before extra rules are added, so a configured
/// rule can take over a disabled built-in id.
pub fn build_engine(settings: &Settings) -> Result<ValidationEngine, CliError> {
    let mut engine = ValidationEngine::new()?;

    for disabled in &settings.disabled_rules {
        match engine.remove_rule(&disabled.entity, &disabled.rule_id) {
            Some(_) => info!(
                event = "rule_disabled",
                entity = %disabled.entity,
                rule_id = %disabled.rule_id
            ),
            None => warn!(
                event = "rule_not_found",
                entity = %disabled.entity,
                rule_id = %disabled.rule_id
            ),
        }
    }

    for extra in &settings.rules {
        let rule = Rule::try_from(extra.definition.clone())?;
        info!(event = "rule_added", entity = %extra.entity, rule_id = %rule.id);
        engine.add_rule(&extra.entity, rule);
    }

    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotacheck_core::{Polarity, Severity};
    use serde_json::json;

    const SAMPLE: &str = r#"
log_level = "debug"

[[disabled_rules]]
entity = "employee"
rule_id = "phone_format"

[[rules]]
entity = "employee"
id = "badge_format"
pattern = "^B-[0-9]{4}$"
message = "Badge must look like B-1234"
severity = "error"
category = "format"
fields = ["badge"]
"#;

    #[test]
    fn parses_settings_file() {
        let settings: Settings = toml::from_str(SAMPLE).expect("parse settings");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(
            settings.disabled_rules,
            vec![RuleRef {
                entity: "employee".to_string(),
                rule_id: "phone_format".to_string(),
            }]
        );
        assert_eq!(settings.rules.len(), 1);
        assert_eq!(settings.rules[0].definition.polarity, Polarity::MatchMeansValid);
        assert_eq!(settings.rules[0].definition.severity, Severity::Error);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings: Settings = toml::from_str("").expect("parse settings");
        assert_eq!(settings.log_level, "info");
        assert!(settings.rules.is_empty());
    }

    #[test]
    fn engine_reflects_settings() {
        let settings: Settings = toml::from_str(SAMPLE).expect("parse settings");
        let engine = build_engine(&settings).expect("build engine");

        let phone = engine.validate_field("employee", "phone", &json!("nope"), None);
        assert!(phone.is_empty());

        let badge = engine.validate_field("employee", "badge", &json!("X"), None);
        assert!(!badge.is_valid());
        assert_eq!(badge.errors[0].rule_id, "badge_format");
    }

    #[test]
    fn rule_without_pattern_is_rejected() {
        let settings: Settings = toml::from_str(
            r#"
[[rules]]
entity = "call"
id = "broken"
message = "never"
severity = "error"
category = "business"
"#,
        )
        .expect("parse settings");

        let err = build_engine(&settings).expect_err("missing pattern must fail");
        assert!(matches!(err, CliError::Core(_)));
    }
}
