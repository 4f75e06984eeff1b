use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rule::{Category, Matcher, Polarity, Rule, Severity};

/// Declarative pattern rule, as loaded from configuration.
///
/// Predicate rules cannot be expressed declaratively; a definition without
/// a `pattern` is rejected when converted into a [`Rule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleDefinition {
    /// Rule identifier, unique within its entity bucket.
    pub id: String,
    /// Human-readable name; defaults to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Regular expression tested against string values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default)]
    pub polarity: Polarity,
    /// Message template; `{field}` is replaced with the field name.
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    /// Field names the rule applies to; empty means every field.
    #[serde(default)]
    pub fields: Vec<String>,
}

impl TryFrom<RuleDefinition> for Rule {
    type Error = Error;

    fn try_from(definition: RuleDefinition) -> Result<Self> {
        let id = definition.id.trim().to_string();
        if id.is_empty() {
            return Err(Error::InvalidRule("rule id must not be empty".to_string()));
        }

        let pattern = definition.pattern.ok_or_else(|| {
            Error::InvalidRule(format!("rule '{id}' defines no pattern to match"))
        })?;
        let matcher = Matcher::pattern(&id, &pattern, definition.polarity)?;

        let mut rule = Rule::new(id, matcher)
            .with_message(definition.message)
            .with_severity(definition.severity)
            .with_category(definition.category)
            .for_fields(definition.fields);
        if let Some(name) = definition.name {
            rule = rule.with_name(name);
        }
        if let Some(description) = definition.description {
            rule = rule.with_description(description);
        }
        Ok(rule)
    }
}
