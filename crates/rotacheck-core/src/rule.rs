use std::fmt;
use std::sync::Arc;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::ValidationContext;
use crate::error::{Error, Result};

/// Wildcard entity tag whose rules apply to every entity.
pub const ENTITY_ALL: &str = "all";
/// Entity tag for employee records.
pub const ENTITY_EMPLOYEE: &str = "employee";
/// Entity tag for scheduled calls.
pub const ENTITY_CALL: &str = "call";
/// Entity tag for dashboard user accounts.
pub const ENTITY_USER: &str = "user";

/// How strongly a failing rule affects acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks acceptance.
    Error,
    /// Advisory.
    Warning,
    /// Advisory, lowest priority.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

/// Intent of a rule, used for grouping and reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Format,
    Business,
    Security,
    Performance,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Format => "format",
            Category::Business => "business",
            Category::Security => "security",
            Category::Performance => "performance",
        };
        f.write_str(label)
    }
}

/// Meaning of a pattern match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// The value is valid when the pattern matches (format checks).
    #[default]
    MatchMeansValid,
    /// The value is invalid when the pattern matches (guard checks).
    MatchMeansInvalid,
}

/// Predicate signature: returns `true` when the value is valid.
pub type PredicateFn = dyn Fn(&Value, &ValidationContext) -> bool + Send + Sync;

/// Match mechanism of a rule.
#[derive(Clone)]
pub enum Matcher {
    Pattern { regex: Regex, polarity: Polarity },
    Predicate(Arc<PredicateFn>),
}

impl Matcher {
    /// Compile a pattern matcher for `rule_id`.
    pub fn pattern(rule_id: &str, pattern: &str, polarity: Polarity) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            rule_id: rule_id.to_string(),
            source,
        })?;
        Ok(Matcher::Pattern { regex, polarity })
    }

    /// Wrap a predicate closure.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &ValidationContext) -> bool + Send + Sync + 'static,
    {
        Matcher::Predicate(Arc::new(predicate))
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Pattern { regex, polarity } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("polarity", polarity)
                .finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Immutable description of one check.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub matcher: Matcher,
    /// Message template; `{field}` is replaced with the field name.
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    /// Field names the rule applies to. Empty means every field.
    pub fields: Vec<String>,
}

impl Rule {
    /// Create a rule with `error` severity, `format` category and no field scope.
    pub fn new(id: impl Into<String>, matcher: Matcher) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            description: String::new(),
            message: format!("{{field}} failed rule {id}"),
            id,
            matcher,
            severity: Severity::Error,
            category: Category::Format,
            fields: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Restrict the rule to the given field names.
    pub fn for_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true when the rule is in scope for `field`.
    pub fn applies_to(&self, field: &str) -> bool {
        self.fields.is_empty() || self.fields.iter().any(|candidate| candidate == field)
    }

    /// Evaluate the rule, returning `true` when `value` is valid.
    ///
    /// Pattern rules only inspect non-empty strings; any other value passes.
    pub fn evaluate(&self, value: &Value, ctx: &ValidationContext) -> bool {
        match &self.matcher {
            Matcher::Pattern { regex, polarity } => match value.as_str() {
                Some(text) if !text.is_empty() => {
                    let matched = regex.is_match(text);
                    match polarity {
                        Polarity::MatchMeansValid => matched,
                        Polarity::MatchMeansInvalid => !matched,
                    }
                }
                _ => true,
            },
            Matcher::Predicate(predicate) => predicate(value, ctx),
        }
    }

    /// Render the message template for `field`.
    pub fn render_message(&self, field: &str) -> String {
        self.message.replace("{field}", field)
    }
}
