use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;

use crate::rule::{Category, Rule, Severity};

/// A single failed rule for a single field.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationMessage {
    pub rule_id: String,
    pub field: String,
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    pub value: Value,
}

impl ValidationMessage {
    /// Build the message produced when `rule` fails for `field`.
    pub fn from_rule(rule: &Rule, field: &str, value: &Value) -> Self {
        Self {
            rule_id: rule.id.clone(),
            field: field.to_string(),
            message: rule.render_message(field),
            severity: rule.severity,
            category: rule.category,
            value: value.clone(),
        }
    }
}

/// Outcome of a validation call, partitioned by severity.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationMessage>,
    pub warnings: Vec<ValidationMessage>,
    pub info: Vec<ValidationMessage>,
}

impl ValidationResult {
    /// Returns true when there are no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Route a message into the bucket matching its severity.
    pub fn push(&mut self, message: ValidationMessage) {
        match message.severity {
            Severity::Error => self.errors.push(message),
            Severity::Warning => self.warnings.push(message),
            Severity::Info => self.info.push(message),
        }
    }

    /// Append another result, keeping order within each bucket.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.info.extend(other.info);
    }

    /// Iterate errors, then warnings, then info.
    pub fn messages(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.info.iter())
    }

    /// Messages produced by rules of `category`.
    pub fn by_category(&self, category: Category) -> Vec<&ValidationMessage> {
        self.messages()
            .filter(|message| message.category == category)
            .collect()
    }

    /// Total number of messages across all severities.
    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.info.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 4)?;
        state.serialize_field("is_valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.serialize_field("info", &self.info)?;
        state.end()
    }
}
