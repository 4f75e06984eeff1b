use serde_json::{Map, Value};
use tracing::debug;

use crate::context::ValidationContext;
use crate::error::Result;
use crate::registry::RuleRegistry;
use crate::result::{ValidationMessage, ValidationResult};
use crate::rule::{Category, Rule};

/// Evaluates fields and objects against a [`RuleRegistry`].
///
/// Evaluation is a pure computation over the inputs and the registry at
/// call time. Mutating the registry requires `&mut self`; hosts sharing an
/// engine across threads wrap it in a `RwLock`.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    registry: RuleRegistry,
}

impl ValidationEngine {
    /// Create an engine seeded with the built-in catalogue.
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(RuleRegistry::with_builtin_rules()?))
    }

    /// Create an engine over an existing registry.
    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn add_rule(&mut self, entity: &str, rule: Rule) {
        self.registry.add_rule(entity, rule);
    }

    pub fn replace_rule(&mut self, entity: &str, rule: Rule) {
        self.registry.replace_rule(entity, rule);
    }

    pub fn remove_rule(&mut self, entity: &str, rule_id: &str) -> Option<Rule> {
        self.registry.remove_rule(entity, rule_id)
    }

    pub fn entity_rules(&self, entity: &str) -> Vec<&Rule> {
        self.registry.entity_rules(entity)
    }

    pub fn rules_by_category(&self, entity: &str, category: Category) -> Vec<&Rule> {
        self.registry.rules_by_category(entity, category)
    }

    /// Validate one field value against every rule in scope for `field`.
    ///
    /// Messages follow registry order: entity rules first, then wildcard rules.
    pub fn validate_field(
        &self,
        entity: &str,
        field: &str,
        value: &Value,
        ctx: Option<&ValidationContext>,
    ) -> ValidationResult {
        let fallback = ValidationContext::default();
        let ctx = ctx.unwrap_or(&fallback);

        let mut result = ValidationResult::default();
        let mut evaluated = 0usize;

        for rule in self.registry.entity_rules(entity) {
            if !rule.applies_to(field) {
                continue;
            }
            evaluated += 1;
            if !rule.evaluate(value, ctx) {
                result.push(ValidationMessage::from_rule(rule, field, value));
            }
        }

        debug!(
            event = "field_validated",
            entity = %entity,
            field = %field,
            rules = evaluated,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            info = result.info.len()
        );

        result
    }

    /// Validate every field of `object` in its iteration order and aggregate.
    pub fn validate_object(
        &self,
        entity: &str,
        object: &Map<String, Value>,
        ctx: Option<&ValidationContext>,
    ) -> ValidationResult {
        let mut result = ValidationResult::default();
        for (field, value) in object {
            result.merge(self.validate_field(entity, field, value, ctx));
        }
        result
    }
}
