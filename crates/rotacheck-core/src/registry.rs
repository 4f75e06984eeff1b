use std::collections::HashMap;

use tracing::warn;

use crate::error::Result;
use crate::rule::{Category, ENTITY_ALL, Rule};
use crate::rules::register_builtin_rules;

/// Mapping from entity tag to its ordered rule list.
///
/// Rules registered under [`ENTITY_ALL`] apply to every entity and are
/// evaluated after the entity's own rules.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    buckets: HashMap<String, Vec<Rule>>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the built-in catalogue.
    pub fn with_builtin_rules() -> Result<Self> {
        let mut registry = Self::new();
        register_builtin_rules(&mut registry)?;
        Ok(registry)
    }

    /// Append `rule` to `entity`'s list.
    ///
    /// Duplicate ids are kept; both rules are evaluated. Use
    /// [`RuleRegistry::replace_rule`] to swap a rule out instead.
    pub fn add_rule(&mut self, entity: &str, rule: Rule) {
        let bucket = self.buckets.entry(entity.to_string()).or_default();
        if bucket.iter().any(|existing| existing.id == rule.id) {
            warn!(event = "duplicate_rule_id", entity = %entity, rule_id = %rule.id);
        }
        bucket.push(rule);
    }

    /// Replace the first rule with the same id in place, or append it.
    pub fn replace_rule(&mut self, entity: &str, rule: Rule) {
        let bucket = self.buckets.entry(entity.to_string()).or_default();
        match bucket.iter_mut().find(|existing| existing.id == rule.id) {
            Some(slot) => *slot = rule,
            None => bucket.push(rule),
        }
    }

    /// Remove the first rule with `rule_id` from `entity`'s own list.
    ///
    /// The wildcard bucket is only touched when `entity` is [`ENTITY_ALL`].
    pub fn remove_rule(&mut self, entity: &str, rule_id: &str) -> Option<Rule> {
        let bucket = self.buckets.get_mut(entity)?;
        let idx = bucket.iter().position(|rule| rule.id == rule_id)?;
        Some(bucket.remove(idx))
    }

    /// Rules applicable to `entity`: its own rules followed by wildcard rules.
    ///
    /// Unknown entities get only the wildcard rules.
    pub fn entity_rules(&self, entity: &str) -> Vec<&Rule> {
        let wildcard = self.bucket(ENTITY_ALL);
        if entity == ENTITY_ALL {
            return wildcard.iter().collect();
        }
        self.bucket(entity).iter().chain(wildcard.iter()).collect()
    }

    /// [`RuleRegistry::entity_rules`] filtered by `category`.
    pub fn rules_by_category(&self, entity: &str, category: Category) -> Vec<&Rule> {
        self.entity_rules(entity)
            .into_iter()
            .filter(|rule| rule.category == category)
            .collect()
    }

    /// Registered entity tags, sorted.
    pub fn entities(&self) -> Vec<&str> {
        let mut entities: Vec<&str> = self.buckets.keys().map(String::as_str).collect();
        entities.sort_unstable();
        entities
    }

    fn bucket(&self, entity: &str) -> &[Rule] {
        self.buckets.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Matcher;

    fn rule(id: &str) -> Rule {
        Rule::new(id, Matcher::predicate(|_, _| true))
    }

    fn ids(rules: &[&Rule]) -> Vec<String> {
        rules.iter().map(|rule| rule.id.clone()).collect()
    }

    #[test]
    fn entity_rules_come_before_wildcard_rules() {
        let mut registry = RuleRegistry::new();
        registry.add_rule(ENTITY_ALL, rule("guard"));
        registry.add_rule("call", rule("first"));
        registry.add_rule("call", rule("second"));

        assert_eq!(ids(&registry.entity_rules("call")), vec!["first", "second", "guard"]);
        assert_eq!(ids(&registry.entity_rules(ENTITY_ALL)), vec!["guard"]);
        assert_eq!(ids(&registry.entity_rules("unknown")), vec!["guard"]);
    }

    #[test]
    fn remove_only_touches_named_bucket() {
        let mut registry = RuleRegistry::new();
        registry.add_rule(ENTITY_ALL, rule("shared"));
        registry.add_rule("call", rule("shared"));

        let removed = registry.remove_rule("call", "shared");
        assert!(removed.is_some());
        assert_eq!(ids(&registry.entity_rules("call")), vec!["shared"]);
        assert!(registry.remove_rule("call", "shared").is_none());
        assert!(registry.remove_rule("missing", "shared").is_none());
    }

    #[test]
    fn duplicates_append_and_replace_swaps_in_place() {
        let mut registry = RuleRegistry::new();
        registry.add_rule("call", rule("dup"));
        registry.add_rule("call", rule("other"));
        registry.add_rule("call", rule("dup"));
        assert_eq!(ids(&registry.entity_rules("call")), vec!["dup", "other", "dup"]);

        registry.replace_rule("call", rule("dup").with_name("Replaced"));
        let rules = registry.entity_rules("call");
        assert_eq!(rules[0].name, "Replaced");
        assert_eq!(rules[2].name, "dup");

        registry.replace_rule("call", rule("fresh"));
        assert_eq!(ids(&registry.entity_rules("call")).last().map(String::as_str), Some("fresh"));
    }

    #[test]
    fn filters_by_category() {
        let mut registry = RuleRegistry::new();
        registry.add_rule("call", rule("format"));
        registry.add_rule("call", rule("business").with_category(Category::Business));

        let business = registry.rules_by_category("call", Category::Business);
        assert_eq!(ids(&business), vec!["business"]);
        assert_eq!(registry.entities(), vec!["call"]);
    }
}
