use serde_json::Value;

use crate::context::ValidationContext;
use crate::registry::RuleRegistry;
use crate::rule::{Category, ENTITY_ALL, Matcher, Rule, Severity};

pub const LENGTH_LIMIT: &str = "length_limit";

pub const MAX_TEXT_CHARS: usize = 5000;

pub(crate) fn register(registry: &mut RuleRegistry) {
    registry.add_rule(
        ENTITY_ALL,
        Rule::new(LENGTH_LIMIT, Matcher::predicate(within_length_limit))
            .with_name("Length limit")
            .with_description("Text values up to 5000 characters")
            .with_message("{field} is longer than 5000 characters")
            .with_severity(Severity::Warning)
            .with_category(Category::Performance),
    );
}

fn within_length_limit(value: &Value, _: &ValidationContext) -> bool {
    value
        .as_str()
        .map(|text| text.chars().count() <= MAX_TEXT_CHARS)
        .unwrap_or(true)
}
