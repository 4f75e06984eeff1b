//! Guards against injection payloads and weak credentials.
//!
//! The injection guards are negative-match patterns: a match marks the
//! value as invalid. Every alternative needs SQL or markup structure around
//! the keyword, so free-text notes with quotes, semicolons and dashes pass.

use serde_json::Value;

use crate::context::ValidationContext;
use crate::error::Result;
use crate::predicates::{PasswordStrength, password_strength};
use crate::registry::RuleRegistry;
use crate::rule::{Category, ENTITY_ALL, ENTITY_USER, Matcher, Polarity, Rule, Severity};

pub const SQL_INJECTION_GUARD: &str = "sql_injection_guard";
pub const SCRIPT_INJECTION_GUARD: &str = "script_injection_guard";
pub const PASSWORD_STRENGTH: &str = "password_strength";

const SQL_INJECTION_PATTERN: &str = concat!(
    r"(?i)",
    // quote closing a literal straight into a terminator or comment
    r"('\s*(;|--|/\*))",
    // tautologies: ' OR 1=1, ' OR 'a'='a
    r"|(\b(or|and)\s+('[^']*'|\d+)\s*=\s*('[^']*'?|\d+))",
    r"|(;\s*(drop|truncate|alter)\s+(table|database)\b)",
    r"|(;\s*delete\s+from\s+\w+)",
    r"|(;\s*update\s+\w+\s+set\b)",
    r"|(;\s*insert\s+into\s+\w+)",
    r"|(\bdrop\s+(table|database)\s+(if\s+exists\s+)?\w+\s*(;|--|$))",
    r"|(\bunion\s+(all\s+)?select\b)",
    r"|(\binsert\s+into\s+\w+\s*(\(|\bvalues\b))",
    r"|(\bdelete\s+from\s+\w+\s+where\b)",
    r"|(\bselect\s+[\w*,\s]+\bfrom\s+\w+\s*(\bwhere\b|;|--))",
    r"|(\bexec(ute)?\s+(xp|sp)_\w+)",
    r"|(/\*.*\*/)",
);

const SCRIPT_INJECTION_PATTERN: &str = concat!(
    r"(?i)",
    r"(<\s*/?\s*script\b)",
    r"|(^\s*javascript\s*:)",
    r#"|(\b(href|src|action)\s*=\s*['"]?\s*javascript\s*:)"#,
    // event handler attribute inside a tag
    r"|(<\s*[a-z][a-z0-9]*\b[^>]*\bon[a-z]+\s*=)",
    r"|(<\s*(iframe|object|embed)\b)",
);

pub(crate) fn register(registry: &mut RuleRegistry) -> Result<()> {
    registry.add_rule(
        ENTITY_ALL,
        Rule::new(
            SQL_INJECTION_GUARD,
            Matcher::pattern(
                SQL_INJECTION_GUARD,
                SQL_INJECTION_PATTERN,
                Polarity::MatchMeansInvalid,
            )?,
        )
        .with_name("SQL injection guard")
        .with_description("Rejects SQL keywords combined with quotes, terminators or comments")
        .with_message("{field} contains characters or keywords that are not allowed")
        .with_severity(Severity::Error)
        .with_category(Category::Security),
    );

    registry.add_rule(
        ENTITY_ALL,
        Rule::new(
            SCRIPT_INJECTION_GUARD,
            Matcher::pattern(
                SCRIPT_INJECTION_GUARD,
                SCRIPT_INJECTION_PATTERN,
                Polarity::MatchMeansInvalid,
            )?,
        )
        .with_name("Script injection guard")
        .with_description("Rejects inline scripts, javascript: URLs and event handler attributes")
        .with_message("{field} contains markup that is not allowed")
        .with_severity(Severity::Error)
        .with_category(Category::Security),
    );

    registry.add_rule(
        ENTITY_USER,
        Rule::new(PASSWORD_STRENGTH, Matcher::predicate(password_not_weak))
            .with_name("Password strength")
            .with_description("At least 8 characters mixing three character classes")
            .with_message("Password is weak")
            .with_severity(Severity::Warning)
            .with_category(Category::Security)
            .for_fields(["password"]),
    );

    Ok(())
}

fn password_not_weak(value: &Value, _: &ValidationContext) -> bool {
    match value {
        Value::Null => true,
        Value::String(password) => password_strength(password) != PasswordStrength::Weak,
        _ => false,
    }
}
