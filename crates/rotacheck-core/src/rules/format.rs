//! Shape checks for employee records.

use serde_json::Value;

use crate::context::ValidationContext;
use crate::error::Result;
use crate::predicates::{is_valid_fiscal_code, is_valid_iban};
use crate::registry::RuleRegistry;
use crate::rule::{Category, ENTITY_EMPLOYEE, Matcher, Polarity, Rule, Severity};

pub const EMAIL_FORMAT: &str = "email_format";
pub const PHONE_FORMAT: &str = "phone_format";
pub const NAME_FORMAT: &str = "name_format";
pub const FISCAL_CODE_FORMAT: &str = "fiscal_code_format";
pub const IBAN_FORMAT: &str = "iban_format";

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$";
// Italian mobile (3xx) and landline (0x) numbers, optional +39 prefix.
const PHONE_PATTERN: &str = r"^(\+39[\s-]?)?(3\d{2}|0\d{1,3})[\s-]?\d{6,8}$";
const NAME_PATTERN: &str = r"^\p{L}[\p{L}' -]{1,49}$";

pub(crate) fn register(registry: &mut RuleRegistry) -> Result<()> {
    registry.add_rule(
        ENTITY_EMPLOYEE,
        Rule::new(
            EMAIL_FORMAT,
            Matcher::pattern(EMAIL_FORMAT, EMAIL_PATTERN, Polarity::MatchMeansValid)?,
        )
        .with_name("Email format")
        .with_description("Email address must look like local@domain.tld")
        .with_message("Enter a valid email address")
        .with_severity(Severity::Error)
        .with_category(Category::Format)
        .for_fields(["email"]),
    );

    registry.add_rule(
        ENTITY_EMPLOYEE,
        Rule::new(
            PHONE_FORMAT,
            Matcher::pattern(PHONE_FORMAT, PHONE_PATTERN, Polarity::MatchMeansValid)?,
        )
        .with_name("Phone format")
        .with_description("Phone number should follow the national numbering plan")
        .with_message("Phone number does not look like a national number")
        .with_severity(Severity::Warning)
        .with_category(Category::Format)
        .for_fields(["phone"]),
    );

    registry.add_rule(
        ENTITY_EMPLOYEE,
        Rule::new(
            NAME_FORMAT,
            Matcher::pattern(NAME_FORMAT, NAME_PATTERN, Polarity::MatchMeansValid)?,
        )
        .with_name("Name format")
        .with_description("Letters, spaces, apostrophes and hyphens, 2 to 50 characters")
        .with_message("{field} may only contain letters, spaces, apostrophes and hyphens")
        .with_severity(Severity::Error)
        .with_category(Category::Format)
        .for_fields(["first_name", "last_name"]),
    );

    registry.add_rule(
        ENTITY_EMPLOYEE,
        Rule::new(FISCAL_CODE_FORMAT, Matcher::predicate(fiscal_code_ok))
            .with_name("Fiscal code")
            .with_description("Italian fiscal code with a matching check character")
            .with_message("Fiscal code is not valid")
            .with_severity(Severity::Error)
            .with_category(Category::Format)
            .for_fields(["fiscal_code"]),
    );

    registry.add_rule(
        ENTITY_EMPLOYEE,
        Rule::new(IBAN_FORMAT, Matcher::predicate(iban_ok))
            .with_name("IBAN")
            .with_description("IBAN with a valid mod-97 checksum")
            .with_message("IBAN is not valid")
            .with_severity(Severity::Error)
            .with_category(Category::Format)
            .for_fields(["iban"]),
    );

    Ok(())
}

fn fiscal_code_ok(value: &Value, _: &ValidationContext) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) if text.trim().is_empty() => true,
        Value::String(text) => is_valid_fiscal_code(text),
        _ => false,
    }
}

fn iban_ok(value: &Value, _: &ValidationContext) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) if text.trim().is_empty() => true,
        Value::String(text) => is_valid_iban(text),
        _ => false,
    }
}
