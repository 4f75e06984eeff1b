//! Built-in rule catalogue, registered by [`register_builtin_rules`].

pub mod business;
pub mod format;
pub mod performance;
pub mod security;

use crate::error::Result;
use crate::registry::RuleRegistry;

/// Register the full built-in catalogue into `registry`.
pub fn register_builtin_rules(registry: &mut RuleRegistry) -> Result<()> {
    format::register(registry)?;
    business::register(registry);
    security::register(registry)?;
    performance::register(registry);
    Ok(())
}
