//! Rule-based validation and scheduling-conflict engine for rotacheck.
//!
//! This crate defines the rule model, the per-entity rule registry, the
//! evaluation engine, and the built-in catalogue used to check employee
//! records and scheduled calls. It performs no I/O.

pub mod conflict;
pub mod context;
pub mod definition;
pub mod engine;
pub mod error;
pub mod predicates;
pub mod registry;
pub mod result;
pub mod rule;
pub mod rules;

pub use conflict::{BUFFER_WINDOW_MINUTES, buffer_window, find_conflicts};
pub use context::{CallSlot, CallStatus, ScheduleContext, ValidationContext};
pub use definition::RuleDefinition;
pub use engine::ValidationEngine;
pub use error::{Error, Result};
pub use registry::RuleRegistry;
pub use result::{ValidationMessage, ValidationResult};
pub use rule::{
    Category, ENTITY_ALL, ENTITY_CALL, ENTITY_EMPLOYEE, ENTITY_USER, Matcher, Polarity,
    PredicateFn, Rule, Severity,
};
