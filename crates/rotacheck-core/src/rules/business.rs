//! Scheduling rules for calls.

use chrono::{Datelike, Local, Timelike, Weekday};
use serde_json::Value;

use crate::conflict::find_conflicts;
use crate::context::ValidationContext;
use crate::predicates::{parse_duration_minutes, parse_timestamp, word_count};
use crate::registry::RuleRegistry;
use crate::rule::{Category, ENTITY_CALL, Matcher, Rule, Severity};

pub const NOTES_QUALITY: &str = "notes_quality";
pub const DURATION_REASONABLE: &str = "duration_reasonable";
pub const FUTURE_DATE: &str = "future_date";
pub const WORKING_HOURS: &str = "working_hours";
pub const NO_OVERLAP: &str = "no_overlap";

pub const MIN_NOTE_WORDS: usize = 3;
pub const MIN_DURATION_MINUTES: i64 = 1;
pub const MAX_DURATION_MINUTES: i64 = 480;
/// Working day is `[08:00, 20:00)` local time.
pub const WORKDAY_START_HOUR: u32 = 8;
pub const WORKDAY_END_HOUR: u32 = 20;

const SCHEDULED_AT: &str = "scheduled_at";

pub(crate) fn register(registry: &mut RuleRegistry) {
    registry.add_rule(
        ENTITY_CALL,
        Rule::new(NOTES_QUALITY, Matcher::predicate(notes_are_descriptive))
            .with_name("Notes quality")
            .with_description("Call notes should be a short sentence, not a single word")
            .with_message("Consider adding more detail to the call notes")
            .with_severity(Severity::Info)
            .with_category(Category::Business)
            .for_fields(["notes"]),
    );

    registry.add_rule(
        ENTITY_CALL,
        Rule::new(DURATION_REASONABLE, Matcher::predicate(duration_in_range))
            .with_name("Reasonable duration")
            .with_description("Duration in whole minutes between 1 and 480")
            .with_message("Duration must be between 1 and 480 minutes")
            .with_severity(Severity::Error)
            .with_category(Category::Business)
            .for_fields(["duration"]),
    );

    registry.add_rule(
        ENTITY_CALL,
        Rule::new(FUTURE_DATE, Matcher::predicate(is_not_in_past))
            .with_name("Future date")
            .with_description("Calls cannot be scheduled in the past unless explicitly allowed")
            .with_message("The call must be scheduled in the future")
            .with_severity(Severity::Error)
            .with_category(Category::Business)
            .for_fields([SCHEDULED_AT]),
    );

    registry.add_rule(
        ENTITY_CALL,
        Rule::new(WORKING_HOURS, Matcher::predicate(within_working_hours))
            .with_name("Working hours")
            .with_description("Monday to Friday, 08:00 to 20:00 local time")
            .with_message("The call falls outside working hours")
            .with_severity(Severity::Info)
            .with_category(Category::Business)
            .for_fields([SCHEDULED_AT]),
    );

    registry.add_rule(
        ENTITY_CALL,
        Rule::new(NO_OVERLAP, Matcher::predicate(has_no_overlap))
            .with_name("No overlapping calls")
            .with_description("Active calls of the same employee must be 15 minutes apart")
            .with_message("The employee already has a call within 15 minutes of this time")
            .with_severity(Severity::Error)
            .with_category(Category::Business)
            .for_fields([SCHEDULED_AT]),
    );
}

fn notes_are_descriptive(value: &Value, _: &ValidationContext) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty() || word_count(text) >= MIN_NOTE_WORDS,
        _ => false,
    }
}

fn duration_in_range(value: &Value, _: &ValidationContext) -> bool {
    if value.is_null() {
        return true;
    }
    parse_duration_minutes(value)
        .map(|minutes| (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes))
        .unwrap_or(false)
}

fn is_not_in_past(value: &Value, ctx: &ValidationContext) -> bool {
    if value.is_null() || ctx.allow_past {
        return true;
    }
    parse_timestamp(value, ctx.timezone)
        .map(|scheduled_at| scheduled_at >= ctx.now())
        .unwrap_or(false)
}

fn within_working_hours(value: &Value, ctx: &ValidationContext) -> bool {
    let Some(scheduled_at) = parse_timestamp(value, ctx.timezone) else {
        return true;
    };

    let (weekday, hour) = match ctx.timezone {
        Some(offset) => {
            let local = scheduled_at.with_timezone(&offset);
            (local.weekday(), local.hour())
        }
        None => {
            let local = scheduled_at.with_timezone(&Local);
            (local.weekday(), local.hour())
        }
    };

    let weekend = matches!(weekday, Weekday::Sat | Weekday::Sun);
    !weekend && (WORKDAY_START_HOUR..WORKDAY_END_HOUR).contains(&hour)
}

fn has_no_overlap(value: &Value, ctx: &ValidationContext) -> bool {
    let Some(schedule) = &ctx.schedule else {
        return true;
    };
    let Some(candidate) = parse_timestamp(value, ctx.timezone) else {
        return true;
    };
    find_conflicts(candidate, schedule).is_empty()
}
