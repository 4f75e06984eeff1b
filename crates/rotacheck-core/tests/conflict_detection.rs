use chrono::{DateTime, Duration, TimeZone, Utc};
use rotacheck_core::rules::business::NO_OVERLAP;
use rotacheck_core::{
    CallSlot, CallStatus, ENTITY_CALL, ScheduleContext, ValidationContext, ValidationEngine,
    ValidationResult,
};
use serde_json::json;

fn booked_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 3, 10, 0, 0)
        .single()
        .expect("valid instant")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0)
        .single()
        .expect("valid instant")
}

fn context(existing: Vec<CallSlot>) -> ValidationContext {
    ValidationContext::default()
        .with_now(now())
        .with_schedule(ScheduleContext::new("emp-1", existing))
}

fn check(
    engine: &ValidationEngine,
    candidate: DateTime<Utc>,
    ctx: &ValidationContext,
) -> ValidationResult {
    engine.validate_field(
        ENTITY_CALL,
        "scheduled_at",
        &json!(candidate.to_rfc3339()),
        Some(ctx),
    )
}

fn has_overlap(result: &ValidationResult) -> bool {
    result.errors.iter().any(|message| message.rule_id == NO_OVERLAP)
}

#[test]
fn exactly_fifteen_minutes_apart_does_not_conflict() {
    let engine = ValidationEngine::new().expect("builtin rules");
    let ctx = context(vec![CallSlot::new("c1", "emp-1", booked_at(), CallStatus::Scheduled)]);

    let after = check(&engine, booked_at() + Duration::minutes(15), &ctx);
    let before = check(&engine, booked_at() - Duration::minutes(15), &ctx);

    assert!(!has_overlap(&after));
    assert!(!has_overlap(&before));
}

#[test]
fn just_under_fifteen_minutes_conflicts() {
    let engine = ValidationEngine::new().expect("builtin rules");
    let ctx = context(vec![CallSlot::new("c1", "emp-1", booked_at(), CallStatus::Scheduled)]);

    let candidate = booked_at() + Duration::minutes(14) + Duration::seconds(59);
    let result = check(&engine, candidate, &ctx);

    assert!(has_overlap(&result));
    assert!(!result.is_valid());
}

#[test]
fn edited_call_never_conflicts_with_itself() {
    let engine = ValidationEngine::new().expect("builtin rules");
    let mut ctx = context(vec![CallSlot::new("c1", "emp-1", booked_at(), CallStatus::Scheduled)]);
    ctx.schedule = ctx.schedule.map(|schedule| schedule.editing("c1"));

    let result = check(&engine, booked_at(), &ctx);
    assert!(!has_overlap(&result));
}

#[test]
fn ignores_terminal_calls_and_other_employees() {
    let engine = ValidationEngine::new().expect("builtin rules");
    let ctx = context(vec![
        CallSlot::new("c1", "emp-1", booked_at(), CallStatus::Cancelled),
        CallSlot::new("c2", "emp-1", booked_at(), CallStatus::Completed),
        CallSlot::new("c3", "emp-2", booked_at(), CallStatus::Scheduled),
    ]);

    let result = check(&engine, booked_at(), &ctx);
    assert!(!has_overlap(&result));
}

#[test]
fn incomplete_context_passes() {
    let engine = ValidationEngine::new().expect("builtin rules");
    let booking = CallSlot::new("c1", "emp-1", booked_at(), CallStatus::Scheduled);

    let no_schedule = ValidationContext::default().with_now(now());
    let no_employee = ValidationContext::default()
        .with_now(now())
        .with_schedule(ScheduleContext {
            employee_id: None,
            existing_calls: Some(vec![booking.clone()]),
            call_id: None,
        });

    assert!(!has_overlap(&check(&engine, booked_at(), &no_schedule)));
    assert!(!has_overlap(&check(&engine, booked_at(), &no_employee)));

    let full = context(vec![booking]);
    let absent = engine.validate_field(ENTITY_CALL, "scheduled_at", &json!(null), Some(&full));
    assert!(absent.is_valid());
}
