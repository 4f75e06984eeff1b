//! Temporal overlap detection for scheduled calls.
//!
//! Two active bookings for the same employee conflict when they start less
//! than [`BUFFER_WINDOW_MINUTES`] apart. The window is symmetric and the
//! comparison is strict: bookings exactly one window apart do not conflict.

use chrono::{DateTime, Duration, Utc};

use crate::context::{CallSlot, ScheduleContext};

/// Minimum separation between two active bookings of the same employee.
pub const BUFFER_WINDOW_MINUTES: i64 = 15;

/// [`BUFFER_WINDOW_MINUTES`] as a duration.
pub fn buffer_window() -> Duration {
    Duration::minutes(BUFFER_WINDOW_MINUTES)
}

/// Return every booking in `schedule` that clashes with `candidate`.
///
/// Without an employee id or a list of existing calls nothing can be
/// asserted, so the result is empty. Calls of other employees, the call
/// being edited, and calls in a terminal state are skipped.
pub fn find_conflicts<'a>(
    candidate: DateTime<Utc>,
    schedule: &'a ScheduleContext,
) -> Vec<&'a CallSlot> {
    let (Some(employee_id), Some(existing_calls)) =
        (&schedule.employee_id, &schedule.existing_calls)
    else {
        return Vec::new();
    };

    let window_ms = buffer_window().num_milliseconds();

    existing_calls
        .iter()
        .filter(|call| &call.employee_id == employee_id)
        .filter(|call| schedule.call_id.as_deref() != Some(call.id.as_str()))
        .filter(|call| !call.status.is_terminal())
        .filter(|call| {
            let delta_ms = (candidate - call.scheduled_at).num_milliseconds().abs();
            delta_ms < window_ms
        })
        .collect()
}
