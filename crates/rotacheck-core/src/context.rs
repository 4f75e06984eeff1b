use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Caller-supplied payload for context-dependent rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationContext {
    /// Reference instant; defaults to the current time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now: Option<DateTime<Utc>>,
    /// Local offset for working hours and naive timestamps; host local time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "offset_text")]
    pub timezone: Option<FixedOffset>,
    /// Accept timestamps in the past (future-date rule opt-out).
    #[serde(default)]
    pub allow_past: bool,
    /// Bookings used by the no-overlap rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleContext>,
}

impl ValidationContext {
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn with_timezone(mut self, timezone: FixedOffset) -> Self {
        self.timezone = Some(timezone);
        self
    }

    pub fn allowing_past(mut self) -> Self {
        self.allow_past = true;
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleContext) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// The reference instant for time-relative rules.
    pub fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

/// Existing bookings for one employee, plus the call being edited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_calls: Option<Vec<CallSlot>>,
    /// Id of the call being edited; it never conflicts with itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

impl ScheduleContext {
    pub fn new(employee_id: impl Into<String>, existing_calls: Vec<CallSlot>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            existing_calls: Some(existing_calls),
            call_id: None,
        }
    }

    pub fn editing(mut self, call_id: impl Into<String>) -> Self {
        self.call_id = Some(call_id.into());
        self
    }
}

/// A booked call as seen by the conflict detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSlot {
    pub id: String,
    pub employee_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: CallStatus,
}

impl CallSlot {
    pub fn new(
        id: impl Into<String>,
        employee_id: impl Into<String>,
        scheduled_at: DateTime<Utc>,
        status: CallStatus,
    ) -> Self {
        Self {
            id: id.into(),
            employee_id: employee_id.into(),
            scheduled_at,
            status,
        }
    }
}

/// Lifecycle state of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Scheduled,
    Rescheduled,
    Completed,
    Cancelled,
}

impl CallStatus {
    /// Terminal calls no longer occupy a time slot.
    pub fn is_terminal(self) -> bool {
        matches!(self, CallStatus::Completed | CallStatus::Cancelled)
    }
}

/// Offsets travel as `+HH:MM` strings.
mod offset_text {
    use chrono::FixedOffset;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        offset: &Option<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match offset {
            Some(offset) => serializer.serialize_str(&offset.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<FixedOffset>, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;
        text.map(|text| text.parse::<FixedOffset>().map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_context_from_json() {
        let ctx: ValidationContext = serde_json::from_value(json!({
            "now": "2024-03-04T09:00:00Z",
            "timezone": "+01:00",
            "schedule": {
                "employee_id": "emp-1",
                "existing_calls": [{
                    "id": "call-1",
                    "employee_id": "emp-1",
                    "scheduled_at": "2024-03-04T10:00:00Z",
                    "status": "scheduled"
                }]
            }
        }))
        .expect("parse context");

        assert!(!ctx.allow_past);
        assert_eq!(ctx.timezone, FixedOffset::east_opt(3600));
        let schedule = ctx.schedule.expect("schedule present");
        assert_eq!(schedule.employee_id.as_deref(), Some("emp-1"));
        assert_eq!(schedule.existing_calls.map(|calls| calls.len()), Some(1));
        assert!(schedule.call_id.is_none());
    }

    #[test]
    fn terminal_statuses() {
        assert!(CallStatus::Completed.is_terminal());
        assert!(CallStatus::Cancelled.is_terminal());
        assert!(!CallStatus::Scheduled.is_terminal());
        assert!(!CallStatus::Rescheduled.is_terminal());
    }
}
