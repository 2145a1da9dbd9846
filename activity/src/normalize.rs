//! Payload → record normalization with issue collection.

use crate::payload::{ActivityPayload, NumberField};
use crate::record::{check_plausible, check_positive};
use crate::ActivityRecord;
use chrono::DateTime;
use fitstake_types::{ActivityType, Timestamp, VerificationParams};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Why a payload could not be normalized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub issues: Vec<String>,
}

impl CompletenessReport {
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    /// All issues joined into one line.
    pub fn summary(&self) -> String {
        self.issues.join("; ")
    }
}

/// Normalize an untrusted payload.
///
/// Every field is checked; all problems are reported together. Any issue at
/// all, including a plausibility violation, fails normalization.
pub fn normalize(
    payload: &ActivityPayload,
    params: &VerificationParams,
) -> Result<ActivityRecord, CompletenessReport> {
    let mut issues = Vec::new();

    let id = payload.source_id();
    if id.is_none() {
        issues.push("missing id".to_string());
    }

    let name = payload.string("name");
    if name.is_none() {
        issues.push("missing name".to_string());
    }

    let distance = required_number(payload, "distance", &mut issues);

    let start_time = match payload.field("start_date") {
        None => {
            issues.push("missing start_date".to_string());
            None
        }
        Some(value) => {
            let parsed = parse_start_date(value);
            if parsed.is_none() {
                issues.push(format!("start_date is not a valid timestamp: {value}"));
            }
            parsed
        }
    };

    let activity_type = payload
        .string("type")
        .or_else(|| payload.string("sport_type"))
        .map(ActivityType::new);
    if activity_type.is_none() {
        issues.push("missing type".to_string());
    }

    // Durations are whole seconds; positivity is judged after rounding.
    let moving_time = required_number(payload, "moving_time", &mut issues).map(f64::round);
    let elapsed_time = match payload.number("elapsed_time") {
        NumberField::Value(v) if v >= 0.0 => Some(v.round()),
        NumberField::Missing => moving_time,
        _ => {
            issues.push("elapsed_time is not a non-negative number".to_string());
            None
        }
    };

    let (average_speed, speed_derived) = match payload.number("average_speed") {
        NumberField::Value(v) => (Some(v), false),
        NumberField::Invalid => {
            issues.push("average_speed is not a number".to_string());
            (None, false)
        }
        NumberField::Missing => match (distance, moving_time) {
            (Some(d), Some(t)) if t > 0.0 => (Some(d / t), true),
            _ => (None, true),
        },
    };

    if let Some(d) = distance {
        check_positive(&mut issues, "distance", d);
    }
    if let Some(t) = moving_time {
        check_positive(&mut issues, "moving_time", t);
    }
    match average_speed {
        Some(s) => check_positive(&mut issues, "average_speed", s),
        None if speed_derived && moving_time.is_some() && distance.is_some() => {
            // moving_time <= 0 was already reported; speed cannot be derived.
        }
        None if speed_derived => issues.push("average_speed cannot be derived".to_string()),
        None => {}
    }
    if let (Some(d), Some(s)) = (distance, average_speed) {
        check_plausible(&mut issues, d, s, params);
    }

    if !issues.is_empty() {
        tracing::debug!(issues = issues.len(), "activity payload incomplete");
        return Err(CompletenessReport { issues });
    }

    let incomplete = || CompletenessReport {
        issues: vec!["incomplete activity record".to_string()],
    };
    Ok(ActivityRecord {
        id: id.ok_or_else(incomplete)?,
        name: name.ok_or_else(incomplete)?.to_string(),
        activity_type: activity_type.ok_or_else(incomplete)?,
        distance_m: distance.ok_or_else(incomplete)?,
        moving_time_s: moving_time.ok_or_else(incomplete)? as u64,
        elapsed_time_s: elapsed_time.ok_or_else(incomplete)? as u64,
        start_time: start_time.ok_or_else(incomplete)?,
        average_speed_mps: average_speed.ok_or_else(incomplete)?,
        speed_derived,
    })
}

fn required_number(
    payload: &ActivityPayload,
    field: &str,
    issues: &mut Vec<String>,
) -> Option<f64> {
    match payload.number(field) {
        NumberField::Value(v) => Some(v),
        NumberField::Missing => {
            issues.push(format!("missing {field}"));
            None
        }
        NumberField::Invalid => {
            issues.push(format!("{field} is not a number"));
            None
        }
    }
}

/// Accepts RFC 3339 strings (`2024-03-01T07:30:00Z`) or integer Unix seconds.
fn parse_start_date(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => {
            let dt = DateTime::parse_from_rfc3339(s.trim()).ok()?;
            u64::try_from(dt.timestamp()).ok().map(Timestamp::new)
        }
        Value::Number(n) => n.as_u64().map(Timestamp::new),
        _ => None,
    }
}
