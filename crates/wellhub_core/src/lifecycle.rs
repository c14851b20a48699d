//! Flare (episode) lifecycle rules.
//!
//! # Responsibility
//! - Enforce the `active -> resolved` state machine at the store boundary.
//! - Derive the human-readable duration when a flare is resolved.
//!
//! # Invariants
//! - `endDate`, `endTime` and `duration` exist iff `status == "resolved"`.
//! - Flares are inserted `active`; supplying `endDate` + `endTime` on update
//!   is the only way to resolve one.
//! - A resolved flare is never re-opened or re-ended.
//! - `duration` is always derived, never accepted from callers.

use crate::calendar::{parse_clock, parse_day};
use crate::model::flare::FlareStatus;
use crate::registry::{JsonMap, RecordViolation};
use chrono::NaiveDateTime;
use serde_json::Value;

const STATUS: &str = "status";
const START_DATE: &str = "startDate";
const START_TIME: &str = "startTime";
const END_DATE: &str = "endDate";
const END_TIME: &str = "endTime";
const DURATION: &str = "duration";

/// Formats elapsed time between two instants as `"{d}d {h}h"`.
///
/// Hours are floored. The day segment is omitted when no full day elapsed;
/// the hour segment is always present, even as `"0h"`.
pub fn format_duration(
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<String, RecordViolation> {
    if end < start {
        return Err(RecordViolation::InvalidTransition(
            "flare cannot end before it starts".to_string(),
        ));
    }

    let hours = (end - start).num_hours();
    let days = hours / 24;
    let rest = hours % 24;
    if days > 0 {
        Ok(format!("{days}d {rest}h"))
    } else {
        Ok(format!("{rest}h"))
    }
}

/// Whole-record check run on every flare write.
pub fn validate_flare(body: &JsonMap) -> Result<(), RecordViolation> {
    let status = read_status(body)?;
    let end_fields = [END_DATE, END_TIME, DURATION];

    match status {
        FlareStatus::Active => {
            if let Some(field) = end_fields.iter().find(|field| present(body, field)) {
                return Err(RecordViolation::Invalid(format!(
                    "active flare cannot carry `{field}`"
                )));
            }
            Ok(())
        }
        FlareStatus::Resolved => {
            if let Some(field) = end_fields.iter().find(|field| !present(body, field)) {
                return Err(RecordViolation::MissingField((*field).to_string()));
            }
            let expected = format_duration(
                instant(body, START_DATE, START_TIME)?,
                instant(body, END_DATE, END_TIME)?,
            )?;
            if body.get(DURATION).and_then(Value::as_str) != Some(expected.as_str()) {
                return Err(RecordViolation::Invalid(format!(
                    "flare duration must be `{expected}`"
                )));
            }
            Ok(())
        }
    }
}

/// Insert-time check: a new flare always starts `active`.
pub fn before_flare_add(body: &JsonMap) -> Result<(), RecordViolation> {
    match read_status(body)? {
        FlareStatus::Active => Ok(()),
        FlareStatus::Resolved => Err(RecordViolation::InvalidTransition(
            "flares are created active and resolved by update".to_string(),
        )),
    }
}

/// Rewrites a flare patch before it is merged into `current`.
///
/// Resolving sets `status` and `duration`; moving the start of a resolved
/// flare re-derives `duration`.
pub fn before_flare_update(current: &JsonMap, patch: &mut JsonMap) -> Result<(), RecordViolation> {
    patch.retain(|key, value| current.get(key) != Some(value));

    if patch.contains_key(DURATION) {
        return Err(RecordViolation::InvalidTransition(
            "flare duration is derived and cannot be set".to_string(),
        ));
    }
    if patch.contains_key(STATUS) {
        return Err(RecordViolation::InvalidTransition(
            "flare status changes only by supplying endDate and endTime".to_string(),
        ));
    }

    let resolved = read_status(current)? == FlareStatus::Resolved;
    let ends = patch.contains_key(END_DATE) || patch.contains_key(END_TIME);
    let moves_start = patch.contains_key(START_DATE) || patch.contains_key(START_TIME);

    if ends && resolved {
        return Err(RecordViolation::InvalidTransition(
            "flare is already resolved".to_string(),
        ));
    }
    if !ends && !(resolved && moves_start) {
        return Ok(());
    }

    let mut merged = current.clone();
    merged.extend(patch.clone());
    for field in [END_DATE, END_TIME] {
        if !present(&merged, field) {
            return Err(RecordViolation::MissingField(field.to_string()));
        }
    }

    let duration = format_duration(
        instant(&merged, START_DATE, START_TIME)?,
        instant(&merged, END_DATE, END_TIME)?,
    )?;
    if ends {
        patch.insert(
            STATUS.to_string(),
            Value::String(FlareStatus::Resolved.as_str().to_string()),
        );
    }
    patch.insert(DURATION.to_string(), Value::String(duration));
    Ok(())
}

fn present(body: &JsonMap, field: &str) -> bool {
    body.get(field).is_some_and(|value| !value.is_null())
}

fn read_status(body: &JsonMap) -> Result<FlareStatus, RecordViolation> {
    let raw = body
        .get(STATUS)
        .ok_or_else(|| RecordViolation::MissingField(STATUS.to_string()))?;
    raw.as_str()
        .and_then(FlareStatus::parse)
        .ok_or_else(|| RecordViolation::Invalid(format!("unknown flare status `{raw}`")))
}

fn instant(
    body: &JsonMap,
    date_field: &str,
    time_field: &str,
) -> Result<NaiveDateTime, RecordViolation> {
    let date_text = text_field(body, date_field)?;
    let day = parse_day(date_text).ok_or_else(|| RecordViolation::MalformedDate {
        field: date_field.to_string(),
        value: date_text.to_string(),
    })?;

    let time_text = text_field(body, time_field)?;
    let time = parse_clock(time_text).ok_or_else(|| RecordViolation::MalformedTime {
        field: time_field.to_string(),
        value: time_text.to_string(),
    })?;

    Ok(day.and_time(time))
}

fn text_field<'a>(body: &'a JsonMap, field: &str) -> Result<&'a str, RecordViolation> {
    match body.get(field) {
        Some(Value::String(text)) => Ok(text),
        Some(other) => Err(RecordViolation::Invalid(format!(
            "field `{field}` must be a string, got {other}"
        ))),
        None => Err(RecordViolation::MissingField(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{before_flare_add, before_flare_update, format_duration, validate_flare};
    use crate::registry::{JsonMap, RecordViolation};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::{json, Value};

    fn instant(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("valid instant")
    }

    fn object(value: Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn active_flare() -> JsonMap {
        object(json!({
            "startDate": "2025-01-01",
            "startTime": "10:00",
            "status": "active",
            "severity": 3
        }))
    }

    #[test]
    fn same_day_duration_omits_days() {
        assert_eq!(format_duration(instant(1, 10), instant(1, 14)).unwrap(), "4h");
    }

    #[test]
    fn multi_day_duration_shows_days_and_hours() {
        assert_eq!(
            format_duration(instant(1, 10), instant(3, 12)).unwrap(),
            "2d 2h"
        );
    }

    #[test]
    fn zero_hours_are_still_shown() {
        assert_eq!(format_duration(instant(1, 10), instant(1, 10)).unwrap(), "0h");
        assert_eq!(format_duration(instant(1, 10), instant(2, 10)).unwrap(), "1d 0h");
    }

    #[test]
    fn partial_hours_are_floored() {
        let start = instant(1, 10);
        let end = start + chrono::Duration::minutes(59);
        assert_eq!(format_duration(start, end).unwrap(), "0h");
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = format_duration(instant(2, 10), instant(1, 10)).unwrap_err();
        assert!(matches!(err, RecordViolation::InvalidTransition(_)));
    }

    #[test]
    fn ending_sets_status_and_duration() {
        let current = active_flare();
        let mut patch = object(json!({ "endDate": "2025-01-03", "endTime": "12:00" }));

        before_flare_update(&current, &mut patch).unwrap();

        assert_eq!(patch.get("status"), Some(&json!("resolved")));
        assert_eq!(patch.get("duration"), Some(&json!("2d 2h")));
    }

    #[test]
    fn ending_needs_both_end_fields() {
        let current = active_flare();
        let mut patch = object(json!({ "endDate": "2025-01-03" }));

        let err = before_flare_update(&current, &mut patch).unwrap_err();
        assert_eq!(err, RecordViolation::MissingField("endTime".to_string()));
    }

    #[test]
    fn direct_status_change_is_rejected() {
        let current = active_flare();
        let mut patch = object(json!({ "status": "resolved" }));

        let err = before_flare_update(&current, &mut patch).unwrap_err();
        assert!(matches!(err, RecordViolation::InvalidTransition(_)));
    }

    #[test]
    fn resolved_flare_cannot_be_ended_again() {
        let mut current = active_flare();
        let mut resolve = object(json!({ "endDate": "2025-01-01", "endTime": "14:00" }));
        before_flare_update(&current, &mut resolve).unwrap();
        current.extend(resolve);

        let mut again = object(json!({ "endDate": "2025-01-02", "endTime": "14:00" }));
        let err = before_flare_update(&current, &mut again).unwrap_err();
        assert!(matches!(err, RecordViolation::InvalidTransition(_)));
    }

    #[test]
    fn moving_start_of_resolved_flare_rederives_duration() {
        let mut current = active_flare();
        let mut resolve = object(json!({ "endDate": "2025-01-01", "endTime": "14:00" }));
        before_flare_update(&current, &mut resolve).unwrap();
        current.extend(resolve);

        let mut patch = object(json!({ "startTime": "08:00" }));
        before_flare_update(&current, &mut patch).unwrap();
        assert_eq!(patch.get("duration"), Some(&json!("6h")));
    }

    #[test]
    fn unchanged_fields_are_dropped_from_patch() {
        let current = active_flare();
        let mut patch = object(json!({ "status": "active", "severity": 4 }));

        before_flare_update(&current, &mut patch).unwrap();
        assert_eq!(patch, object(json!({ "severity": 4 })));
    }

    #[test]
    fn active_flare_cannot_carry_end_fields() {
        let mut body = active_flare();
        body.insert("endDate".to_string(), json!("2025-01-02"));
        assert!(matches!(
            validate_flare(&body),
            Err(RecordViolation::Invalid(_))
        ));
    }

    #[test]
    fn resolved_flare_needs_matching_duration() {
        let mut body = active_flare();
        body.insert("status".to_string(), json!("resolved"));
        body.insert("endDate".to_string(), json!("2025-01-01"));
        body.insert("endTime".to_string(), json!("14:00"));
        body.insert("duration".to_string(), json!("5h"));
        assert!(validate_flare(&body).is_err());

        body.insert("duration".to_string(), json!("4h"));
        assert!(validate_flare(&body).is_ok());
    }

    #[test]
    fn new_flares_must_start_active() {
        assert!(before_flare_add(&active_flare()).is_ok());

        let mut body = active_flare();
        body.insert("status".to_string(), json!("resolved"));
        assert!(matches!(
            before_flare_add(&body),
            Err(RecordViolation::InvalidTransition(_))
        ));

        body.remove("status");
        assert_eq!(
            before_flare_add(&body),
            Err(RecordViolation::MissingField("status".to_string()))
        );
    }
}
