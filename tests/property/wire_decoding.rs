//! Property-based tests for decoding service replies.
//!
//! Uses proptest to verify:
//! 1. Any JSON scalar in the `priority` slot decodes (out-of-range → no bucket).
//! 2. Any string in the `due_date` slot decodes to `None` or a real date.
//! 3. Wire-formatted dates parse back to the same value.
//! 4. An envelope is a success only when `status` is exactly `"success"`.

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use serde_json::{Value, json};

use taskboard_proto::datetime::{format_input, format_wire, parse_input, parse_wire};
use taskboard_proto::envelope::Envelope;
use taskboard_proto::task::{Priority, Task};

// --- Strategies ---

/// Any JSON scalar the service might put where a string or number is expected.
fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6_f64..1.0e6).prop_map(Value::from),
        "[ -~]{0,12}".prop_map(Value::from),
    ]
}

/// Date-times with whole seconds, which is all the wire format carries.
fn arb_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (1970_i32..2100, 1_u32..=12, 1_u32..=28, 0_u32..24, 0_u32..60, 0_u32..60).prop_map(
        |(y, mo, d, h, mi, s)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .and_then(|date| date.and_hms_opt(h, mi, s))
                .expect("components are in range")
        },
    )
}

// --- Task decoding ---

proptest! {
    #[test]
    fn any_priority_scalar_decodes(priority in arb_scalar()) {
        let body = json!({ "id": "1", "message": "m", "priority": priority });
        let task: Task = serde_json::from_value(body).expect("priority never fails decoding");

        match task.level() {
            Some(level) => prop_assert!(Priority::ALL.contains(&level)),
            None => prop_assert!(!(1..=3).contains(&task.priority)),
        }
    }

    #[test]
    fn any_due_date_string_decodes(raw in "[ -~]{0,24}") {
        let body = json!({ "id": "1", "due_date": raw });
        let task: Task = serde_json::from_value(body).expect("due_date never fails decoding");
        prop_assert_eq!(task.due_date, parse_wire(&raw));
    }

    #[test]
    fn any_scalar_id_and_assignee_decode(id in arb_scalar(), assigned in arb_scalar()) {
        let body = json!({ "id": id, "assigned_to": assigned });
        prop_assert!(serde_json::from_value::<Task>(body).is_ok());
    }
}

// --- Date formats ---

proptest! {
    #[test]
    fn wire_format_parses_back(dt in arb_datetime()) {
        prop_assert_eq!(parse_wire(&format_wire(&dt)), Some(dt));
        // The wire format is also accepted as form input.
        prop_assert_eq!(parse_input(&format_wire(&dt)), Ok(dt));
    }

    #[test]
    fn input_format_drops_seconds(dt in arb_datetime()) {
        let parsed = parse_input(&format_input(&dt)).expect("input format must parse");
        prop_assert_eq!(parsed.date(), dt.date());
        prop_assert_eq!(format_input(&parsed), format_input(&dt));
    }

    #[test]
    fn encoded_task_decodes_to_same_fields(dt in prop::option::of(arb_datetime()), p in 0_u8..=5) {
        let task = Task { priority: p, due_date: dt, ..Task::default() };
        let decoded: Task = serde_json::from_str(&serde_json::to_string(&task).unwrap()).unwrap();
        prop_assert_eq!(decoded, task);
    }
}

// --- Envelope status ---

proptest! {
    #[test]
    fn only_exact_success_status_is_success(status in "[a-zA-Z ]{0,10}") {
        let envelope: Envelope =
            serde_json::from_value(json!({ "status": status, "tasks": [] })).unwrap();
        prop_assert_eq!(envelope.is_success(), status == "success");
        prop_assert_eq!(envelope.into_tasks().is_ok(), status == "success");
    }
}
