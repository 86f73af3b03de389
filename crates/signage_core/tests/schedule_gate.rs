mod common;

use chrono::Weekday;
use common::{Sim, MONDAY_MIDNIGHT_UTC};
use signage_core::{
    any_window_matches, ManualClock, Msg, ScheduleGate, ScheduleWindow, WidgetDisplay, WidgetSpec,
};

const HOUR: i64 = 3_600_000;
const MINUTE: i64 = 60_000;

fn utc_window(start: Option<&str>, end: Option<&str>) -> ScheduleWindow {
    ScheduleWindow {
        start: start.map(str::to_string),
        end: end.map(str::to_string),
        timezone: Some("UTC".to_string()),
        ..ScheduleWindow::default()
    }
}

#[test]
fn overnight_window_matches_after_midnight_only() {
    let windows = [utc_window(Some("22:00"), Some("06:00")).compile()];
    let open_at = |offset: i64| any_window_matches(&windows, MONDAY_MIDNIGHT_UTC + offset);
    assert!(open_at(HOUR + 30 * MINUTE));
    assert!(!open_at(12 * HOUR));
    assert!(open_at(23 * HOUR));
}

#[test]
fn windows_combine_with_logical_or() {
    let windows = [
        utc_window(Some("07:00"), Some("09:00")).compile(),
        utc_window(Some("17:00"), Some("19:00")).compile(),
    ];
    let open_at = |offset: i64| any_window_matches(&windows, MONDAY_MIDNIGHT_UTC + offset);
    assert!(open_at(8 * HOUR));
    assert!(open_at(18 * HOUR));
    assert!(!open_at(12 * HOUR));
    assert!(any_window_matches(&[], MONDAY_MIDNIGHT_UTC));
}

#[test]
fn weekday_is_taken_in_window_zone() {
    // Monday 23:30 UTC is already Tuesday in Tokyo.
    let tuesday_in_tokyo = ScheduleWindow {
        days: Some(vec![Weekday::Tue]),
        timezone: Some("Asia/Tokyo".to_string()),
        ..ScheduleWindow::default()
    }
    .compile();
    let now = MONDAY_MIDNIGHT_UTC + 23 * HOUR + 30 * MINUTE;
    assert!(tuesday_in_tokyo.matches(now));

    let monday_utc = ScheduleWindow {
        days: Some(vec![Weekday::Mon]),
        timezone: Some("UTC".to_string()),
        ..ScheduleWindow::default()
    }
    .compile();
    assert!(monday_utc.matches(now));
}

#[test]
fn gate_selects_content_or_fallback() {
    let manual = ManualClock::new(MONDAY_MIDNIGHT_UTC + 10 * HOUR);
    let gate = ScheduleGate::new(&[utc_window(Some("09:00"), Some("17:00"))], manual.clock());
    assert_eq!(gate.select("menu", Some("closed")), Some("menu"));

    manual.set(MONDAY_MIDNIGHT_UTC + 18 * HOUR);
    assert_eq!(gate.select("menu", Some("closed")), Some("closed"));
    assert_eq!(gate.select("menu", None), None);
}

#[test]
fn board_gate_opens_on_the_minute_boundary() {
    let start = MONDAY_MIDNIGHT_UTC + 9 * HOUR - 30_000;
    let mut sim = Sim::new(start);
    sim.dispatch(Msg::Mount {
        widget: 9,
        spec: WidgetSpec::Gate {
            windows: vec![utc_window(Some("09:00"), Some("17:00"))],
            content: "breakfast menu".to_string(),
            fallback: Some("opening soon".to_string()),
        },
    });
    assert_eq!(
        sim.display(9),
        WidgetDisplay::Gate {
            open: false,
            showing: Some("opening soon".to_string()),
        }
    );

    sim.run_until(MONDAY_MIDNIGHT_UTC + 9 * HOUR);
    assert_eq!(sim.fire_times(9), vec![MONDAY_MIDNIGHT_UTC + 9 * HOUR]);
    assert_eq!(
        sim.display(9),
        WidgetDisplay::Gate {
            open: true,
            showing: Some("breakfast menu".to_string()),
        }
    );
}

#[test]
fn window_specs_deserialize_from_ron() {
    let window: ScheduleWindow = ron::from_str(
        r#"(days: Some(["Sat", "Sunday"]), start: Some("22:00"), end: Some("06:00"), timezone: Some("Europe/Berlin"))"#,
    )
    .expect("valid window");
    assert_eq!(window.days, Some(vec![Weekday::Sat, Weekday::Sun]));
    assert_eq!(window.end.as_deref(), Some("06:00"));

    let unbounded: ScheduleWindow = ron::from_str("()").expect("all fields default");
    assert_eq!(unbounded, ScheduleWindow::default());
}
