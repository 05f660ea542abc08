//! End-to-end freshness checks: config → resolved policy → decision.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use test_case::test_case;
use zero_common::Config;
use zero_session::{
    evaluate_freshness, resolve_channel_override, resolve_policy, SessionResetPolicy,
    SessionResetType, Zone,
};

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, h, m, 0).unwrap()
}

fn config() -> Config {
    Config::from_json(
        r#"{
            "session": {
                "reset": { "mode": "daily", "atHour": 4 },
                "resetByType": {
                    "group": { "mode": "idle", "idleMinutes": 30 },
                    "thread": { "mode": "never", "idleMinutes": 1 }
                },
                "resetByChannel": {
                    "slack": { "mode": "daily", "at_hour": 9 }
                }
            }
        }"#,
    )
    .unwrap()
}

#[test_case("agent:main:telegram:dm:1", None, at(3, 0), at(12, 0), false ; "direct before daily boundary")]
#[test_case("agent:main:telegram:dm:1", None, at(4, 30), at(12, 0), true ; "direct after daily boundary")]
#[test_case("agent:main:telegram:group:7", None, at(11, 50), at(12, 0), true ; "group within idle window")]
#[test_case("agent:main:telegram:group:7", None, at(11, 15), at(12, 0), false ; "group past idle window")]
#[test_case("agent:main:telegram:group:7:thread:3", None, at(0, 0), at(23, 59), true ; "thread never resets")]
#[test_case("agent:main:slack:group:eng", Some("slack"), at(8, 0), at(12, 0), false ; "channel daily beats group idle")]
#[test_case("agent:main:slack:group:eng", Some("slack"), at(9, 0), at(12, 0), true ; "channel daily fresh after nine")]
fn freshness_from_config(
    session_key: &str,
    channel: Option<&str>,
    updated_at: DateTime<Utc>,
    now: DateTime<Utc>,
    expected_fresh: bool,
) {
    let config = config();
    let reset_type = SessionResetType::classify(session_key, false, false);
    let channel_override = resolve_channel_override(Some(&config.session), channel);
    let policy = resolve_policy(Some(&config.session), reset_type.as_str(), channel_override);

    let result = evaluate_freshness(updated_at, now, &policy, Zone::Utc);
    assert_eq!(result.fresh, expected_fresh, "policy {policy} for {session_key}");
}

#[test]
fn no_config_means_daily_at_four() {
    let policy = resolve_policy(None, SessionResetType::Direct.as_str(), None);
    let yesterday = at(3, 0) - TimeDelta::days(1);

    let result = evaluate_freshness(yesterday, at(12, 0), &policy, Zone::Utc);
    assert!(!result.fresh);
    assert_eq!(result.daily_reset_at, Some(at(4, 0)));
}

fn instant(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + TimeDelta::seconds(offset_secs)
}

proptest! {
    #[test]
    fn never_mode_is_always_fresh(age_secs in 0i64..10_000_000, now_secs in 0i64..100_000_000) {
        let now = instant(now_secs);
        let updated_at = now - TimeDelta::seconds(age_secs);
        let result = evaluate_freshness(updated_at, now, &SessionResetPolicy::Never, Zone::Utc);

        prop_assert!(result.fresh);
        prop_assert!(result.daily_reset_at.is_none());
        prop_assert!(result.idle_expires_at.is_none());
    }

    #[test]
    fn idle_fresh_iff_within_window(idle_minutes in 1i64..10_000, age_secs in 0i64..1_000_000) {
        let now = instant(50_000_000);
        let updated_at = now - TimeDelta::seconds(age_secs);
        let policy = SessionResetPolicy::Idle { idle_minutes };
        let result = evaluate_freshness(updated_at, now, &policy, Zone::Utc);

        prop_assert_eq!(result.fresh, age_secs < idle_minutes * 60);
        prop_assert_eq!(result.idle_expires_at, Some(updated_at + TimeDelta::minutes(idle_minutes)));
    }

    #[test]
    fn daily_freshness_only_drops_at_boundaries(
        at_hour in 0u32..24,
        updated_secs in 0i64..10_000_000,
        gap_secs in 0i64..200_000,
    ) {
        // If a session is fresh at some later instant, it was fresh at every
        // instant between its update and that one.
        let zone = Zone::Named(chrono_tz::Europe::Berlin);
        let policy = SessionResetPolicy::Daily { at_hour };
        let updated_at = instant(updated_secs);
        let later = updated_at + TimeDelta::seconds(gap_secs);
        let midway = updated_at + TimeDelta::seconds(gap_secs / 2);

        if evaluate_freshness(updated_at, later, &policy, zone).fresh {
            prop_assert!(evaluate_freshness(updated_at, midway, &policy, zone).fresh);
        }
    }

    #[test]
    fn daily_fresh_immediately_after_update(at_hour in 0u32..24, updated_secs in 0i64..10_000_000) {
        let zone = Zone::Named(chrono_tz::America::New_York);
        let policy = SessionResetPolicy::Daily { at_hour };
        let updated_at = instant(updated_secs);

        prop_assert!(evaluate_freshness(updated_at, updated_at, &policy, zone).fresh);
    }
}
