//! Daily reset boundary arithmetic.
//!
//! The only place that knows about calendars. Everything else compares
//! instants.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use zero_common::Zone;

/// Wall-clock `at_hour:00:00` on `date`.
///
/// Hours above 23 are a caller error; they roll into the following day(s)
/// rather than panicking.
fn wall_clock_at(date: NaiveDate, at_hour: u32) -> NaiveDateTime {
    let midnight = date.and_time(NaiveTime::MIN);
    midnight
        .checked_add_signed(TimeDelta::hours(i64::from(at_hour)))
        .unwrap_or(midnight)
}

fn boundary_on(zone: Zone, date: NaiveDate, at_hour: u32) -> DateTime<Utc> {
    zone.resolve_local(wall_clock_at(date, at_hour))
}

/// Most recent `at_hour:00:00` in `zone` that is at or before `now`.
///
/// A session updated at or after this instant belongs to the current reset
/// day.
pub fn daily_reset_boundary(now: DateTime<Utc>, zone: Zone, at_hour: u32) -> DateTime<Utc> {
    let today = zone.local_naive(now).date();
    let candidate = boundary_on(zone, today, at_hour);
    if candidate <= now {
        return candidate;
    }

    match today.checked_sub_days(Days::new(1)) {
        Some(yesterday) => boundary_on(zone, yesterday, at_hour),
        None => candidate,
    }
}

/// The boundary after `boundary`: same wall-clock hour, one calendar day later.
pub fn next_daily_reset(boundary: DateTime<Utc>, zone: Zone, at_hour: u32) -> DateTime<Utc> {
    let date = zone.local_naive(boundary).date();
    match date.checked_add_days(Days::new(1)) {
        Some(tomorrow) => boundary_on(zone, tomorrow, at_hour),
        None => boundary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn boundary_today_when_past_hour() {
        let now = utc(2026, 10, 18, 12, 0, 0);
        assert_eq!(daily_reset_boundary(now, Zone::Utc, 4), utc(2026, 10, 18, 4, 0, 0));
    }

    #[test]
    fn boundary_yesterday_when_before_hour() {
        let now = utc(2026, 10, 18, 3, 59, 59);
        assert_eq!(daily_reset_boundary(now, Zone::Utc, 4), utc(2026, 10, 17, 4, 0, 0));
    }

    #[test]
    fn boundary_is_inclusive_at_the_hour() {
        let now = utc(2026, 10, 18, 4, 0, 0);
        assert_eq!(daily_reset_boundary(now, Zone::Utc, 4), now);
    }

    #[test]
    fn boundary_at_midnight_hour() {
        let now = utc(2026, 1, 1, 0, 30, 0);
        assert_eq!(daily_reset_boundary(now, Zone::Utc, 0), utc(2026, 1, 1, 0, 0, 0));
    }

    #[test]
    fn boundary_uses_zone_wall_clock() {
        // 03:30 CEST on the 18th, before the 04:00 reset in Berlin.
        let berlin = Zone::Named(chrono_tz::Europe::Berlin);
        let now = utc(2026, 10, 18, 1, 30, 0);
        assert_eq!(daily_reset_boundary(now, berlin, 4), utc(2026, 10, 17, 2, 0, 0));
    }

    #[test]
    fn boundary_inside_dst_gap_moves_forward() {
        // 02:00 does not exist in New York on 2026-03-08; reset happens at 03:00 EDT.
        let ny = Zone::Named(chrono_tz::America::New_York);
        let now = utc(2026, 3, 8, 12, 0, 0);
        assert_eq!(daily_reset_boundary(now, ny, 2), utc(2026, 3, 8, 7, 0, 0));
    }

    #[test]
    fn next_reset_is_one_calendar_day_later() {
        let boundary = utc(2026, 10, 18, 4, 0, 0);
        assert_eq!(next_daily_reset(boundary, Zone::Utc, 4), utc(2026, 10, 19, 4, 0, 0));
    }

    #[test]
    fn next_reset_across_dst_end_is_25_hours() {
        // Berlin leaves CEST on 2026-10-25.
        let berlin = Zone::Named(chrono_tz::Europe::Berlin);
        let boundary = utc(2026, 10, 24, 2, 0, 0);
        let next = next_daily_reset(boundary, berlin, 4);
        assert_eq!(next, utc(2026, 10, 25, 3, 0, 0));
        assert_eq!(next - boundary, TimeDelta::hours(25));
    }
}
