//! Wall-clock arithmetic for shifts and activities.
//!
//! Times travel through the system as `"HH:MM"` strings and are compared as
//! minutes since midnight. A shift whose exit is not after its entry wraps
//! past midnight; every function here decides that through [`day_bounds`].

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

pub const MINUTES_PER_DAY: i32 = 1440;
pub const LUNCH_WINDOW_START: i32 = 12 * 60;
pub const LUNCH_WINDOW_END: i32 = 13 * 60;
/// Accepted only as the end of an interval.
pub const END_OF_DAY: &str = "24:00";

/// Returns the current time in the configured timezone.
pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

/// Returns today's date in the configured timezone.
pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

/// Parses `"HH:MM"` into minutes since midnight.
///
/// Hours may be one or two digits. `"24:00"` is accepted (1440) so callers
/// can express "until the end of the day"; any other hour above 23 is
/// rejected.
pub fn time_to_minutes(hhmm: &str) -> Option<i32> {
    let (hours, minutes) = hhmm.trim().split_once(':')?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes > 59 || hours > 24 || (hours == 24 && minutes != 0) {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Formats minutes as `"HH:MM"`, wrapping into a single day.
pub fn minutes_to_time(minutes: i32) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Span of a working day in minutes. `end` is pushed into the next day when
/// the shift crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    pub start: i32,
    pub end: i32,
    pub crosses_midnight: bool,
}

impl DayBounds {
    pub fn minutes(&self) -> i32 {
        self.end - self.start
    }

    pub fn hours(&self) -> f64 {
        f64::from(self.minutes()) / 60.0
    }
}

pub fn day_bounds(entry: &str, exit: &str) -> Option<DayBounds> {
    let start = time_to_minutes(entry)?;
    let mut end = time_to_minutes(exit)?;
    let crosses_midnight = end <= start;
    if crosses_midnight {
        end += MINUTES_PER_DAY;
    }
    Some(DayBounds {
        start,
        end,
        crosses_midnight,
    })
}

/// Moves early-morning times of a night shift into the next day.
pub fn normalize_to_span(t: i32, start: i32, crosses_midnight: bool) -> i32 {
    if crosses_midnight && t < start {
        t + MINUTES_PER_DAY
    } else {
        t
    }
}

/// Normalizes an activity interval against the day. An end strictly before
/// the start wraps one day; equal ends give an empty interval.
pub fn normalized_interval(start: i32, end: i32, bounds: Option<&DayBounds>) -> (i32, i32) {
    let (start, mut end) = match bounds {
        Some(bounds) => (
            normalize_to_span(start, bounds.start, bounds.crosses_midnight),
            normalize_to_span(end, bounds.start, bounds.crosses_midnight),
        ),
        None => (start, end),
    };
    if end < start {
        end += MINUTES_PER_DAY;
    }
    (start, end)
}

pub fn interval_overlap(a_start: i32, a_end: i32, b_start: i32, b_end: i32) -> i32 {
    (a_end.min(b_end) - a_start.max(b_start)).max(0)
}

/// Minutes of `[start, end)` that fall inside 12:00–13:00.
pub fn lunch_overlap(start: i32, end: i32) -> i32 {
    interval_overlap(start, end, LUNCH_WINDOW_START, LUNCH_WINDOW_END)
}

/// Combines a calendar date and a wall-clock time into a UTC instant.
///
/// No zone conversion happens: wall-clock times are stored with a nominal
/// UTC offset. `"24:00"` lands on midnight of the following day.
pub fn build_instant(base: NaiveDate, hhmm: &str, add_days: i64) -> Option<DateTime<Utc>> {
    let minutes = time_to_minutes(hhmm)?;
    let midnight = base.and_hms_opt(0, 0, 0)?.and_utc();
    midnight.checked_add_signed(
        Duration::days(add_days) + Duration::minutes(i64::from(minutes)),
    )
}

/// Wall-clock `"HH:MM"` of a stored instant.
pub fn instant_to_time(instant: &DateTime<Utc>) -> String {
    format!("{:02}:{:02}", instant.hour(), instant.minute())
}

/// Absolute instants for an activity interval on `date`, normalized against
/// the day's bounds so night-shift mornings land on the following day.
pub fn activity_interval(
    date: NaiveDate,
    start: &str,
    end: &str,
    bounds: Option<&DayBounds>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (start, end) = normalized_interval(time_to_minutes(start)?, time_to_minutes(end)?, bounds);
    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some((
        midnight + Duration::minutes(i64::from(start)),
        midnight + Duration::minutes(i64::from(end)),
    ))
}

pub fn round_to_quarter_hour(hhmm: &str) -> Option<String> {
    let minutes = time_to_minutes(hhmm)?;
    let rounded = (minutes + 7) / 15 * 15;
    Some(minutes_to_time(rounded))
}

pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// Hours between `start` and `end`, minus the lunch overlap unless the
/// shift is continuous. The lunch overlap is measured after normalizing the
/// interval against the day's entry/exit. Never negative; rounded to 2dp.
pub fn compute_duration(
    start: &str,
    end: &str,
    is_continuous_shift: bool,
    entry: &str,
    exit: &str,
) -> Option<f64> {
    let start = time_to_minutes(start)?;
    let end = time_to_minutes(end)?;
    let (raw_start, raw_end) = normalized_interval(start, end, None);
    let lunch = if is_continuous_shift {
        0
    } else {
        let bounds = day_bounds(entry, exit);
        let (start, end) = normalized_interval(start, end, bounds.as_ref());
        lunch_overlap(start, end)
    };
    let minutes = (raw_end - raw_start - lunch).max(0);
    Some(round_hours(f64::from(minutes) / 60.0))
}

/// True when the interval starts before the day's entry or ends after its
/// exit. Missing or malformed input is never "outside".
pub fn is_outside_labor_window(start: &str, end: &str, entry: &str, exit: &str) -> bool {
    let (Some(start), Some(end), Some(bounds)) = (
        time_to_minutes(start),
        time_to_minutes(end),
        day_bounds(entry, exit),
    ) else {
        return false;
    };
    let (start, end) = normalized_interval(start, end, Some(&bounds));
    start < bounds.start || end > bounds.end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn time_to_minutes_parses_valid_values() {
        assert_eq!(time_to_minutes("00:00"), Some(0));
        assert_eq!(time_to_minutes("7:30"), Some(450));
        assert_eq!(time_to_minutes("23:59"), Some(1439));
        assert_eq!(time_to_minutes("24:00"), Some(1440));
    }

    #[test]
    fn time_to_minutes_rejects_malformed_values() {
        assert_eq!(time_to_minutes(""), None);
        assert_eq!(time_to_minutes("24:01"), None);
        assert_eq!(time_to_minutes("25:00"), None);
        assert_eq!(time_to_minutes("12:60"), None);
        assert_eq!(time_to_minutes("12:5"), None);
        assert_eq!(time_to_minutes("ab:cd"), None);
        assert_eq!(time_to_minutes("1200"), None);
    }

    #[test]
    fn minutes_to_time_wraps_into_one_day() {
        assert_eq!(minutes_to_time(450), "07:30");
        assert_eq!(minutes_to_time(1440), "00:00");
        assert_eq!(minutes_to_time(1500), "01:00");
    }

    #[test]
    fn day_bounds_detects_midnight_crossing() {
        let night = day_bounds("19:00", "07:00").unwrap();
        assert!(night.crosses_midnight);
        assert_eq!(night.start, 1140);
        assert_eq!(night.end, 420 + 1440);

        let same = day_bounds("08:00", "08:00").unwrap();
        assert!(same.crosses_midnight);
        assert_eq!(same.end, 480 + 1440);

        let day = day_bounds("07:00", "19:00").unwrap();
        assert!(!day.crosses_midnight);
        assert_eq!(day.end, 1140);
    }

    #[test]
    fn day_bounds_crossing_holds_for_every_exit_not_after_entry() {
        for entry in (0..1440).step_by(45) {
            for exit in (0..1440).step_by(50) {
                let bounds =
                    day_bounds(&minutes_to_time(entry), &minutes_to_time(exit)).unwrap();
                if exit <= entry {
                    assert!(bounds.crosses_midnight);
                    assert_eq!(bounds.end, exit + MINUTES_PER_DAY);
                } else {
                    assert!(!bounds.crosses_midnight);
                    assert_eq!(bounds.end, exit);
                }
            }
        }
    }

    #[test]
    fn day_bounds_returns_none_for_blank_input() {
        assert!(day_bounds("", "07:00").is_none());
        assert!(day_bounds("07:00", "").is_none());
    }

    #[test]
    fn normalize_to_span_only_moves_times_before_a_night_start() {
        assert_eq!(normalize_to_span(300, 1140, true), 1740);
        assert_eq!(normalize_to_span(1200, 1140, true), 1200);
        assert_eq!(normalize_to_span(300, 420, false), 300);
    }

    #[test]
    fn interval_overlap_clamps_to_zero() {
        assert_eq!(interval_overlap(0, 60, 30, 90), 30);
        assert_eq!(interval_overlap(0, 60, 60, 90), 0);
        assert_eq!(interval_overlap(100, 200, 0, 50), 0);
        assert_eq!(interval_overlap(0, 500, 100, 200), 100);
    }

    #[test]
    fn lunch_overlap_uses_noon_window() {
        assert_eq!(lunch_overlap(660, 840), 60);
        assert_eq!(lunch_overlap(750, 840), 30);
        assert_eq!(lunch_overlap(780, 840), 0);
    }

    #[test]
    fn build_instant_combines_date_and_time() {
        let base = date(2024, 3, 5);
        let instant = build_instant(base, "07:30", 0).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-03-05T07:30:00+00:00");

        let next = build_instant(base, "07:00", 1).unwrap();
        assert_eq!(next.to_rfc3339(), "2024-03-06T07:00:00+00:00");

        let end_of_day = build_instant(base, END_OF_DAY, 0).unwrap();
        assert_eq!(end_of_day.to_rfc3339(), "2024-03-06T00:00:00+00:00");

        assert!(build_instant(base, "nope", 0).is_none());
    }

    #[test]
    fn instant_to_time_reads_wall_clock() {
        let instant = build_instant(date(2024, 3, 5), "19:45", 1).unwrap();
        assert_eq!(instant_to_time(&instant), "19:45");
    }

    #[test]
    fn activity_interval_moves_night_mornings_to_next_day() {
        let bounds = day_bounds("19:00", "07:00").unwrap();
        let (start, end) =
            activity_interval(date(2024, 3, 5), "05:00", "06:30", Some(&bounds)).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-06T05:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-03-06T06:30:00+00:00");

        let (start, end) = activity_interval(date(2024, 3, 5), "23:00", "01:00", None).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-03-05T23:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-03-06T01:00:00+00:00");
    }

    #[test]
    fn round_to_quarter_hour_picks_nearest_quarter() {
        assert_eq!(round_to_quarter_hour("07:07").as_deref(), Some("07:00"));
        assert_eq!(round_to_quarter_hour("07:08").as_deref(), Some("07:15"));
        assert_eq!(round_to_quarter_hour("07:53").as_deref(), Some("08:00"));
        assert_eq!(round_to_quarter_hour("23:55").as_deref(), Some("00:00"));
        assert_eq!(round_to_quarter_hour("bad"), None);
    }

    #[test]
    fn compute_duration_subtracts_lunch_unless_continuous() {
        assert_eq!(compute_duration("11:00", "14:00", false, "07:00", "19:00"), Some(2.0));
        assert_eq!(compute_duration("11:00", "14:00", true, "07:00", "19:00"), Some(3.0));
        assert_eq!(compute_duration("12:00", "12:30", false, "07:00", "19:00"), Some(0.0));
        assert_eq!(compute_duration("19:30", "20:45", false, "07:00", "19:00"), Some(1.25));
    }

    #[test]
    fn compute_duration_continuous_matches_raw_span_and_lunch_is_exact() {
        let cases = [
            ("06:00", "13:30"),
            ("12:15", "12:45"),
            ("13:00", "18:00"),
            ("10:00", "12:00"),
        ];
        for (start, end) in cases {
            let continuous = compute_duration(start, end, true, "07:00", "19:00").unwrap();
            let with_lunch = compute_duration(start, end, false, "07:00", "19:00").unwrap();
            let (s, e) = (time_to_minutes(start).unwrap(), time_to_minutes(end).unwrap());
            let expected = round_hours(f64::from((e - s - lunch_overlap(s, e)).max(0)) / 60.0);
            assert_eq!(continuous, round_hours(f64::from(e - s) / 60.0));
            assert_eq!(with_lunch, expected);
        }
    }

    #[test]
    fn compute_duration_handles_midnight_and_end_of_day() {
        assert_eq!(compute_duration("23:00", "01:00", false, "07:00", "19:00"), Some(2.0));
        assert_eq!(compute_duration("22:00", END_OF_DAY, false, "07:00", "19:00"), Some(2.0));
        assert_eq!(compute_duration("08:00", "08:00", false, "", ""), Some(0.0));
        assert_eq!(compute_duration("", "08:00", false, "", ""), None);
    }

    #[test]
    fn is_outside_labor_window_checks_both_edges() {
        assert!(is_outside_labor_window("06:30", "08:00", "07:00", "19:00"));
        assert!(is_outside_labor_window("18:00", "19:30", "07:00", "19:00"));
        assert!(!is_outside_labor_window("08:00", "09:00", "07:00", "19:00"));
        assert!(!is_outside_labor_window("23:00", "02:00", "19:00", "07:00"));
        assert!(!is_outside_labor_window("", "02:00", "19:00", "07:00"));
    }

    #[test]
    fn now_in_timezone_returns_datetime_in_tz() {
        let tz = chrono_tz::UTC;
        let result = now_in_timezone(&tz);
        assert_eq!(result.timezone(), tz);
    }

    #[test]
    fn today_local_matches_utc_for_utc_zone() {
        let tz = chrono_tz::UTC;
        let before = Utc::now().date_naive();
        let today = today_local(&tz);
        let after = Utc::now().date_naive();
        assert!(today == before || today == after);
    }
}
