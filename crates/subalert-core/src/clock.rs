//! Local calendar helpers: day keys and whole-day countdowns.
//!
//! All reminder suppression is keyed on the local calendar date, so every
//! flag rolls over at local midnight. "Now" is always supplied by a
//! [`Clock`] so tests can pin it.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Milliseconds in one day.
pub const DAY_MS: i64 = 86_400_000;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Source of the current instant in the local calendar.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self(now)
    }

    /// Parse an RFC 3339 instant, e.g. `2026-03-01T09:30:00+08:00`.
    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw.trim()).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Calendar date of `now` as `YYYY-MM-DD`, in `now`'s own offset.
pub fn local_day_key(now: &DateTime<FixedOffset>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Parse an expiry timestamp.
///
/// Accepts RFC 3339, naive date-times (read in `local` offset) and bare
/// dates (UTC midnight). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str, local: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return local.from_local_datetime(&naive).single();
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).fixed_offset())
}

/// Whole days until `expires_at`, rounded up.
///
/// `None` when the timestamp is unparseable or the rounded count is
/// negative. Any future instant rounds up to at least 1, so zero is only
/// reached by an expiry that is exactly now or lapsed less than a day ago.
pub fn days_remaining(expires_at: &str, now: &DateTime<FixedOffset>) -> Option<i64> {
    let expiry = parse_timestamp(expires_at, *now.offset())?;
    let diff_ms = expiry.signed_duration_since(*now).num_milliseconds();
    // ceil(a / b) == -floor(-a / b)
    let days = -(-diff_ms).div_euclid(DAY_MS);
    (days >= 0).then_some(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    #[test]
    fn day_key_is_zero_padded() {
        assert_eq!(local_day_key(&at("2026-03-04T08:00:00+00:00")), "2026-03-04");
    }

    #[test]
    fn day_key_uses_local_offset() {
        // 23:30 UTC on the 1st is already the 2nd in UTC+8
        let now = at("2026-01-01T23:30:00+00:00").with_timezone(&FixedOffset::east_opt(8 * 3600).unwrap());
        assert_eq!(local_day_key(&now), "2026-01-02");
    }

    #[test]
    fn exact_multiple_of_a_day() {
        let now = at("2026-05-10T12:00:00+00:00");
        let expiry = (now + Duration::days(3)).to_rfc3339();
        assert_eq!(days_remaining(&expiry, &now), Some(3));
    }

    #[test]
    fn partial_days_round_up() {
        let now = at("2026-05-10T12:00:00+00:00");
        let just_over_two = (now + Duration::days(2) + Duration::milliseconds(1)).to_rfc3339();
        assert_eq!(days_remaining(&just_over_two, &now), Some(3));

        let in_an_hour = (now + Duration::hours(1)).to_rfc3339();
        assert_eq!(days_remaining(&in_an_hour, &now), Some(1));
    }

    #[test]
    fn exactly_now_is_zero() {
        let now = at("2026-05-10T12:00:00+00:00");
        assert_eq!(days_remaining(&now.to_rfc3339(), &now), Some(0));
    }

    #[test]
    fn recently_lapsed_counts_as_today() {
        let now = at("2026-05-10T12:00:00+00:00");
        let lapsed = (now - Duration::hours(12)).to_rfc3339();
        assert_eq!(days_remaining(&lapsed, &now), Some(0));
    }

    #[test]
    fn long_expired_is_none() {
        let now = at("2026-05-10T12:00:00+00:00");
        let expired = (now - Duration::hours(25)).to_rfc3339();
        assert_eq!(days_remaining(&expired, &now), None);
    }

    #[test]
    fn garbage_is_none() {
        let now = at("2026-05-10T12:00:00+00:00");
        assert_eq!(days_remaining("next tuesday", &now), None);
        assert_eq!(days_remaining("", &now), None);
    }

    #[test]
    fn naive_timestamps_use_local_offset() {
        let now = at("2026-05-10T12:00:00+02:00");
        assert_eq!(days_remaining("2026-05-11T12:00:00", &now), Some(1));
        assert_eq!(days_remaining("2026-05-11 12:00:00.250", &now), Some(2));
    }

    #[test]
    fn bare_date_is_utc_midnight() {
        let parsed = parse_timestamp("2026-05-13", FixedOffset::east_opt(0).unwrap()).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-05-13T00:00:00+00:00");
    }

    #[test]
    fn fixed_clock_parses_rfc3339() {
        let clock = FixedClock::parse("2026-02-28T23:59:59-05:00").unwrap();
        assert_eq!(local_day_key(&clock.now()), "2026-02-28");
        assert!(FixedClock::parse("yesterday").is_err());
    }
}
