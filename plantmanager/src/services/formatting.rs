//! Locale-aware date formatting for plant rows and the spotlight message

use crate::config::{MAX_UTC_OFFSET_MINUTES, MIN_UTC_OFFSET_MINUTES};
use crate::error::{AppError, Result};
use crate::locale::{Distance, Locale};
use chrono::{DateTime, FixedOffset, Local, Utc};

const MINUTES_PER_DAY: i64 = 1440;
const MINUTES_PER_MONTH: i64 = 43_200;

/// Formats instants in one locale and one UTC offset
#[derive(Debug, Clone, Copy)]
pub struct DateFormatter {
    locale: Locale,
    offset: FixedOffset,
}

impl DateFormatter {
    pub fn new(locale: Locale, offset: FixedOffset) -> Self {
        Self { locale, offset }
    }

    /// Formatter using the machine's current UTC offset
    pub fn local(locale: Locale) -> Self {
        Self::new(locale, *Local::now().offset())
    }

    /// Formatter with an explicit offset in minutes east of UTC
    pub fn with_offset_minutes(locale: Locale, minutes: i32) -> Result<Self> {
        if !(MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
            return Err(AppError::Generic(format!(
                "UTC offset must be between {} and {} minutes, got {}",
                MIN_UTC_OFFSET_MINUTES, MAX_UTC_OFFSET_MINUTES, minutes
            )));
        }

        let offset = FixedOffset::east_opt(minutes * 60)
            .ok_or_else(|| AppError::Generic(format!("Invalid UTC offset: {}", minutes)))?;
        Ok(Self::new(locale, offset))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Day and month, e.g. "20/04" in pt-BR
    pub fn day(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format(self.locale.strings().day_format)
            .to_string()
    }

    /// Hour and minute, e.g. "09:05" in pt-BR
    pub fn hour(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format(self.locale.strings().hour_format)
            .to_string()
    }

    /// Relative phrase between `now` and `target`, plus whether `target` is past
    fn relative(&self, target: DateTime<Utc>, now: DateTime<Utc>) -> (String, bool) {
        let distance = distance_between(target, now);
        (self.locale.describe(distance), target < now)
    }

    /// Spotlight message: water the `name` in a relative amount of time
    pub fn next_watering_message(
        &self,
        name: &str,
        target: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> String {
        let (distance, overdue) = self.relative(target, now);
        self.locale.next_watering_message(name, &distance, overdue)
    }
}

/// Bucket the absolute distance between two instants
pub fn distance_between(a: DateTime<Utc>, b: DateTime<Utc>) -> Distance {
    let seconds = (a - b).num_seconds().abs();
    let minutes = (seconds + 30) / 60;

    if minutes == 0 {
        Distance::LessThanAMinute
    } else if minutes < 45 {
        Distance::Minutes(minutes)
    } else if minutes < 90 {
        Distance::AboutHours(1)
    } else if minutes < MINUTES_PER_DAY {
        Distance::AboutHours(round_div(minutes, 60))
    } else if minutes < 2520 {
        Distance::Days(1)
    } else if minutes < MINUTES_PER_MONTH {
        Distance::Days(round_div(minutes, MINUTES_PER_DAY))
    } else if minutes < 2 * MINUTES_PER_MONTH {
        Distance::AboutMonths(round_div(minutes, MINUTES_PER_MONTH))
    } else {
        let months = minutes / MINUTES_PER_MONTH;
        if months < 12 {
            return Distance::Months(round_div(minutes, MINUTES_PER_MONTH));
        }

        let years = months / 12;
        match months % 12 {
            0..=2 => Distance::AboutYears(years),
            3..=8 => Distance::OverYears(years),
            _ => Distance::AlmostYears(years + 1),
        }
    }
}

fn round_div(value: i64, by: i64) -> i64 {
    (value + by / 2) / by
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc_formatter(locale: Locale) -> DateFormatter {
        DateFormatter::with_offset_minutes(locale, 0).unwrap()
    }

    #[test]
    fn test_day_and_hour_in_pt_br() {
        let formatter = utc_formatter(Locale::PtBr);
        let at = Utc.with_ymd_and_hms(2021, 4, 20, 9, 5, 0).unwrap();

        assert_eq!(formatter.day(at), "20/04");
        assert_eq!(formatter.hour(at), "09:05");
    }

    #[test]
    fn test_day_and_hour_in_en_us() {
        let formatter = utc_formatter(Locale::EnUs);
        let at = Utc.with_ymd_and_hms(2021, 4, 20, 15, 30, 0).unwrap();

        assert_eq!(formatter.day(at), "04/20");
        assert_eq!(formatter.hour(at), "03:30 PM");
    }

    #[test]
    fn test_offset_shifts_day_boundary() {
        let sao_paulo = DateFormatter::with_offset_minutes(Locale::PtBr, -180).unwrap();
        let at = Utc.with_ymd_and_hms(2021, 4, 20, 1, 0, 0).unwrap();

        assert_eq!(sao_paulo.day(at), "19/04");
        assert_eq!(sao_paulo.hour(at), "22:00");
    }

    #[test]
    fn test_offset_out_of_range_is_rejected() {
        assert!(DateFormatter::with_offset_minutes(Locale::PtBr, 15 * 60).is_err());
    }

    #[test]
    fn test_distance_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let cases = [
            (Duration::seconds(20), Distance::LessThanAMinute),
            (Duration::minutes(1), Distance::Minutes(1)),
            (Duration::minutes(30), Distance::Minutes(30)),
            (Duration::minutes(60), Distance::AboutHours(1)),
            (Duration::hours(5), Distance::AboutHours(5)),
            (Duration::hours(30), Distance::Days(1)),
            (Duration::days(10), Distance::Days(10)),
            (Duration::days(45), Distance::AboutMonths(2)),
            (Duration::days(150), Distance::Months(5)),
            (Duration::days(370), Distance::AboutYears(1)),
            (Duration::days(560), Distance::OverYears(1)),
            (Duration::days(700), Distance::AlmostYears(2)),
        ];

        for (offset, expected) in cases {
            assert_eq!(distance_between(now + offset, now), expected, "offset {:?}", offset);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            distance_between(now - Duration::hours(3), now),
            distance_between(now + Duration::hours(3), now)
        );
    }

    #[test]
    fn test_next_watering_message_future_and_overdue() {
        let formatter = utc_formatter(Locale::EnUs);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        let soon = formatter.next_watering_message("Fern", now + Duration::hours(1), now);
        assert_eq!(soon, "Don't forget to water the Fern in about 1 hour.");

        let late = formatter.next_watering_message("Fern", now - Duration::minutes(5), now);
        assert_eq!(late, "The Fern was due for watering 5 minutes ago.");
    }
}
