use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

use crate::error::FingerLogError;

pub const DEFAULT_ZONE: &str = "Asia/Jakarta";

/// WIB, UTC+7.
const FALLBACK_OFFSET_SECS: i32 = 7 * 60 * 60;

const MILLIS_WITH_OFFSET: &str = "%Y-%m-%d %H:%M:%S.%3f %z";
const MILLIS: &str = "%Y-%m-%d %H:%M:%S.%3f";
const SECONDS: &str = "%Y-%m-%d %H:%M:%S";
const DATE: &str = "%Y-%m-%d";

/// Zone used for calendar dates and for timestamps that carry no offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Named(Tz),
    Fixed(FixedOffset),
}

/// Looks up `name` in the zone database, falling back to a fixed UTC+7
/// offset when the name is unknown. The fallback is always WIB, whatever
/// zone was configured.
pub fn resolve_zone(name: &str) -> Zone {
    match name.parse::<Tz>() {
        Ok(tz) => Zone::Named(tz),
        Err(e) => {
            let offset = fallback_offset();
            tracing::warn!(
                zone = name,
                substituted = %offset,
                error = %e,
                "zone lookup failed, using fixed WIB offset"
            );
            Zone::Fixed(offset)
        }
    }
}

fn fallback_offset() -> FixedOffset {
    FixedOffset::east_opt(FALLBACK_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

impl Zone {
    /// Pins a wall-clock time to this zone. Ambiguous times take the
    /// earlier instant; times inside a gap yield `None`.
    pub fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Zone::Named(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&dt.offset().fix())),
            Zone::Fixed(offset) => offset.from_local_datetime(&naive).earliest(),
        }
    }

    /// Half-open `[start, end)` UTC range covering `date` in this zone.
    pub fn day_bounds(&self, date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.localize(date.and_hms_opt(0, 0, 0)?)?;
        let end = self.localize(date.succ_opt()?.and_hms_opt(0, 0, 0)?)?;
        Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
    }
}

/// Candidate layouts, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr)]
pub enum TimestampFormat {
    /// `2025-11-27 17:18:23.838 +0700`
    MillisWithOffset,
    /// `2025-11-27 17:18:23.838`
    MillisLocal,
    /// `2025-11-27 17:18:23`
    SecondsLocal,
    /// `2025-11-27T10:18:23Z`
    Rfc3339,
}

impl TimestampFormat {
    fn parse(self, raw: &str, zone: &Zone) -> Option<DateTime<FixedOffset>> {
        match self {
            TimestampFormat::MillisWithOffset => {
                DateTime::parse_from_str(raw, MILLIS_WITH_OFFSET).ok()
            }
            TimestampFormat::MillisLocal => NaiveDateTime::parse_from_str(raw, MILLIS)
                .ok()
                .and_then(|naive| zone.localize(naive)),
            TimestampFormat::SecondsLocal => NaiveDateTime::parse_from_str(raw, SECONDS)
                .ok()
                .and_then(|naive| zone.localize(naive)),
            TimestampFormat::Rfc3339 => DateTime::parse_from_rfc3339(raw).ok(),
        }
    }
}

/// Parses `raw` with the first matching [`TimestampFormat`].
pub fn parse_timestamp(
    raw: &str,
    zone: &Zone,
) -> Result<(DateTime<FixedOffset>, TimestampFormat), FingerLogError> {
    let trimmed = raw.trim();
    TimestampFormat::iter()
        .find_map(|format| format.parse(trimmed, zone).map(|dt| (dt, format)))
        .ok_or_else(|| FingerLogError::UnrecognizedTimestampFormat(raw.to_string()))
}

/// Strict `YYYY-MM-DD HH:mm:ss` in `zone`, used for manual entries.
pub fn parse_manual_timestamp(raw: &str, zone: &Zone) -> Result<DateTime<FixedOffset>, FingerLogError> {
    NaiveDateTime::parse_from_str(raw.trim(), SECONDS)
        .ok()
        .and_then(|naive| zone.localize(naive))
        .ok_or_else(|| FingerLogError::UnrecognizedTimestampFormat(raw.to_string()))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, FingerLogError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FingerLogError::validation("Parameter 'date' is required"));
    }
    // %Y alone also takes signed years of any width
    if raw.len() != 10 {
        return Err(FingerLogError::validation("Invalid date. Use format: YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(raw, DATE)
        .map_err(|_| FingerLogError::validation("Invalid date. Use format: YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jakarta() -> Zone {
        resolve_zone(DEFAULT_ZONE)
    }

    fn utc(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn resolves_named_zone() {
        assert_eq!(jakarta(), Zone::Named(chrono_tz::Asia::Jakarta));
    }

    #[test]
    fn unknown_zone_falls_back_to_fixed_plus_seven() {
        let zone = resolve_zone("Mars/Olympus_Mons");
        assert_eq!(zone, Zone::Fixed(FixedOffset::east_opt(7 * 3600).unwrap()));

        let parsed = parse_manual_timestamp("2025-11-27 08:00:00", &zone).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), utc("2025-11-27T01:00:00Z"));
    }

    #[test]
    fn misspelled_foreign_zone_still_falls_back_to_wib() {
        let zone = resolve_zone("Europe/Berln");
        assert_eq!(zone, Zone::Fixed(FixedOffset::east_opt(7 * 3600).unwrap()));
    }

    #[test]
    fn millis_with_offset_matches_first_format() {
        let (dt, format) = parse_timestamp("2025-11-27 17:18:23.838 +0700", &jakarta()).unwrap();
        assert_eq!(format, TimestampFormat::MillisWithOffset);
        assert_eq!(dt.with_timezone(&Utc), utc("2025-11-27T10:18:23.838Z"));
    }

    #[test]
    fn millis_without_offset_uses_zone() {
        let (dt, format) = parse_timestamp("2025-11-27 17:18:23.838", &jakarta()).unwrap();
        assert_eq!(format, TimestampFormat::MillisLocal);
        assert_eq!(dt.with_timezone(&Utc), utc("2025-11-27T10:18:23.838Z"));
    }

    #[test]
    fn seconds_without_offset_uses_zone() {
        let (dt, format) = parse_timestamp("2025-11-27 17:18:23", &jakarta()).unwrap();
        assert_eq!(format, TimestampFormat::SecondsLocal);
        assert_eq!(dt.with_timezone(&Utc), utc("2025-11-27T10:18:23Z"));
    }

    #[test]
    fn rfc3339_is_last_resort() {
        let (dt, format) = parse_timestamp("2025-11-27T10:18:23Z", &jakarta()).unwrap();
        assert_eq!(format, TimestampFormat::Rfc3339);
        assert_eq!(dt.with_timezone(&Utc), utc("2025-11-27T10:18:23Z"));
    }

    #[test]
    fn garbage_is_unrecognized() {
        match parse_timestamp("not-a-date", &jakarta()) {
            Err(FingerLogError::UnrecognizedTimestampFormat(raw)) => assert_eq!(raw, "not-a-date"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn manual_parser_is_strict() {
        let zone = jakarta();
        let parsed = parse_manual_timestamp("2025-11-27 08:00:00", &zone).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), utc("2025-11-27T01:00:00Z"));
        assert_eq!(parsed.offset().local_minus_utc(), 7 * 3600);

        assert!(parse_manual_timestamp("2025-11-27 08:00:00.000", &zone).is_err());
        assert!(parse_manual_timestamp("2025-11-27T08:00:00+07:00", &zone).is_err());
    }

    #[test]
    fn day_bounds_follow_zone_midnight() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 27).unwrap();
        let (start, end) = jakarta().day_bounds(date).unwrap();
        assert_eq!(start, utc("2025-11-26T17:00:00Z"));
        assert_eq!(end, utc("2025-11-27T17:00:00Z"));
    }

    #[test]
    fn date_must_be_present_and_well_formed() {
        assert_eq!(parse_date("2025-12-14").unwrap(), NaiveDate::from_ymd_opt(2025, 12, 14).unwrap());
        assert!(matches!(parse_date(""), Err(FingerLogError::Validation(_))));
        assert!(matches!(parse_date("+262142-12-31"), Err(FingerLogError::Validation(_))));
        assert!(matches!(parse_date("12025-12-14"), Err(FingerLogError::Validation(_))));
        assert!(matches!(parse_date("14/12/2025"), Err(FingerLogError::Validation(_))));
    }
}
