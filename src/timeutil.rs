//! Timezone conversions for the backend's naive-UTC timestamp convention.
//!
//! The vtiger REST bridge serializes datetimes as `YYYY-MM-DD HH:MM:SS` and
//! times as `HH:MM:SS` with no zone marker; by convention those values are
//! UTC. Every reinterpretation of that convention lives here, under explicit
//! "assumed UTC" names, so no call site has to do string surgery on
//! timestamps. Conversions are generic over the viewer's zone; the field
//! normalizer supplies `Local`, tests pin fixed zones to stay deterministic.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Wire format for naive-UTC datetimes.
pub const NAIVE_UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a naive backend timestamp, reinterpreting it as UTC.
///
/// Accepts the canonical space separator and the `T` separator some endpoints
/// emit. Returns `None` for anything unparseable; callers fall back to the
/// raw string rather than failing.
pub fn parse_assumed_utc(raw: &str) -> Option<DateTime<Utc>> {
    parse_naive(raw).map(|naive| naive.and_utc())
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, NAIVE_UTC_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .ok()
}

/// Serialize a UTC instant back into the backend's naive format.
pub fn format_naive_utc(instant: DateTime<Utc>) -> String {
    instant.format(NAIVE_UTC_FORMAT).to_string()
}

/// Long display form of an assumed-UTC timestamp in the given zone,
/// e.g. `March 15, 2024, 02:30 PM`.
pub fn display_datetime_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let instant = parse_assumed_utc(raw)?;
    Some(
        instant
            .with_timezone(tz)
            .format("%B %-d, %Y, %I:%M %p")
            .to_string(),
    )
}

/// Assumed-UTC timestamp rendered as wall-clock `YYYY-MM-DD HH:MM:SS` in the
/// given zone. This is the edit-form representation; [`datetime_to_utc_in`]
/// is its inverse.
pub fn datetime_from_utc_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let instant = parse_assumed_utc(raw)?;
    Some(instant.with_timezone(tz).format(NAIVE_UTC_FORMAT).to_string())
}

/// Wall-clock `YYYY-MM-DD HH:MM[:SS]` in the given zone, converted to the
/// backend's naive-UTC format.
///
/// A candidate falling into a DST gap has no wall-clock instant; that yields
/// `None` and the caller keeps the raw value.
pub fn datetime_to_utc_in<Tz: TimeZone>(candidate: &str, tz: &Tz) -> Option<String> {
    let naive = parse_naive(candidate)?;
    let instant = tz.from_local_datetime(&naive).earliest()?;
    Some(format_naive_utc(instant.with_timezone(&Utc)))
}

/// Backend `HH:MM:SS` (assumed UTC, anchored to today's date) shown as
/// `HH:MM` in the given zone, 24-hour clock.
pub fn time_from_utc_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let time = parse_hms(raw)?;
    let instant = Utc::now().date_naive().and_time(time).and_utc();
    Some(instant.with_timezone(tz).format("%H:%M").to_string())
}

/// Zone-local `HH:MM[:SS]` candidate (today's date) converted to a UTC
/// `HH:MM:SS` wire value.
pub fn time_to_utc_in<Tz: TimeZone>(candidate: &str, tz: &Tz) -> Option<String> {
    let time = parse_hms(candidate)?;
    let today = Utc::now().with_timezone(tz).date_naive();
    let instant = tz.from_local_datetime(&today.and_time(time)).earliest()?;
    Some(instant.with_timezone(&Utc).format("%H:%M:%S").to_string())
}

/// Date-only values carry no zone; parse and re-emit as `YYYY-MM-DD`.
pub fn date_only(raw: &str) -> Option<String> {
    parse_date(raw).map(|d| d.format("%Y-%m-%d").to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_assumed_utc(raw).map(|dt| dt.date_naive()))
}

fn parse_hms(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}
