//! Date helper functions

use chrono::{DateTime, Locale, TimeZone, Utc};
use chrono_tz::Tz;

/// Resolve a locale name such as `pt_BR` or `pt-BR`
///
/// Unknown names fall back to POSIX (English month names).
pub fn parse_locale(name: &str) -> Locale {
    let normalized = name.replace('-', "_");
    Locale::try_from(normalized.as_str()).unwrap_or_else(|_| {
        tracing::warn!("Unknown language {:?}, using POSIX", name);
        Locale::POSIX
    })
}

/// Resolve an IANA timezone name; unknown or empty names fall back to UTC
pub fn parse_timezone(name: &str) -> Tz {
    if name.is_empty() {
        return Tz::UTC;
    }
    name.parse::<Tz>().unwrap_or_else(|_| {
        tracing::warn!("Unknown timezone {:?}, using UTC", name);
        Tz::UTC
    })
}

/// Format a date with a strftime pattern in the given locale and timezone
///
/// # Examples
/// ```ignore
/// format_date(&date, "%-d %b %Y", Locale::pt_BR, Tz::America__Sao_Paulo) // -> "25 mar 2021"
/// ```
pub fn format_date(date: &DateTime<Utc>, format: &str, locale: Locale, tz: Tz) -> String {
    date.with_timezone(&tz)
        .format_localized(format, locale)
        .to_string()
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz2: TimeZone>(date: &DateTime<Tz2>) -> String
where
    Tz2::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}
