//! Configuration constants and date handling for the binder.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use regex::Regex;

use crate::xml::Namespace;

/// XCRI-CAP 1.2 catalog namespace.
pub const XCRI_NS: &str = "http://xcri.org/profiles/1.2/catalog";

/// Dublin Core element set.
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// Dublin Core terms.
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";

/// Metadata for Learning Opportunities (EN 15982).
pub const MLO_NS: &str = "http://purl.org/net/mlo";

/// Credit transfer vocabulary.
pub const CREDIT_NS: &str = "http://purl.org/net/cm";

/// XML Schema instance namespace, carrier of `xsi:type`.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// The reserved `xml` namespace, carrier of `xml:lang`.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

pub static XCRI: Namespace = Namespace::from_static(XCRI_NS);
pub static DC: Namespace = Namespace::from_static(DC_NS);
pub static DCTERMS: Namespace = Namespace::from_static(DCTERMS_NS);
pub static MLO: Namespace = Namespace::from_static(MLO_NS);
pub static CREDIT: Namespace = Namespace::from_static(CREDIT_NS);
pub static XSI: Namespace = Namespace::from_static(XSI_NS);
pub static XML: Namespace = Namespace::from_static(XML_NS);

/// Conventional prefix for a well-known namespace.
#[must_use]
pub fn conventional_prefix(uri: &str) -> Option<&'static str> {
    match uri {
        XCRI_NS => Some("xcri"),
        DC_NS => Some("dc"),
        DCTERMS_NS => Some("dcterms"),
        MLO_NS => Some("mlo"),
        CREDIT_NS => Some("credit"),
        XSI_NS => Some("xsi"),
        _ => None,
    }
}

/// Image file extensions that count as standard formats.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// A field producers should not use, with the advice to report.
#[derive(Debug)]
pub struct DiscouragedField {
    pub name: &'static str,
    pub namespace: &'static Namespace,
    pub advice: &'static str,
}

/// Legacy fields checked on every composite node.
pub static DISCOURAGED_FIELDS: &[DiscouragedField] = &[
    DiscouragedField {
        name: "date",
        namespace: &DC,
        advice: "Producers SHOULD NOT use the <date> element, but instead where possible \
                 use <start> and the temporal elements <end>, <applyFrom> and <applyUntil>",
    },
    DiscouragedField {
        name: "hasPart",
        namespace: &DC,
        advice: "included for compatibility with EN 15982; Producers SHOULD NOT use <hasPart>",
    },
    DiscouragedField {
        name: "isPartOf",
        namespace: &DC,
        advice: "included for compatibility with EN 15982; Producers SHOULD NOT use <isPartOf>",
    },
];

/// Date-time with a complete time of day (hours, minutes and seconds).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FULL_TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d{4,}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("valid regex")
});

const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];
const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an `xsd:date` or `xsd:dateTime` value.
///
/// Accepts optional fractional seconds, an optional zone (`Z` or `+HH:MM`),
/// a time of day without seconds, and a bare date. Values without a zone are
/// taken as UTC; a bare date means midnight.
///
/// # Examples
/// ```
/// use xcri_binder::config::parse_xsd_datetime;
///
/// assert!(parse_xsd_datetime("2011-05-01T10:30:00Z").is_some());
/// assert!(parse_xsd_datetime("2011-05-01T10:30:00.250+01:00").is_some());
/// assert!(parse_xsd_datetime("2011-05-01").is_some());
/// assert!(parse_xsd_datetime("yesterday").is_none());
/// assert!(parse_xsd_datetime("2011-13-01").is_none());
/// ```
#[must_use]
pub fn parse_xsd_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    let normalized = match value.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => value.to_string(),
    };

    for format in ZONED_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, format) {
            return Some(parsed);
        }
    }
    for format in LOCAL_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(parsed.and_utc().fixed_offset());
        }
    }
    parse_xsd_date(&normalized)
}

fn parse_xsd_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let (date, zone) = value.split_at_checked(10)?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let offset = if zone.is_empty() {
        FixedOffset::east_opt(0)?
    } else {
        parse_offset(zone)?
    };
    date.and_hms_opt(0, 0, 0)?
        .and_local_timezone(offset)
        .single()
}

fn parse_offset(zone: &str) -> Option<FixedOffset> {
    let (sign, rest) = match zone.split_at_checked(1)? {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Whether a date-time value carries a complete time of day.
#[must_use]
pub fn has_time_of_day(value: &str) -> bool {
    FULL_TIME_PATTERN.is_match(value.trim())
}

/// Format a timestamp for output, keeping sub-second precision.
#[must_use]
pub fn format_xsd_datetime(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_conventional_prefix() {
        assert_eq!(conventional_prefix(DC_NS), Some("dc"));
        assert_eq!(conventional_prefix("urn:unknown"), None);
    }

    #[test]
    fn test_parse_full_datetime_with_zone() {
        let parsed = parse_xsd_datetime("2011-05-01T10:30:15+02:00").unwrap();
        assert_eq!(parsed.hour(), 10);
        assert_eq!(parsed.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_parse_local_datetime_is_utc() {
        let parsed = parse_xsd_datetime("2011-05-01T10:30:15").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
        assert_eq!(parsed.second(), 15);
    }

    #[test]
    fn test_parse_without_seconds() {
        let parsed = parse_xsd_datetime("2011-05-01T10:30").unwrap();
        assert_eq!(parsed.minute(), 30);
        assert_eq!(parsed.second(), 0);
    }

    #[test]
    fn test_parse_date_only() {
        let parsed = parse_xsd_datetime("2011-05-01").unwrap();
        assert_eq!(parsed.day(), 1);
        assert_eq!(parsed.hour(), 0);

        let zoned = parse_xsd_datetime("2011-05-01-05:00").unwrap();
        assert_eq!(zoned.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_xsd_datetime("").is_none());
        assert!(parse_xsd_datetime("not a date").is_none());
        assert!(parse_xsd_datetime("2011-02-30").is_none());
        assert!(parse_xsd_datetime("2011-05-01T25:00:00").is_none());
    }

    #[test]
    fn test_has_time_of_day() {
        assert!(has_time_of_day("2011-05-01T10:30:15"));
        assert!(has_time_of_day("2011-05-01T10:30:15Z"));
        assert!(!has_time_of_day("2011-05-01"));
        assert!(!has_time_of_day("2011-05-01T10:30"));
    }

    #[test]
    fn test_format_round_trips() {
        let parsed = parse_xsd_datetime("2011-05-01T10:30:15.125Z").unwrap();
        let formatted = format_xsd_datetime(&parsed);
        assert_eq!(formatted, "2011-05-01T10:30:15.125Z");
        assert_eq!(parse_xsd_datetime(&formatted), Some(parsed));
    }
}
