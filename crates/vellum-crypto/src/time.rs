#![forbid(unsafe_code)]

//! Conversions from ASN.1 and XML Schema time values to `chrono` UTC times.

use chrono::{DateTime, NaiveDateTime, Utc};
use vellum_core::Error;

/// Convert a DER date-time (UTCTime or GeneralizedTime without fractions).
pub fn to_utc(dt: der::DateTime) -> Result<DateTime<Utc>, Error> {
    let secs = i64::try_from(dt.unix_duration().as_secs())
        .map_err(|_| Error::DateTime(format!("{dt} out of range")))?;
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| Error::DateTime(format!("{dt} out of range")))
}

/// Parse the content octets of a GeneralizedTime in UTC.
///
/// `der` refuses fractional seconds, which RFC 3161 time-stamp authorities
/// use freely, so the value is parsed by hand: `YYYYMMDDHHMMSS[.f*]Z`.
pub fn parse_generalized_time(value: &[u8]) -> Result<DateTime<Utc>, Error> {
    let text = std::str::from_utf8(value)
        .map_err(|_| Error::DateTime("GeneralizedTime is not ASCII".into()))?;
    let body = text
        .strip_suffix('Z')
        .ok_or_else(|| Error::DateTime(format!("GeneralizedTime not in UTC: {text}")))?;
    let naive = if body.contains('.') {
        NaiveDateTime::parse_from_str(body, "%Y%m%d%H%M%S%.f")
    } else {
        NaiveDateTime::parse_from_str(body, "%Y%m%d%H%M%S")
    }
    .map_err(|e| Error::DateTime(format!("GeneralizedTime {text}: {e}")))?;
    Ok(naive.and_utc())
}

/// Parse an `xsd:dateTime` value.
///
/// A value with a zone designator is converted to UTC; a value without one
/// is taken to be UTC already.
pub fn parse_xml_datetime(text: &str) -> Result<DateTime<Utc>, Error> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| Error::DateTime(format!("xsd:dateTime {text}: {e}")))
}
