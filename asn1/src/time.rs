//! UTCTime and GeneralizedTime in the profile RFC 5280 uses: UTC with
//! seconds and a trailing `Z`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::Error;

fn digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn build(year: i32, rest: &str, nanos: u32) -> Option<NaiveDateTime> {
    // rest = MMDDHHMM[SS]
    let field = |range: std::ops::Range<usize>| rest.get(range).and_then(digits);
    let (month, day, hour, minute) = (field(0..2)?, field(2..4)?, field(4..6)?, field(6..8)?);
    let second = match rest.len() {
        8 => 0,
        10 => field(8..10)?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(hour, minute, second, nanos)
}

pub(crate) fn parse_utc_time(data: &[u8]) -> Result<NaiveDateTime, Error> {
    let s = std::str::from_utf8(data).map_err(|_| Error::UtcTimeInvalidFormat)?;
    let body = s.strip_suffix('Z').ok_or(Error::UtcTimeInvalidFormat)?;
    let yy = body
        .get(0..2)
        .and_then(digits)
        .ok_or(Error::UtcTimeInvalidFormat)? as i32;
    // RFC 5280 4.1.2.5.1: YY >= 50 is 19YY, otherwise 20YY
    let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
    body.get(2..)
        .and_then(|rest| build(year, rest, 0))
        .ok_or(Error::UtcTimeInvalidFormat)
}

pub(crate) fn parse_generalized_time(data: &[u8]) -> Result<NaiveDateTime, Error> {
    let s = std::str::from_utf8(data).map_err(|_| Error::GeneralizedTimeInvalidFormat)?;
    let body = s
        .strip_suffix('Z')
        .ok_or(Error::GeneralizedTimeInvalidFormat)?;
    let (main, nanos) = match body.split_once('.') {
        Some((main, fraction)) => {
            if fraction.len() > 9 || digits(fraction).is_none() {
                return Err(Error::GeneralizedTimeInvalidFormat);
            }
            let scale = 10u32.pow(9 - fraction.len() as u32);
            (main, digits(fraction).unwrap_or(0) * scale)
        }
        None => (body, 0),
    };
    let year = main
        .get(0..4)
        .and_then(digits)
        .ok_or(Error::GeneralizedTimeInvalidFormat)? as i32;
    main.get(4..)
        .and_then(|rest| build(year, rest, nanos))
        .ok_or(Error::GeneralizedTimeInvalidFormat)
}

pub(crate) fn format_utc_time(time: &NaiveDateTime) -> String {
    format!(
        "{:02}{:02}{:02}{:02}{:02}{:02}Z",
        time.year().rem_euclid(100),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    )
}

pub(crate) fn format_generalized_time(time: &NaiveDateTime) -> String {
    let mut s = format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        time.year(),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    );
    let nanos = time.nanosecond();
    if nanos > 0 {
        // DER: no trailing zeros in the fraction
        let fraction = format!("{:09}", nanos);
        s.push('.');
        s.push_str(fraction.trim_end_matches('0'));
    }
    s.push('Z');
    s
}
