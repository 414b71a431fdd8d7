use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;

/// Parses a Brazilian `DD/MM/YYYY` date string.
///
/// Anything that does not match that exact shape (empty cell, wrong
/// separator, impossible day/month) falls back to today's date. Statement
/// exports occasionally carry blank date cells and one bad cell must not
/// abort the whole file, so callers cannot use this for validation.
pub fn parse_br_date(text: &str) -> NaiveDate {
    let text = text.trim();
    let parts: Vec<&str> = text.split('/').collect();
    if parts.len() != 3
        || parts[0].len() != 2
        || parts[1].len() != 2
        || parts[2].len() != 4
        || parts.iter().any(|p| !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return today();
    }

    let day: u32 = parts[0].parse().unwrap_or(0);
    let month: u32 = parts[1].parse().unwrap_or(0);
    let year: i32 = parts[2].parse().unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(today)
}

/// Midnight UTC for a calendar day; CSV dialects carry no time of day.
pub fn day_start_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Parses an OFX timestamp of the form `YYYYMMDD[HHMMSS][.sss][[±H:TZ]]`.
///
/// The leading digit run carries the date and, when long enough, the time
/// of day (missing components default to zero). A bracketed signed hour
/// offset like `[-3:BRT]` is subtracted from the digits to yield the
/// absolute UTC instant; a malformed or absent offset means UTC. A digit
/// run too short to hold a date falls back to the current instant.
pub fn parse_ofx_datetime(text: &str) -> DateTime<Utc> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.len() < 8 {
        return Utc::now();
    }

    let field = |range: std::ops::Range<usize>| -> u32 {
        digits
            .get(range)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    };

    let year: i32 = digits.get(0..4).and_then(|s| s.parse().ok()).unwrap_or(0);
    let month = field(4..6);
    let day = field(6..8);
    let hour = field(8..10);
    let minute = field(10..12);
    let second = field(12..14);

    let offset_hours = extract_offset_hours(text);

    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second));
    match naive {
        Some(naive) => Utc.from_utc_datetime(&naive) - Duration::hours(offset_hours),
        None => Utc::now(),
    }
}

fn extract_offset_hours(text: &str) -> i64 {
    if let Ok(re) = Regex::new(r"\[([+-]?\d+):") {
        if let Some(caps) = re.captures(text) {
            return caps[1].parse().unwrap_or(0);
        }
    }
    0
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
