//! Validity window display formatting.

use regex::Regex;
use time::{macros::format_description, Date};

use std::sync::LazyLock;

/// `2026-01-19 10:45-2026-01-23 23:59`
static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([0-9]{4}-[0-9]{2}-[0-9]{2})\s+([0-9]{2}:[0-9]{2})-([0-9]{4}-[0-9]{2}-[0-9]{2})\s+([0-9]{2}:[0-9]{2})",
    )
    .unwrap()
});
/// `周一、二、三`
static WEEKDAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(周[一二三四五六日、]+)").unwrap());
/// `10:45-23:59`
static TIME_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{2}:[0-9]{2}-[0-9]{2}:[0-9]{2})").unwrap());

/// Format a raw validity string for display, e.g.
/// `2026-01-19 10:45-2026-01-23 23:59 周一、二、三、四、五 10:45-23:59` into
/// `1月19日-23日 10:45-23:59（周一至周五）`.
///
/// Returns the input unchanged without a date range, or when either date is
/// not a real calendar date.
pub fn format_validity(raw: &str) -> String {
    let Some((start, end)) = date_range(raw) else {
        return raw.to_owned();
    };

    let mut formatted = if start.year() == end.year() && start.month() == end.month() {
        format!("{}-{}日", month_day(start), end.day())
    } else {
        format!("{} - {}", month_day(start), month_day(end))
    };

    // The time range after the weekdays is the accurate one, the times in the
    // date range are dropped.
    if let Some(m) = TIME_RANGE_RE.find(raw) {
        formatted.push(' ');
        formatted.push_str(m.as_str());
    }

    if let Some(m) = WEEKDAYS_RE.find(raw) {
        let days = m.as_str().replace('周', "");
        let days: Vec<&str> = days.split('、').filter(|d| !d.is_empty()).collect();
        match days.as_slice() {
            [] => {}
            [day] => formatted.push_str(&format!("（周{day}）")),
            [first, .., last] => formatted.push_str(&format!("（周{first}至周{last}）")),
        }
    }

    formatted
}

fn date_range(raw: &str) -> Option<(Date, Date)> {
    let caps = DATE_RANGE_RE.captures(raw)?;
    let format = format_description!("[year]-[month]-[day]");
    let start = Date::parse(caps.get(1)?.as_str(), &format).ok()?;
    let end = Date::parse(caps.get(3)?.as_str(), &format).ok()?;
    Some((start, end))
}

/// `1月19日`
fn month_day(date: Date) -> String {
    format!("{}月{}日", u8::from(date.month()), date.day())
}
