//! Line scanner shared by the coupon parsers.
//!
//! Lines are read in order with at most one open record: a line that opens a
//! record closes the previous one, other lines fill the open record, and lines
//! seen before the first record are dropped.

use regex::Regex;

use std::sync::LazyLock;

static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src="([^"]+)""#).unwrap());

/// Markers and field extractors of one record kind.
pub trait LineRule {
    type Record;

    /// A fresh record if `line` starts one.
    fn opens(&self, line: &str) -> Option<Self::Record>;

    /// Fill `record` from a non-opening `line`, ignoring what it does not know.
    fn apply(&self, record: &mut Self::Record, line: &str);
}

/// Scan `text` line by line, never fails.
pub fn scan_lines<R: LineRule>(rule: &R, text: &str) -> Vec<R::Record> {
    let mut records = Vec::new();
    let mut current: Option<R::Record> = None;

    for line in text.split('\n') {
        if let Some(record) = rule.opens(line) {
            records.extend(current.replace(record));
        } else if let Some(record) = current.as_mut() {
            rule.apply(record, line);
        }
    }
    records.extend(current);

    records
}

/// `src` of an `<img>` fragment in `line`.
pub fn image_src(line: &str) -> Option<&str> {
    if !line.contains("<img") {
        return None;
    }
    IMG_SRC_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
