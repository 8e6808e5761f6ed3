//! Claimed coupons from the `my-coupons` reply.

use regex::Regex;
use serde::{Deserialize, Serialize};

use std::sync::LazyLock;

use super::{
    scan::{image_src, scan_lines, LineRule},
    validity::format_validity,
};

/// Heading of the whole list, not a coupon
const LIST_HEADER: &str = "优惠券列表";

/// A field line must carry the label with an ASCII colon
const PRICE_LABEL: &str = "**优惠**:";
const VALIDITY_LABEL: &str = "**有效期**:";
const TAGS_LABEL: &str = "**标签**:";

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*优惠\*\*[：:]\s*([^(]+)").unwrap());
static VALIDITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*有效期\*\*[：:]\s*(.+)").unwrap());
static TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*标签\*\*[：:]\s*(.+)").unwrap());

/// 已领取的优惠券
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedCoupon {
    pub title: String,
    pub price: String,
    /// Display form, see [`format_validity`]
    pub validity: String,
    pub tags: Vec<String>,
    pub image: String,
}

struct ClaimedRule;

impl LineRule for ClaimedRule {
    type Record = ClaimedCoupon;

    fn opens(&self, line: &str) -> Option<ClaimedCoupon> {
        let title = line.strip_prefix("## ")?;
        if line.contains(LIST_HEADER) {
            return None;
        }
        Some(ClaimedCoupon {
            title: title.trim().to_owned(),
            ..Default::default()
        })
    }

    fn apply(&self, coupon: &mut ClaimedCoupon, line: &str) {
        if line.contains(PRICE_LABEL) {
            if let Some(price) = capture(&PRICE_RE, line) {
                coupon.price = price.trim().to_owned();
            }
        } else if line.contains(VALIDITY_LABEL) {
            if let Some(validity) = capture(&VALIDITY_RE, line) {
                coupon.validity = format_validity(validity.trim());
            }
        } else if line.contains(TAGS_LABEL) {
            if let Some(tags) = capture(&TAGS_RE, line) {
                coupon.tags = tags.split('、').map(|t| t.trim().to_owned()).collect();
            }
        } else if let Some(src) = image_src(line) {
            coupon.image = src.to_owned();
        }
    }
}

fn capture<'l>(re: &Regex, line: &'l str) -> Option<&'l str> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse claimed coupons out of the reply text, never fails.
pub fn parse_mine(content: &str) -> Vec<ClaimedCoupon> {
    scan_lines(&ClaimedRule, content)
}
