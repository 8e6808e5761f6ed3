//! Claimable coupons from the `available-coupons` reply.

use serde::{Deserialize, Serialize};

use super::scan::{image_src, scan_lines, LineRule};

const TITLE_MARKER: &str = "优惠券标题：";
const STATUS_MARKER: &str = "状态：";

/// 优惠券领取状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CouponStatus {
    /// 未领取
    Unclaimed,
    /// 已被领完, the upstream `已领取` included
    SoldOut,
    /// Anything else, kept as is
    Other(String),
}

impl CouponStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unclaimed => "未领取",
            Self::SoldOut => "已被领完",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for CouponStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "未领取" => Self::Unclaimed,
            "已领取" | "已被领完" => Self::SoldOut,
            _ => Self::Other(s),
        }
    }
}

impl From<CouponStatus> for String {
    fn from(status: CouponStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl std::fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 可领取的优惠券
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableCoupon {
    pub title: String,
    pub status: CouponStatus,
    /// Empty if no image given
    pub image: String,
}

struct AvailableRule;

impl LineRule for AvailableRule {
    type Record = AvailableCoupon;

    fn opens(&self, line: &str) -> Option<AvailableCoupon> {
        if !line.contains(TITLE_MARKER) {
            return None;
        }
        let title = line.replacen(TITLE_MARKER, "", 1);
        let title = title.trim();
        let title = title
            .strip_prefix('-')
            .map(str::trim_start)
            .unwrap_or(title)
            .replace('\\', "");

        Some(AvailableCoupon {
            title: title.trim().to_owned(),
            status: CouponStatus::Other(String::new()),
            image: String::new(),
        })
    }

    fn apply(&self, coupon: &mut AvailableCoupon, line: &str) {
        if line.contains(STATUS_MARKER) {
            let status = line.replacen(STATUS_MARKER, "", 1).trim().replace('\\', "");
            coupon.status = CouponStatus::from(status.trim().to_owned());
        } else if let Some(src) = image_src(line) {
            coupon.image = src.to_owned();
        }
    }
}

/// Parse coupons out of the reply text, never fails.
pub fn parse_available(content: &str) -> Vec<AvailableCoupon> {
    scan_lines(&AvailableRule, content)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_available() {
        let content = "- 优惠券标题：满30减5\n状态：未领取\n<img src=\"http://x/a.png\">\n- 优惠券标题：满50减10\n状态：已领取";
        let coupons = parse_available(content);
        assert_eq!(
            coupons,
            vec![
                AvailableCoupon {
                    title: "满30减5".to_owned(),
                    status: CouponStatus::Unclaimed,
                    image: "http://x/a.png".to_owned(),
                },
                AvailableCoupon {
                    title: "满50减10".to_owned(),
                    status: CouponStatus::SoldOut,
                    image: String::new(),
                },
            ]
        );
        assert_eq!(coupons[0].status.as_str(), "未领取");
        assert_eq!(coupons[1].status.as_str(), "已被领完");
    }

    #[test]
    fn test_escaped_markdown() {
        let content = "  -   优惠券标题：\\*麦辣鸡腿堡\\* 第二件半价  \n  状态：\\已过期  ";
        let coupons = parse_available(content);
        assert_eq!(coupons.len(), 1);
        assert_eq!(coupons[0].title, "*麦辣鸡腿堡* 第二件半价");
        assert_eq!(coupons[0].status, CouponStatus::Other("已过期".to_owned()));
    }

    #[test]
    fn test_orphan_lines_ignored() {
        let content = "# 可领取优惠券\n状态：未领取\n<img src=\"http://x/orphan.png\">\n优惠券标题：薯条\n";
        let coupons = parse_available(content);
        assert_eq!(coupons.len(), 1);
        assert_eq!(coupons[0].title, "薯条");
        assert_eq!(coupons[0].status.as_str(), "");
        assert_eq!(coupons[0].image, "");
    }

    #[test]
    fn test_no_coupons() {
        assert!(parse_available("").is_empty());
        assert!(parse_available("暂无可领取的优惠券").is_empty());
    }

    #[test]
    fn test_status_serde() {
        let coupon = &parse_available("优惠券标题：可乐\n状态：已领取")[0];
        let value = serde_json::to_value(coupon).unwrap();
        assert_eq!(value["status"], "已被领完");
    }
}
