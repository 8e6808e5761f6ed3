use crate::impl_tool_t;

impl_tool_t!(
    /// 麦麦省券列表查询
    AvailableCoupons => "available-coupons",
    /// 一键领券
    AutoBindCoupons => "auto-bind-coupons",
    /// 我的优惠券查询
    MyCoupons => "my-coupons",
    /// 当前时间信息查询, used as a token validity probe
    NowTimeInfo => "now-time-info",
);

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::request::interface::ToolT;

    #[test]
    fn test_tool_names() {
        assert_eq!(AvailableCoupons::NAME, "available-coupons");
        assert_eq!(AutoBindCoupons::NAME, "auto-bind-coupons");
        assert_eq!(MyCoupons::NAME, "my-coupons");
        assert_eq!(NowTimeInfo::NAME, "now-time-info");
        assert_eq!(NowTimeInfo::arguments(), json!({}));
    }
}
