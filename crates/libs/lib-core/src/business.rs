/// 凭据组件
pub mod account;
/// 优惠券组件
pub mod coupon;
