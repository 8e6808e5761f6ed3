/// 业务组件
pub mod business;
/// 服务端组件
pub mod server;
