/// 配置文件组件
pub mod config;
