//! System-level modules
//!
//! - 日志初始化
//! - 关闭信号

pub mod logging;
pub mod signal;
