//! # 数据模型模块
//!
//! 定义计算配置与位移编号。
//!
//! ## 依赖关系
//! - 被 `pipeline/`, `batch/` 和 `commands/` 使用
//! - 子模块: config, displacement

pub mod config;
pub mod displacement;

pub use config::{Config, Mode};
pub use displacement::DisplacementId;
