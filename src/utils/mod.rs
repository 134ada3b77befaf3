//! # 工具函数模块
//!
//! 提供美化输出、进度条、日志、文件操作以及 phonopy / Slurm 文件生成等工具。
//!
//! ## 依赖关系
//! - 被 `pipeline/`, `batch/`, `commands/` 使用
//! - 子模块: fs, logging, output, phonopy_conf, progress, slurm

pub mod fs;
pub mod logging;
pub mod output;
pub mod phonopy_conf;
pub mod progress;
pub mod slurm;
