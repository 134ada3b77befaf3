//! # 日志初始化
//!
//! 诊断信息（外部命令行、工作目录、stdout/stderr）通过 `tracing` 输出到 stderr，
//! 与 `output` 模块的用户提示分开。
//!
//! ## 依赖关系
//! - 被两个可执行文件调用
//! - 使用 `tracing-subscriber`

use crate::error::{PhononToolsError, Result};

use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// 由 `-v` 次数决定日志级别
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub fn setup_logging(verbosity: u8, quiet: bool) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer)
        .try_init()
        .map_err(|e| PhononToolsError::Other(format!("Failed to initialize logging: {}", e)))
}
