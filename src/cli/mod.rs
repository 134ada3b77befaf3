//! # CLI 模块
//!
//! 使用 `clap` 定义两个可执行文件的命令行参数。
//!
//! ## 命令结构
//! - `phonon-tools <CONFIG_FILE>`: 读取 JSON 配置，按 `mode` 执行
//! - `submit-jobs [-p PARTITION]`: 提交当前目录下的位移计算
//!
//! ## 依赖关系
//! - 被 `main.rs` 和 `bin/submit_jobs.rs` 使用
//! - 子模块: submit

pub mod submit;

use clap::Parser;
use std::path::PathBuf;

/// phonon-tools - DFT 声子计算辅助工具
#[derive(Parser, Debug)]
#[command(name = "phonon-tools")]
#[command(author = "Taiki Iwamura")]
#[command(version)]
#[command(about = "Useful tools to perform phonon calculation by DFT", long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file (configs/*.json)
    pub config_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Silence diagnostic logging
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}
