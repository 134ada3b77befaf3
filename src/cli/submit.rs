//! # submit-jobs CLI 定义
//!
//! 在当前目录下查找 `disp-NNN` 并批量提交到 Slurm。
//!
//! ## 依赖关系
//! - 被 `bin/submit_jobs.rs` 使用
//! - 参数传递给 `commands/submit.rs`

use crate::batch::submitter::DEFAULT_PARTITION;
use clap::Parser;

/// submit-jobs 参数
#[derive(Parser, Debug)]
#[command(name = "submit-jobs")]
#[command(version)]
#[command(about = "Submit one Slurm job per disp-NNN directory in the current directory", long_about = None)]
pub struct SubmitArgs {
    /// Slurm partition name
    #[arg(short, long, default_value = DEFAULT_PARTITION)]
    pub partition: String,

    /// Only generate job.sh files, do not submit
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Silence diagnostic logging
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}
