//! # 批量处理模块
//!
//! 为位移目录批量生成并提交 Slurm 作业。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 子模块: submitter

pub mod submitter;

pub use submitter::{JobSubmitter, SubmissionReport, SubmitRecord, SubmitStatus};
