//! # submit-jobs 实现
//!
//! 为当前目录下的每个 `disp-NNN` 生成 `job.sh` 并提交。
//!
//! ## 依赖关系
//! - 使用 `cli/submit.rs` 定义的参数
//! - 使用 `batch/submitter.rs`, `utils/output.rs`

use crate::batch::{JobSubmitter, SubmissionReport, SubmitStatus};
use crate::cli::submit::SubmitArgs;
use crate::error::{PhononToolsError, Result};
use crate::external::{ExternalTool, SystemTool};
use crate::utils::output;

use std::env;
use std::path::Path;
use tabled::{Table, Tabled};

/// 提交结果行
#[derive(Debug, Clone, Tabled)]
struct SubmitRow {
    #[tabled(rename = "Job")]
    job: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// 执行 submit-jobs
pub fn execute(args: SubmitArgs) -> Result<()> {
    let root = env::current_dir().map_err(|e| PhononToolsError::FileReadError {
        path: ".".to_string(),
        source: e,
    })?;
    submit_in(&root, &args, &SystemTool)
}

fn submit_in(root: &Path, args: &SubmitArgs, tool: &dyn ExternalTool) -> Result<()> {
    output::print_header("Batch Job Submission");
    output::print_info(&format!(
        "Searching disp-NNN in {} (partition: {})",
        root.display(),
        args.partition
    ));

    let report = JobSubmitter::new(tool, args.partition.clone())
        .dry_run(args.dry_run)
        .submit_all(root)?;

    if report.total() == 0 {
        output::print_warning("No disp-NNN directories found.");
        return Ok(());
    }

    println!("{}", Table::new(rows(&report)));

    output::print_separator();
    output::print_done(&format!(
        "Generated {} job scripts, submitted {} jobs",
        report.total(),
        report.submitted()
    ));

    if report.failed() > 0 {
        return Err(PhononToolsError::Other(format!(
            "{} of {} submissions failed",
            report.failed(),
            report.total()
        )));
    }
    Ok(())
}

fn rows(report: &SubmissionReport) -> Vec<SubmitRow> {
    report
        .records
        .iter()
        .map(|r| {
            let (status, detail) = match &r.status {
                SubmitStatus::Submitted(reply) => ("submitted", reply.clone()),
                SubmitStatus::DryRun => ("dry-run", String::new()),
                SubmitStatus::Failed(msg) => ("failed", msg.lines().next().unwrap_or("").to_string()),
            };
            SubmitRow {
                job: r.id.dir_name(),
                status: status.to_string(),
                detail,
            }
        })
        .collect()
}
