//! # 批量作业提交
//!
//! 在根目录下查找 `disp-NNN` 目录，为每个目录写入 `job.sh` 并用
//! `sbatch -p <partition> job.sh` 提交。每次提交后固定等待一小段时间，
//! 避免短时间内向调度器发送过多请求。
//!
//! 单个目录提交失败只记录，不中断扫描；找不到 `sbatch` 时直接返回错误。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 调用
//! - 使用 `external.rs`, `pipeline/layout.rs`, `utils/slurm.rs`

use crate::error::{PhononToolsError, Result};
use crate::external::{run_checked, ExternalTool};
use crate::models::DisplacementId;
use crate::pipeline::layout;
use crate::utils::slurm::{generate_job_script, SlurmConfig};
use crate::utils::{fs, progress};

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_PARTITION: &str = "vega-a,vega-c";
pub const JOB_SCRIPT: &str = "job.sh";
pub const SBATCH: &str = "sbatch";

/// 两次提交之间的等待时间
pub const SUBMIT_DELAY: Duration = Duration::from_millis(100);

/// 单个目录的提交结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// 已提交，附带 sbatch 的输出
    Submitted(String),
    /// 只生成了脚本
    DryRun,
    /// 提交失败
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SubmitRecord {
    pub id: DisplacementId,
    pub dir: PathBuf,
    pub status: SubmitStatus,
}

/// 批量提交结果统计
#[derive(Debug, Default)]
pub struct SubmissionReport {
    pub records: Vec<SubmitRecord>,
}

impl SubmissionReport {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn submitted(&self) -> usize {
        self.count(|s| matches!(s, SubmitStatus::Submitted(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, SubmitStatus::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&SubmitStatus) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.status)).count()
    }
}

/// 批量提交器
pub struct JobSubmitter<'a> {
    tool: &'a dyn ExternalTool,
    partition: String,
    delay: Duration,
    dry_run: bool,
}

impl<'a> JobSubmitter<'a> {
    pub fn new(tool: &'a dyn ExternalTool, partition: impl Into<String>) -> Self {
        JobSubmitter {
            tool,
            partition: partition.into(),
            delay: SUBMIT_DELAY,
            dry_run: false,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 为 `root` 下每个位移目录生成并提交作业，按编号升序
    pub fn submit_all(&self, root: &Path) -> Result<SubmissionReport> {
        if !root.is_dir() {
            return Err(PhononToolsError::DirectoryNotFound {
                path: root.display().to_string(),
            });
        }

        let dirs = layout::scan_displacement_dirs(root)?;
        let pb = progress::create_progress_bar(dirs.len() as u64, "Submitting");
        let mut report = SubmissionReport::default();

        for (id, dir) in dirs {
            let status = self.submit_one(&id, &dir)?;
            if let SubmitStatus::Failed(msg) = &status {
                pb.suspend(|| warn!("{}: {}", id.dir_name(), msg));
            }
            report.records.push(SubmitRecord { id, dir, status });
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(report)
    }

    fn submit_one(&self, id: &DisplacementId, dir: &Path) -> Result<SubmitStatus> {
        let script = generate_job_script(&SlurmConfig::for_job(id.dir_name()));
        // 单个目录写不进脚本只记为失败，不影响其余目录
        if let Err(e) = fs::write_text(&dir.join(JOB_SCRIPT), &script) {
            return Ok(SubmitStatus::Failed(e.to_string()));
        }

        if self.dry_run {
            return Ok(SubmitStatus::DryRun);
        }

        let args = vec![
            "-p".to_string(),
            self.partition.clone(),
            JOB_SCRIPT.to_string(),
        ];
        let status = match run_checked(self.tool, SBATCH, &args, dir) {
            Ok(out) => SubmitStatus::Submitted(out.stdout.trim().to_string()),
            Err(e @ PhononToolsError::CommandNotFound { .. }) => return Err(e),
            Err(e) => SubmitStatus::Failed(e.to_string()),
        };
        debug!("{} -> {:?}", dir.display(), status);

        thread::sleep(self.delay);
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::testing::{Invocation, RecordingTool};
    use crate::external::ToolOutput;
    use std::fs as stdfs;

    fn submitted_reply(call: &Invocation) -> ToolOutput {
        let name = call.cwd.file_name().unwrap().to_string_lossy().to_string();
        ToolOutput {
            exit_code: Some(0),
            stdout: format!("Submitted batch job {}\n", &name[5..]),
            stderr: String::new(),
        }
    }

    fn root_with(names: &[&str]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for name in names {
            stdfs::create_dir(tmp.path().join(name)).unwrap();
        }
        tmp
    }

    #[test]
    fn test_submit_only_matching_directories() {
        let tmp = root_with(&["disp-002", "disp-001", "disp-1", "disp-abcd", "relax", "disp-0003"]);
        stdfs::write(tmp.path().join("disp-004"), "not a dir").unwrap();
        let tool = RecordingTool::with_handler(submitted_reply);

        let report = JobSubmitter::new(&tool, DEFAULT_PARTITION)
            .with_delay(Duration::ZERO)
            .submit_all(tmp.path())
            .unwrap();

        assert_eq!(report.total(), 2);
        assert_eq!(report.submitted(), 2);
        assert_eq!(
            report.records[0].status,
            SubmitStatus::Submitted("Submitted batch job 001".to_string())
        );

        let calls = tool.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].cwd, tmp.path().join("disp-001"));
        assert_eq!(calls[1].cwd, tmp.path().join("disp-002"));
        assert!(calls.iter().all(|c| c.program == "sbatch"));
        assert_eq!(calls[0].args, ["-p", "vega-a,vega-c", "job.sh"]);

        // 每个匹配目录恰好一个脚本，其余目录不动
        for name in ["disp-001", "disp-002"] {
            let script = stdfs::read_to_string(tmp.path().join(name).join("job.sh")).unwrap();
            assert!(script.contains(&format!("#SBATCH -J {}\n", name)));
        }
        for name in ["disp-1", "disp-abcd", "relax", "disp-0003"] {
            assert!(!tmp.path().join(name).join("job.sh").exists());
        }
    }

    #[test]
    fn test_custom_partition() {
        let tmp = root_with(&["disp-001"]);
        let tool = RecordingTool::with_handler(submitted_reply);
        JobSubmitter::new(&tool, "vega-b")
            .with_delay(Duration::ZERO)
            .submit_all(tmp.path())
            .unwrap();
        assert_eq!(tool.calls()[0].args, ["-p", "vega-b", "job.sh"]);
    }

    #[test]
    fn test_dry_run_writes_scripts_without_submitting() {
        let tmp = root_with(&["disp-001", "disp-002", "disp-003"]);
        let tool = RecordingTool::new();

        let report = JobSubmitter::new(&tool, DEFAULT_PARTITION)
            .dry_run(true)
            .submit_all(tmp.path())
            .unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.submitted(), 0);
        assert!(report.records.iter().all(|r| r.status == SubmitStatus::DryRun));
        assert!(tool.calls().is_empty());
        assert!(tmp.path().join("disp-003").join("job.sh").is_file());
    }

    #[test]
    fn test_failed_submission_is_recorded_and_scan_continues() {
        let tmp = root_with(&["disp-001", "disp-002"]);
        let tool = RecordingTool::with_handler(|call: &Invocation| {
            if call.cwd.ends_with("disp-001") {
                ToolOutput {
                    exit_code: Some(1),
                    stdout: String::new(),
                    stderr: "sbatch: error: invalid partition specified".to_string(),
                }
            } else {
                submitted_reply(call)
            }
        });

        let report = JobSubmitter::new(&tool, "nope")
            .with_delay(Duration::ZERO)
            .submit_all(tmp.path())
            .unwrap();

        assert_eq!(report.failed(), 1);
        assert_eq!(report.submitted(), 1);
        match &report.records[0].status {
            SubmitStatus::Failed(msg) => assert!(msg.contains("invalid partition")),
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[test]
    fn test_unwritable_job_script_is_recorded_and_scan_continues() {
        let tmp = root_with(&["disp-001", "disp-002"]);
        // job.sh 位置被目录占据，写入失败
        stdfs::create_dir(tmp.path().join("disp-001").join("job.sh")).unwrap();
        let tool = RecordingTool::with_handler(submitted_reply);

        let report = JobSubmitter::new(&tool, DEFAULT_PARTITION)
            .with_delay(Duration::ZERO)
            .submit_all(tmp.path())
            .unwrap();

        assert_eq!(report.total(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.submitted(), 1);
        match &report.records[0].status {
            SubmitStatus::Failed(msg) => assert!(msg.contains("job.sh"), "{msg}"),
            other => panic!("unexpected status: {other:?}"),
        }

        let calls = tool.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].cwd, tmp.path().join("disp-002"));
    }

    #[test]
    fn test_empty_root() {
        let tmp = root_with(&[]);
        let tool = RecordingTool::new();
        let report = JobSubmitter::new(&tool, DEFAULT_PARTITION)
            .submit_all(tmp.path())
            .unwrap();
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_missing_root() {
        let tmp = root_with(&[]);
        let tool = RecordingTool::new();
        let err = JobSubmitter::new(&tool, DEFAULT_PARTITION)
            .submit_all(&tmp.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, PhononToolsError::DirectoryNotFound { .. }));
    }
}
