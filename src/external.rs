//! # 外部命令封装
//!
//! phonopy、upho_weights 和 sbatch 都通过 `ExternalTool` 调用。
//! 每次调用显式传入工作目录，从不修改进程的当前目录。
//!
//! ## 依赖关系
//! - 被 `pipeline/` 和 `batch/` 使用
//! - 使用 `tracing` 记录命令行与输出

use crate::error::{PhononToolsError, Result};

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::{debug, trace};

/// 外部命令的运行结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// 被信号终止时为 None
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// 运行外部程序的能力
///
/// 实现只负责启动进程并收集输出，退出码由 [`run_checked`] 检查。
pub trait ExternalTool {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ToolOutput>;
}

/// 通过 `std::process::Command` 运行真实程序
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTool;

impl ExternalTool for SystemTool {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<ToolOutput> {
        debug!(
            "running `{}` in {}",
            command_line(program, args),
            cwd.display()
        );

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound if cwd.is_dir() => PhononToolsError::CommandNotFound {
                    command: program.to_string(),
                },
                ErrorKind::NotFound => PhononToolsError::DirectoryNotFound {
                    path: cwd.display().to_string(),
                },
                _ => PhononToolsError::ExternalTool {
                    command: command_line(program, args),
                    exit_code: None,
                    stderr: e.to_string(),
                },
            })?;

        let result = ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        trace!("{} stdout:\n{}", program, result.stdout);
        trace!("{} stderr:\n{}", program, result.stderr);

        Ok(result)
    }
}

/// 运行外部程序，非零退出码视为错误
pub fn run_checked(
    tool: &dyn ExternalTool,
    program: &str,
    args: &[String],
    cwd: &Path,
) -> Result<ToolOutput> {
    let output = tool.run(program, args, cwd)?;
    if output.success() {
        Ok(output)
    } else {
        Err(PhononToolsError::ExternalTool {
            command: command_line(program, args),
            exit_code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        })
    }
}

/// 用于日志和错误信息的命令行文本
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
