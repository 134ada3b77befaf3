//! # 声子计算流水线
//!
//! 按计算根目录的状态推进：
//! `空 -> 位移已布置 -> (外部 VASP) -> 力常数已重建 -> (UPHO) 已对称化`
//!
//! 每一步都是阻塞的单线程操作，外部程序通过 `ExternalTool` 调用。
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 子模块: layout, relax, stager, assembler

pub mod assembler;
pub mod layout;
pub mod relax;
pub mod stager;

pub use assembler::{assemble, AssembleSummary};
pub use layout::CalcLayout;
pub use relax::prepare_relax;
pub use stager::{stage, StageFlags, StageSummary};

use crate::error::Result;
use crate::external::{run_checked, ExternalTool, ToolOutput};
use crate::utils::{output, progress};

use std::path::Path;

/// 显示命令并在等待期间显示 spinner
pub(crate) fn run_step(
    tool: &dyn ExternalTool,
    program: &str,
    args: &[String],
    cwd: &Path,
) -> Result<ToolOutput> {
    output::print_command(program, args);
    let spinner = progress::create_spinner(&format!("Waiting for {}", program));
    let result = run_checked(tool, program, args, cwd);
    spinner.finish_and_clear();
    result
}
