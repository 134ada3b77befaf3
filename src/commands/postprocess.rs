//! # postprocess 模式
//!
//! 收集各位移的 vasprun.xml 并重建力常数。
//!
//! ## 依赖关系
//! - 使用 `pipeline/assembler.rs`, `utils/output.rs`

use crate::error::Result;
use crate::external::ExternalTool;
use crate::models::Config;
use crate::pipeline;
use crate::utils::output;

pub fn execute(config: &Config, tool: &dyn ExternalTool) -> Result<()> {
    output::print_header("Reconstructing Force Constants");

    let summary = pipeline::assemble(
        &config.calc_dir,
        &config.inputs_dir,
        config.use_upho,
        tool,
    )?;

    output::print_success(&format!(
        "Collected forces from {} displacements",
        summary.displacements.len()
    ));
    if let Some(orig) = &summary.original_force_constants {
        output::print_success(&format!(
            "Unsymmetrized force constants kept as {}",
            orig.display()
        ));
    }

    output::print_separator();
    output::print_done(&format!(
        "Force constants written to {}",
        summary.force_constants.display()
    ));
    Ok(())
}
