//! # preprocess 模式
//!
//! 生成位移结构并布置计算目录。
//!
//! ## 依赖关系
//! - 使用 `pipeline/stager.rs`, `utils/output.rs`

use crate::error::Result;
use crate::external::ExternalTool;
use crate::models::Config;
use crate::pipeline::{self, StageFlags};
use crate::utils::output;

pub fn execute(config: &Config, tool: &dyn ExternalTool) -> Result<()> {
    output::print_header("Staging Displacements");

    if config.use_upho {
        if config.use_mlp {
            output::print_warning("use_mlp is set: structures are not split into spin sublattices");
        } else {
            output::print_info("UPHO: splitting species into spin-up/spin-down sublattices");
        }
    }
    if config.use_mlp {
        output::print_skip("Machine learning potential: VASP inputs are not copied");
    }

    let flags = StageFlags {
        use_upho: config.use_upho,
        use_mlp: config.use_mlp,
    };
    let summary = pipeline::stage(&config.calc_dir, &config.inputs_dir, flags, tool)?;

    output::print_separator();
    output::print_done(&format!(
        "Staged {} displacements in {}",
        summary.displacements.len(),
        summary.disp_set_dir.display()
    ));
    if !config.use_mlp {
        output::print_info("Next: run VASP in each disp-NNN directory (see `submit-jobs`)");
    }
    Ok(())
}
