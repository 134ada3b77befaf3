//! # relax 模式
//!
//! ## 依赖关系
//! - 使用 `pipeline/relax.rs`, `utils/output.rs`

use crate::error::Result;
use crate::models::Config;
use crate::pipeline;
use crate::utils::output;

pub fn execute(config: &Config) -> Result<()> {
    output::print_header("Preparing Relaxation");

    let copied = pipeline::prepare_relax(&config.calc_dir, &config.inputs_dir)?;
    for path in &copied {
        output::print_success(&format!("Copied {}", path.display()));
    }

    output::print_done(&format!(
        "Copied {} input files into {}",
        copied.len(),
        config.calc_dir.join("relax").display()
    ));
    Ok(())
}
