//! # 命令执行模块
//!
//! 加载配置并按 `mode` 分派到流水线的对应阶段。
//!
//! ## 依赖关系
//! - 被 `main.rs` 和 `bin/submit_jobs.rs` 调用
//! - 使用 `cli/`, `models/`, `pipeline/`, `utils/`
//! - 子模块: relax, preprocess, postprocess, submit

pub mod postprocess;
pub mod preprocess;
pub mod relax;
pub mod submit;

use crate::cli::Cli;
use crate::error::Result;
use crate::external::{ExternalTool, SystemTool};
use crate::models::{Config, Mode};
use crate::utils::output;

use tracing::info;

/// 执行 phonon-tools
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config_file)?;
    info!(
        "loaded {} (mode={}, use_mlp={}, use_upho={})",
        cli.config_file.display(),
        config.mode,
        config.use_mlp,
        config.use_upho
    );
    dispatch(&config, &SystemTool)
}

/// 按运行模式执行
pub fn dispatch(config: &Config, tool: &dyn ExternalTool) -> Result<()> {
    output::print_info(&format!(
        "Calculation directory: {}",
        config.calc_dir.display()
    ));

    match config.mode {
        Mode::Relax => relax::execute(config),
        Mode::Preprocess => preprocess::execute(config, tool),
        Mode::Postprocess => postprocess::execute(config, tool),
    }
}
