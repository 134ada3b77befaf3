//! # 位移结构布置 (preprocess)
//!
//! 从弛豫后的参考结构出发：
//! 1. 复制 `relax/POSCAR` 到 `disp_set/`，写入 `disp.conf`
//! 2. 调用 `phonopy -d disp.conf` 生成 `POSCAR-NNN` 与 `phonopy_disp.yaml`
//! 3. 每个位移建立 `disp-NNN/`，移入结构，复制 VASP 输入
//! 4. UPHO 模式下把结构拆成两个自旋子晶格
//!
//! `disp_set/` 中已有 `disp-NNN` 目录时拒绝运行，重试前需手动清理。
//!
//! ## 依赖关系
//! - 被 `commands/preprocess.rs` 调用
//! - 使用 `external.rs`, `parsers/poscar.rs`, `utils/`

use super::layout::{self, CalcLayout};
use super::run_step;
use crate::error::{PhononToolsError, Result};
use crate::external::ExternalTool;
use crate::models::DisplacementId;
use crate::parsers::Poscar;
use crate::utils::{fs, phonopy_conf, progress};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 影响目录内容的开关
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageFlags {
    /// 共线反铁磁拆分
    pub use_upho: bool,
    /// 机器学习势：只需要结构文件
    pub use_mlp: bool,
}

/// 布置结果
#[derive(Debug, Clone)]
pub struct StageSummary {
    pub disp_set_dir: PathBuf,
    pub displacements: Vec<DisplacementId>,
}

/// 生成并布置所有位移目录
pub fn stage(
    calc_dir: &Path,
    inputs_dir: &Path,
    flags: StageFlags,
    tool: &dyn ExternalTool,
) -> Result<StageSummary> {
    let layout = CalcLayout::new(calc_dir);
    let disp_set_dir = layout.disp_set_dir();

    // 先检查所有输入，避免留下半成品目录
    let reference = layout.reference_poscar();
    fs::require_file(&reference)?;
    if !flags.use_mlp {
        for name in layout::SOLVER_INPUTS {
            fs::require_file(&inputs_dir.join(name))?;
        }
        // 位移不改变元素与计数，参考结构能拆分则每个位移结构都能拆分
        if flags.use_upho {
            Poscar::read_file(&reference)?
                .split_single_species()
                .map_err(|e| e.at_path(&reference))?;
        }
    }

    if disp_set_dir.is_dir() {
        let existing = layout::scan_displacement_dirs(&disp_set_dir)?;
        if let Some((id, _)) = existing.first() {
            return Err(PhononToolsError::StaleWorkspace {
                path: disp_set_dir.display().to_string(),
                reason: format!(
                    "{} displacement directories already exist (first: {}); remove them before re-running",
                    existing.len(),
                    id.dir_name()
                ),
            });
        }
    }
    fs::ensure_dir(&disp_set_dir)?;

    fs::copy_file(&reference, &disp_set_dir.join(layout::POSCAR))?;
    phonopy_conf::displacement_conf(flags.use_upho)
        .write_file(&disp_set_dir.join(layout::DISP_CONF))?;

    info!("generating displacements in {}", disp_set_dir.display());
    let args = vec!["-d".to_string(), layout::DISP_CONF.to_string()];
    run_step(tool, layout::PHONOPY, &args, &disp_set_dir)?;

    let generated = layout::scan_displaced_poscars(&disp_set_dir)?;
    if generated.is_empty() {
        return Err(PhononToolsError::MissingInput {
            path: disp_set_dir.join("POSCAR-???").display().to_string(),
        });
    }

    let pb = progress::create_progress_bar(generated.len() as u64, "Staging displacements");
    let mut displacements = Vec::with_capacity(generated.len());

    for (id, poscar_path) in &generated {
        let disp_dir = disp_set_dir.join(id.dir_name());
        stage_one(&disp_dir, poscar_path, inputs_dir, flags)?;
        debug!("staged {}", disp_dir.display());

        displacements.push(*id);
        pb.inc(1);
    }

    pb.finish_and_clear();

    Ok(StageSummary {
        disp_set_dir,
        displacements,
    })
}

fn stage_one(disp_dir: &Path, poscar_src: &Path, inputs_dir: &Path, flags: StageFlags) -> Result<()> {
    fs::ensure_dir(disp_dir)?;
    let poscar_path = disp_dir.join(layout::POSCAR);
    fs::rename(poscar_src, &poscar_path)?;

    if flags.use_mlp {
        return Ok(());
    }

    for name in layout::SOLVER_INPUTS {
        fs::copy_file(&inputs_dir.join(name), &disp_dir.join(name))?;
    }

    if flags.use_upho {
        let mut poscar = Poscar::read_file(&poscar_path)?;
        poscar
            .split_single_species()
            .map_err(|e| e.at_path(&poscar_path))?;
        poscar.write_file(&poscar_path)?;
    }

    Ok(())
}
