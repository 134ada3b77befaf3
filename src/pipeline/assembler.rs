//! # 力常数重建 (postprocess)
//!
//! 1. 把每个 `disp_set/disp-NNN/vasprun.xml` 复制到 `postprocess/disp-NNN/`
//! 2. `phonopy -f` 收集力，vasprun.xml 必须按位移编号升序传入
//! 3. `phonopy writefc.conf` 写出 `FORCE_CONSTANTS`
//! 4. UPHO 模式：复制共享输入，运行 `upho_weights`，把对称化后的
//!    `FORCE_CONSTANTS_SPG` 换成正式的 `FORCE_CONSTANTS`（原文件改名为
//!    `FORCE_CONSTANTS_orig`），并生成单一元素的 `POSCAR_one_specie`
//!
//! 第 4 步的改名不可逆；`FORCE_CONSTANTS_orig` 已存在时拒绝再次运行。
//!
//! ## 依赖关系
//! - 被 `commands/postprocess.rs` 调用
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

/// 重建结果
#[derive(Debug, Clone)]
pub struct AssembleSummary {
    pub postprocess_dir: PathBuf,
    pub displacements: Vec<DisplacementId>,
    /// 最终的 `FORCE_CONSTANTS`
    pub force_constants: PathBuf,
    /// UPHO 模式下保留的对称化前力常数
    pub original_force_constants: Option<PathBuf>,
}

/// 收集各位移的计算结果并重建力常数
pub fn assemble(
    calc_dir: &Path,
    inputs_dir: &Path,
    use_upho: bool,
    tool: &dyn ExternalTool,
) -> Result<AssembleSummary> {
    let layout = CalcLayout::new(calc_dir);
    let disp_set_dir = layout.disp_set_dir();
    let postprocess_dir = layout.postprocess_dir();

    if !disp_set_dir.is_dir() {
        return Err(PhononToolsError::DirectoryNotFound {
            path: disp_set_dir.display().to_string(),
        });
    }

    let disp_dirs = layout::scan_displacement_dirs(&disp_set_dir)?;
    if disp_dirs.is_empty() {
        return Err(PhononToolsError::MissingInput {
            path: disp_set_dir.join("disp-???").display().to_string(),
        });
    }

    // 先检查所有输入，避免留下半成品目录
    for (_, dir) in &disp_dirs {
        fs::require_file(&dir.join(layout::VASPRUN_XML))?;
    }
    let disp_yaml = disp_set_dir.join(layout::PHONOPY_DISP_YAML);
    fs::require_file(&disp_yaml)?;

    if use_upho {
        let orig = postprocess_dir.join(layout::FORCE_CONSTANTS_ORIG);
        if orig.exists() {
            return Err(PhononToolsError::StaleWorkspace {
                path: postprocess_dir.display().to_string(),
                reason: format!(
                    "{} already exists; force constants were already symmetrized",
                    layout::FORCE_CONSTANTS_ORIG
                ),
            });
        }
        // 共享输入目录在 UPHO 步骤才用到，但要提前确认存在
        fs::list_files(inputs_dir)?;
    }

    fs::ensure_dir(&postprocess_dir)?;

    let pb = progress::create_progress_bar(disp_dirs.len() as u64, "Collecting vasprun.xml");
    let mut collected = Vec::with_capacity(disp_dirs.len());

    for (id, dir) in &disp_dirs {
        let dest_dir = postprocess_dir.join(id.dir_name());
        fs::ensure_dir(&dest_dir)?;

        let dest = dest_dir.join(layout::VASPRUN_XML);
        fs::copy_file(&dir.join(layout::VASPRUN_XML), &dest)?;
        collected.push(*id);
        pb.inc(1);
    }

    pb.finish_and_clear();

    fs::copy_file(&disp_yaml, &postprocess_dir.join(layout::PHONOPY_DISP_YAML))?;

    info!("collecting forces from {} displacements", collected.len());
    let args = force_sets_args(collected);
    run_step(tool, layout::PHONOPY, &args, &postprocess_dir)?;

    phonopy_conf::writefc_conf(use_upho).write_file(&postprocess_dir.join(layout::WRITEFC_CONF))?;
    run_step(
        tool,
        layout::PHONOPY,
        &[layout::WRITEFC_CONF.to_string()],
        &postprocess_dir,
    )?;

    let force_constants = postprocess_dir.join(layout::FORCE_CONSTANTS);
    let original_force_constants = if use_upho {
        Some(symmetrize(&postprocess_dir, inputs_dir, tool)?)
    } else {
        None
    };

    Ok(AssembleSummary {
        postprocess_dir,
        displacements: disp_dirs.iter().map(|(id, _)| *id).collect(),
        force_constants,
        original_force_constants,
    })
}

/// `phonopy -f` 的参数，按位移编号升序
///
/// 位移与力的对应关系只由参数顺序决定。路径相对于 phonopy 的工作目录
/// (`postprocess/`)，与计算根目录是否为相对路径无关。
fn force_sets_args(mut ids: Vec<DisplacementId>) -> Vec<String> {
    ids.sort();

    std::iter::once("-f".to_string())
        .chain(ids.iter().map(|id| {
            Path::new(&id.dir_name())
                .join(layout::VASPRUN_XML)
                .display()
                .to_string()
        }))
        .collect()
}

/// 运行 upho_weights 并替换力常数，返回 `FORCE_CONSTANTS_orig` 的路径
fn symmetrize(postprocess_dir: &Path, inputs_dir: &Path, tool: &dyn ExternalTool) -> Result<PathBuf> {
    for src in fs::list_files(inputs_dir)? {
        if let Some(name) = src.file_name() {
            fs::copy_file(&src, &postprocess_dir.join(name))?;
        }
    }

    // 合并元素在改名之前完成，结构有问题时不动力常数文件
    let poscar_path = postprocess_dir.join(layout::POSCAR);
    let mut one_specie = Poscar::read_file(&poscar_path)?;
    one_specie
        .collapse_species()
        .map_err(|e| e.at_path(&poscar_path))?;

    info!("averaging force constants with {}", layout::UPHO_WEIGHTS);
    let args = vec![
        layout::BAND_CONF.to_string(),
        "--average_force_constants".to_string(),
    ];
    run_step(tool, layout::UPHO_WEIGHTS, &args, postprocess_dir)?;

    let fc = postprocess_dir.join(layout::FORCE_CONSTANTS);
    let fc_orig = postprocess_dir.join(layout::FORCE_CONSTANTS_ORIG);
    let fc_spg = postprocess_dir.join(layout::FORCE_CONSTANTS_SPG);
    fs::require_file(&fc)?;
    fs::require_file(&fc_spg)?;

    fs::rename(&fc, &fc_orig)?;
    fs::rename(&fc_spg, &fc)?;
    debug!("{} -> {}", fc_spg.display(), fc.display());

    one_specie.write_file(&postprocess_dir.join(layout::POSCAR_ONE_SPECIE))?;

    Ok(fc_orig)
}
