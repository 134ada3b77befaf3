//! # 结构弛豫目录准备 (relax)
//!
//! 把共享输入目录下的所有文件复制到 `relax/`，在那里运行 VASP 后，
//! 弛豫得到的 `relax/POSCAR` 作为 preprocess 的参考结构。
//!
//! ## 依赖关系
//! - 被 `commands/relax.rs` 调用
//! - 使用 `utils/fs.rs`

use super::layout::CalcLayout;
use crate::error::Result;
use crate::utils::fs;

use std::path::{Path, PathBuf};

/// 复制输入文件到 `relax/`，返回复制后的文件路径
pub fn prepare_relax(calc_dir: &Path, inputs_dir: &Path) -> Result<Vec<PathBuf>> {
    let inputs = fs::list_files(inputs_dir)?;
    let relax_dir = CalcLayout::new(calc_dir).relax_dir();
    fs::ensure_dir(&relax_dir)?;

    let mut copied = Vec::with_capacity(inputs.len());
    for src in inputs {
        if let Some(name) = src.file_name() {
            let dest = relax_dir.join(name);
            fs::copy_file(&src, &dest)?;
            copied.push(dest);
        }
    }

    Ok(copied)
}
