//! # 计算目录布局
//!
//! ```text
//! <calc_dir>/
//!   relax/POSCAR                 # 弛豫后的参考结构
//!   disp_set/
//!     POSCAR, disp.conf, phonopy_disp.yaml
//!     disp-001/ POSCAR INCAR KPOINTS POTCAR (vasprun.xml)
//!     disp-002/ ...
//!   postprocess/
//!     disp-001/vasprun.xml ...
//!     phonopy_disp.yaml, writefc.conf, FORCE_CONSTANTS
//!     (UPHO) FORCE_CONSTANTS_orig, POSCAR_one_specie, ...
//! ```
//!
//! ## 依赖关系
//! - 被 `pipeline/` 和 `batch/` 使用
//! - 使用 `glob` 匹配位移目录和位移结构文件

use crate::error::{PhononToolsError, Result};
use crate::models::DisplacementId;

use std::path::{Path, PathBuf};

// phonopy / VASP 约定的文件名
pub const POSCAR: &str = "POSCAR";
pub const INCAR: &str = "INCAR";
pub const KPOINTS: &str = "KPOINTS";
pub const POTCAR: &str = "POTCAR";
pub const VASPRUN_XML: &str = "vasprun.xml";
pub const PHONOPY_DISP_YAML: &str = "phonopy_disp.yaml";
pub const BAND_CONF: &str = "band.conf";
pub const FORCE_CONSTANTS: &str = "FORCE_CONSTANTS";
pub const FORCE_CONSTANTS_SPG: &str = "FORCE_CONSTANTS_SPG";

// 本工具自己的文件名
pub const DISP_CONF: &str = "disp.conf";
pub const WRITEFC_CONF: &str = "writefc.conf";
pub const FORCE_CONSTANTS_ORIG: &str = "FORCE_CONSTANTS_orig";
pub const POSCAR_ONE_SPECIE: &str = "POSCAR_one_specie";

/// 每个位移目录需要的 VASP 输入
pub const SOLVER_INPUTS: [&str; 3] = [INCAR, KPOINTS, POTCAR];

pub const PHONOPY: &str = "phonopy";
pub const UPHO_WEIGHTS: &str = "upho_weights";

const DISP_DIR_GLOB: &str = "disp-???";
const DISP_POSCAR_GLOB: &str = "POSCAR-???";

/// 计算根目录下的各级路径
#[derive(Debug, Clone)]
pub struct CalcLayout {
    root: PathBuf,
}

impl CalcLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CalcLayout { root: root.into() }
    }

    pub fn relax_dir(&self) -> PathBuf {
        self.root.join("relax")
    }

    /// 弛豫后的参考结构
    pub fn reference_poscar(&self) -> PathBuf {
        self.relax_dir().join(POSCAR)
    }

    pub fn disp_set_dir(&self) -> PathBuf {
        self.root.join("disp_set")
    }

    pub fn postprocess_dir(&self) -> PathBuf {
        self.root.join("postprocess")
    }
}

/// 查找 `dir` 下所有 `disp-NNN` 目录，按编号升序
pub fn scan_displacement_dirs(dir: &Path) -> Result<Vec<(DisplacementId, PathBuf)>> {
    scan(dir, DISP_DIR_GLOB, |path| {
        path.is_dir()
            .then(|| file_name(path).and_then(DisplacementId::from_dir_name))
            .flatten()
    })
}

/// 查找 phonopy 生成的 `POSCAR-NNN` 文件，按编号升序
pub fn scan_displaced_poscars(dir: &Path) -> Result<Vec<(DisplacementId, PathBuf)>> {
    scan(dir, DISP_POSCAR_GLOB, |path| {
        path.is_file()
            .then(|| file_name(path).and_then(DisplacementId::from_poscar_name))
            .flatten()
    })
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

fn scan<F>(dir: &Path, pattern: &str, identify: F) -> Result<Vec<(DisplacementId, PathBuf)>>
where
    F: Fn(&Path) -> Option<DisplacementId>,
{
    let dir_str = dir.to_str().ok_or_else(|| {
        PhononToolsError::InvalidArgument(format!("Non UTF-8 path: {}", dir.display()))
    })?;
    let full_pattern = Path::new(&glob::Pattern::escape(dir_str))
        .join(pattern)
        .to_string_lossy()
        .to_string();

    let paths = glob::glob(&full_pattern).map_err(|e| {
        PhononToolsError::InvalidArgument(format!("Invalid pattern '{}': {}", full_pattern, e))
    })?;

    let mut found = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| PhononToolsError::FileReadError {
            path: e.path().display().to_string(),
            source: e.into_error(),
        })?;
        if let Some(id) = identify(&path) {
            found.push((id, path));
        }
    }

    found.sort_by_key(|(id, _)| *id);
    Ok(found)
}
