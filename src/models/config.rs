//! # 计算配置数据模型
//!
//! 对应 `configs/*.json`，每次运行只加载一次，之后只读。
//!
//! ## JSON 格式
//! ```text
//! {
//!     "calc_dir": "calc/Fe",
//!     "inputs_dir": "inputs/Fe",
//!     "mode": "preprocess",        // relax | preprocess | postprocess
//!     "use_mlp": false,            // 可选，默认 false
//!     "use_upho": true             // 可选，默认 false
//! }
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `serde` / `serde_json`

use crate::error::{PhononToolsError, Result};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// 运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// 准备结构弛豫目录
    Relax,
    /// 生成位移结构并布置计算目录
    Preprocess,
    /// 收集力并重建力常数
    Postprocess,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Relax => write!(f, "relax"),
            Mode::Preprocess => write!(f, "preprocess"),
            Mode::Postprocess => write!(f, "postprocess"),
        }
    }
}

/// 声子计算配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// 计算根目录
    pub calc_dir: PathBuf,

    /// 共享输入文件目录 (INCAR, KPOINTS, POTCAR, ...)
    pub inputs_dir: PathBuf,

    /// 运行模式
    pub mode: Mode,

    /// 使用机器学习势（不复制 VASP 输入文件）
    #[serde(default)]
    pub use_mlp: bool,

    /// 使用 UPHO（共线反铁磁自旋拆分）
    #[serde(default)]
    pub use_upho: bool,
}

impl Config {
    /// 从 JSON 文件加载配置
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PhononToolsError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| PhononToolsError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_json_str(&content).map_err(|e| match e {
            PhononToolsError::Config { reason, .. } => PhononToolsError::Config {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// 从 JSON 字符串解析配置
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| PhononToolsError::Config {
            path: "<string>".to_string(),
            reason: e.to_string(),
        })
    }

    /// 序列化为格式化的 JSON 字符串
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PhononToolsError::Config {
            path: "<string>".to_string(),
            reason: e.to_string(),
        })
    }
}
