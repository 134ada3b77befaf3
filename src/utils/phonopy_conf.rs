//! # phonopy 设置文件生成
//!
//! 生成 `disp.conf`（位移生成）和 `writefc.conf`（写出力常数）。
//! 条目按插入顺序输出，行间以 `\n` 分隔，末尾无换行。
//!
//! UPHO 模式下的 MAGMOM 是固定的共线反铁磁模板（16 个 +5.0 与 16 个 -5.0），
//! 与实际结构无关。
//!
//! ## 依赖关系
//! - 被 `pipeline/stager.rs` 和 `pipeline/assembler.rs` 使用
//! - 使用 `utils/fs.rs`

use crate::error::Result;
use crate::utils::fs;

use std::path::Path;

/// 每个自旋方向的磁矩个数
pub const MOMENTS_PER_SPIN: usize = 16;
pub const MOMENT_UP: &str = "5.0";
pub const MOMENT_DOWN: &str = "-5.0";

/// phonopy 设置文件内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhonopyConf {
    entries: Vec<(String, String)>,
}

impl PhonopyConf {
    pub fn new() -> Self {
        Default::default()
    }

    /// 设置条目；已存在的键保持原位置并替换其值
    pub fn set(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let (key, value) = (key.as_ref().to_owned(), value.as_ref().to_owned());
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn supercell_dim(self, dim: [u32; 3]) -> Self {
        let value = dim.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(" ");
        self.set("DIM", value)
    }

    /// 共线反铁磁初始磁矩
    pub fn collinear_moments(self) -> Self {
        let up = std::iter::repeat(MOMENT_UP).take(MOMENTS_PER_SPIN);
        let down = std::iter::repeat(MOMENT_DOWN).take(MOMENTS_PER_SPIN);
        let value = up.chain(down).collect::<Vec<_>>().join(" ");
        self.set("MAGMOM", value)
    }

    pub fn write_force_constants(self) -> Self {
        self.set("FORCE_CONSTANTS", "WRITE")
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{} = {}", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        fs::write_text(path, &self.render())
    }
}

fn base_conf(use_upho: bool) -> PhonopyConf {
    let conf = PhonopyConf::new();
    let conf = if use_upho {
        conf.collinear_moments()
    } else {
        conf
    };
    conf.supercell_dim([1, 1, 1])
}

/// `disp.conf` 内容
pub fn displacement_conf(use_upho: bool) -> PhonopyConf {
    base_conf(use_upho)
}

/// `writefc.conf` 内容
pub fn writefc_conf(use_upho: bool) -> PhonopyConf {
    base_conf(use_upho).write_force_constants()
}
