//! # 位移编号
//!
//! phonopy 生成的位移结构以三位数字编号（`POSCAR-001` ...），
//! 每个位移对应一个计算目录 `disp-001`。编号必须恰好是三位 ASCII 数字，
//! 其他名字（`disp-1`, `disp-0001`, `disp-abc`）一律忽略。
//!
//! ## 依赖关系
//! - 被 `pipeline/` 和 `batch/` 使用
//! - 使用 `regex`

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// 位移编号（001..999）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplacementId(u16);

fn dir_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^disp-([0-9]{3})$").unwrap())
}

fn poscar_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^POSCAR-([0-9]{3})$").unwrap())
}

impl DisplacementId {
    pub fn new(index: u16) -> Option<Self> {
        (index < 1000).then_some(DisplacementId(index))
    }

    pub fn index(&self) -> u16 {
        self.0
    }

    /// 从位移目录名解析 (`disp-NNN`)
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::capture(dir_name_regex(), name)
    }

    /// 从 phonopy 生成的结构文件名解析 (`POSCAR-NNN`)
    pub fn from_poscar_name(name: &str) -> Option<Self> {
        Self::capture(poscar_name_regex(), name)
    }

    fn capture(re: &Regex, name: &str) -> Option<Self> {
        let caps = re.captures(name)?;
        caps[1].parse().ok().map(DisplacementId)
    }

    /// 位移目录名
    pub fn dir_name(&self) -> String {
        format!("disp-{}", self)
    }

    /// phonopy 生成的结构文件名
    pub fn poscar_name(&self) -> String {
        format!("POSCAR-{}", self)
    }
}

impl fmt::Display for DisplacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dir_name() {
        let id = DisplacementId::from_dir_name("disp-007").unwrap();
        assert_eq!(id.index(), 7);
        assert_eq!(id.dir_name(), "disp-007");
        assert_eq!(id.poscar_name(), "POSCAR-007");
    }

    #[test]
    fn test_reject_non_three_digit_names() {
        for name in ["disp-1", "disp-0001", "disp-abc", "disp-01a", "xdisp-001", "disp-٠١٢"] {
            assert!(DisplacementId::from_dir_name(name).is_none(), "{name}");
        }
        assert!(DisplacementId::from_poscar_name("POSCAR").is_none());
        assert!(DisplacementId::from_poscar_name("POSCAR-12").is_none());
        assert!(DisplacementId::from_poscar_name("disp-012").is_none());
    }

    #[test]
    fn test_ordering_is_numeric() {
        let mut ids: Vec<_> = ["disp-010", "disp-002", "disp-100", "disp-001"]
            .iter()
            .filter_map(|n| DisplacementId::from_dir_name(n))
            .collect();
        ids.sort();
        let names: Vec<_> = ids.iter().map(|id| id.to_string()).collect();
        assert_eq!(names, ["001", "002", "010", "100"]);
    }

    #[test]
    fn test_new_bounds() {
        assert!(DisplacementId::new(999).is_some());
        assert!(DisplacementId::new(1000).is_none());
    }
}
