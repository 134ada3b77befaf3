//! # VASP POSCAR 结构文件编辑器
//!
//! 只解析 UPHO 流程需要修改的两行（元素行与原子数行），
//! 其余内容逐行原样保留，写回时除被修改的行外与输入完全一致。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)   <- species line
//! n1 n2 ...              # number of atoms per element <- counts line
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `pipeline/stager.rs` 和 `pipeline/assembler.rs` 使用
//! - 无外部模块依赖

use crate::error::{PhononToolsError, Result};
use std::fs;
use std::path::Path;

const SPECIES_LINE: usize = 5;
const COUNTS_LINE: usize = 6;

/// 至少需要包含到原子数行
pub const MIN_LINES: usize = COUNTS_LINE + 1;

/// 按行保存的 POSCAR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poscar {
    lines: Vec<String>,
    trailing_newline: bool,
}

fn format_error(reason: impl Into<String>) -> PhononToolsError {
    PhononToolsError::StructureFormat {
        path: String::new(),
        reason: reason.into(),
    }
}

impl Poscar {
    /// 从字符串内容解析
    pub fn parse(content: &str) -> Result<Self> {
        let trailing_newline = content.ends_with('\n');
        let body = content.strip_suffix('\n').unwrap_or(content);
        let lines: Vec<String> = body.split('\n').map(str::to_string).collect();

        if body.is_empty() || lines.len() < MIN_LINES {
            return Err(PhononToolsError::TruncatedStructure {
                path: String::new(),
                expected_line_count: MIN_LINES,
                found: if body.is_empty() { 0 } else { lines.len() },
            });
        }

        Ok(Poscar {
            lines,
            trailing_newline,
        })
    }

    /// 读取 POSCAR 文件
    pub fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PhononToolsError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content).map_err(|e| e.at_path(path))
    }

    /// 写回 POSCAR 文件
    pub fn write_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|e| PhononToolsError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 元素符号列表
    pub fn species(&self) -> Vec<&str> {
        self.lines[SPECIES_LINE].split_whitespace().collect()
    }

    /// 每种元素的原子数
    pub fn counts(&self) -> Result<Vec<usize>> {
        self.lines[COUNTS_LINE]
            .split_whitespace()
            .map(|tok| {
                tok.parse::<usize>()
                    .map_err(|_| format_error(format!("invalid atom count '{}'", tok)))
            })
            .collect()
    }

    /// 原子总数
    pub fn total_atoms(&self) -> Result<usize> {
        Ok(self.counts()?.iter().sum())
    }

    pub fn set_species<S: AsRef<str>>(&mut self, species: &[S]) {
        let joined = species
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        self.replace_line(SPECIES_LINE, joined);
    }

    pub fn set_counts(&mut self, counts: &[usize]) {
        let joined = counts
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.replace_line(COUNTS_LINE, joined);
    }

    /// 替换整行，保留原行的 `\r`（CRLF 文件）
    fn replace_line(&mut self, index: usize, mut content: String) {
        if self.lines[index].ends_with('\r') {
            content.push('\r');
        }
        self.lines[index] = content;
    }

    /// 重新生成文件内容
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    /// 将单一元素拆成两个子晶格 (`X` / `2n` -> `X X` / `n n`)
    ///
    /// 要求恰好一种元素且原子数为偶数。
    pub fn split_single_species(&mut self) -> Result<()> {
        let species = self.species();
        let counts = self.counts()?;

        if species.len() != 1 || counts.len() != 1 {
            return Err(format_error(format!(
                "expected exactly one species and one atom count, found {} species and {} counts",
                species.len(),
                counts.len()
            )));
        }

        let symbol = species[0].to_string();
        if symbol.parse::<f64>().is_ok() {
            return Err(format_error(
                "species line is numeric; VASP 4 style files without element symbols are not supported",
            ));
        }

        let n_atoms = counts[0];
        if n_atoms % 2 != 0 {
            return Err(format_error(format!(
                "cannot split {} atoms of {} into two equal sublattices",
                n_atoms, symbol
            )));
        }

        let half = n_atoms / 2;
        self.set_species(&[symbol.as_str(), symbol.as_str()]);
        self.set_counts(&[half, half]);
        Ok(())
    }

    /// 将拆分后的子晶格合并回单一元素 (`X Y` / `n m` -> `X` / `n+m`)
    ///
    /// 只有一种元素的文件视为已经合并过，返回错误。
    pub fn collapse_species(&mut self) -> Result<()> {
        let species = self.species();
        let counts = self.counts()?;

        if species.len() < 2 {
            return Err(format_error(format!(
                "expected at least two species to collapse, found {}",
                species.len()
            )));
        }
        if species.len() != counts.len() {
            return Err(format_error(format!(
                "{} species but {} atom counts",
                species.len(),
                counts.len()
            )));
        }

        let element = species[0].to_string();
        let total: usize = counts.iter().sum();
        self.set_species(&[element]);
        self.set_counts(&[total]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FE16: &str = r#"Fe bcc 2x2x2
1.0
5.74 0.0 0.0
0.0 5.74 0.0
0.0 0.0 5.74
Fe
16
Direct
0.0 0.0 0.0
0.5 0.5 0.5
"#;

    #[test]
    fn test_parse_header() {
        let poscar = Poscar::parse(FE16).unwrap();
        assert_eq!(poscar.species(), vec!["Fe"]);
        assert_eq!(poscar.counts().unwrap(), vec![16]);
        assert_eq!(poscar.total_atoms().unwrap(), 16);
    }

    #[test]
    fn test_render_is_verbatim_without_edits() {
        let poscar = Poscar::parse(FE16).unwrap();
        assert_eq!(poscar.render(), FE16);

        let no_newline = FE16.trim_end_matches('\n');
        assert_eq!(Poscar::parse(no_newline).unwrap().render(), no_newline);
    }

    #[test]
    fn test_split_single_species() {
        let mut poscar = Poscar::parse(FE16).unwrap();
        poscar.split_single_species().unwrap();

        let rendered = poscar.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[5], "Fe Fe");
        assert_eq!(lines[6], "8 8");
        // 其余行保持不变
        assert_eq!(lines[4], "0.0 0.0 5.74");
        assert_eq!(lines[7], "Direct");
        assert!(rendered.ends_with("0.5 0.5 0.5\n"));
    }

    #[test]
    fn test_crlf_line_endings_survive_edits() {
        let crlf = FE16.replace('\n', "\r\n");
        let mut poscar = Poscar::parse(&crlf).unwrap();
        assert_eq!(poscar.species(), vec!["Fe"]);
        assert_eq!(poscar.counts().unwrap(), vec![16]);

        poscar.split_single_species().unwrap();
        let rendered = poscar.render();
        assert!(rendered.contains("\r\nFe Fe\r\n8 8\r\nDirect\r\n"), "{rendered:?}");
        assert_eq!(rendered.matches('\n').count(), rendered.matches("\r\n").count());

        poscar.collapse_species().unwrap();
        assert_eq!(poscar.render(), crlf);
    }

    #[test]
    fn test_split_rejects_odd_count() {
        let content = FE16.replace("\n16\n", "\n15\n");
        let mut poscar = Poscar::parse(&content).unwrap();
        let err = poscar.split_single_species().unwrap_err();
        assert!(matches!(err, PhononToolsError::StructureFormat { .. }));
        // 出错时不修改内容
        assert_eq!(poscar.render(), content);
    }

    #[test]
    fn test_split_rejects_multiple_species() {
        let content = FE16.replace("\nFe\n16\n", "\nFe Co\n8 8\n");
        let mut poscar = Poscar::parse(&content).unwrap();
        assert!(poscar.split_single_species().is_err());
    }

    #[test]
    fn test_split_rejects_vasp4_header() {
        let content = FE16.replace("\nFe\n16\n", "\n16\nDirect\n");
        let mut poscar = Poscar::parse(&content).unwrap();
        assert!(poscar.split_single_species().is_err());
    }

    #[test]
    fn test_collapse_species() {
        let content = FE16.replace("\nFe\n16\n", "\n  Fe   Co\n  8   8\n");
        let mut poscar = Poscar::parse(&content).unwrap();
        poscar.collapse_species().unwrap();
        assert_eq!(poscar.species(), vec!["Fe"]);
        assert_eq!(poscar.counts().unwrap(), vec![16]);
        assert_eq!(poscar.render(), FE16);
    }

    #[test]
    fn test_collapse_inverts_split() {
        let mut poscar = Poscar::parse(FE16).unwrap();
        poscar.split_single_species().unwrap();
        poscar.collapse_species().unwrap();
        assert_eq!(poscar.render(), FE16);
    }

    #[test]
    fn test_collapse_twice_is_rejected() {
        let content = FE16.replace("\nFe\n16\n", "\nFe Fe\n8 8\n");
        let mut poscar = Poscar::parse(&content).unwrap();
        poscar.collapse_species().unwrap();
        assert!(poscar.collapse_species().is_err());
    }

    #[test]
    fn test_collapse_rejects_mismatched_counts() {
        let content = FE16.replace("\nFe\n16\n", "\nFe Fe\n16\n");
        let mut poscar = Poscar::parse(&content).unwrap();
        assert!(poscar.collapse_species().is_err());
    }

    #[test]
    fn test_truncated_file() {
        let err = Poscar::parse("Fe\n1.0\n1 0 0\n").unwrap_err();
        match err {
            PhononToolsError::TruncatedStructure {
                expected_line_count,
                found,
                ..
            } => {
                assert_eq!(expected_line_count, 7);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(Poscar::parse("").is_err());
    }

    #[test]
    fn test_invalid_count_token() {
        let content = FE16.replace("\n16\n", "\nsixteen\n");
        let poscar = Poscar::parse(&content).unwrap();
        assert!(poscar.counts().is_err());
    }

    #[test]
    fn test_read_file_attaches_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("POSCAR");
        fs::write(&path, "short\n").unwrap();
        let err = Poscar::read_file(&path).unwrap_err();
        assert!(err.to_string().contains("POSCAR"));
    }
}
