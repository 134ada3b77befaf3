//! # 文件系统工具
//!
//! 对 `std::fs` 的薄封装，统一附加路径信息并转换为 `PhononToolsError`。
//! 源文件不存在时返回 `MissingInput`，便于区分"输入缺失"和"写入失败"。
//!
//! ## 依赖关系
//! - 被 `pipeline/` 和 `batch/` 使用
//! - 使用 `walkdir` 列出目录下的文件

use crate::error::{PhononToolsError, Result};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn write_error(path: &Path, source: std::io::Error) -> PhononToolsError {
    PhononToolsError::FileWriteError {
        path: path.display().to_string(),
        source,
    }
}

/// 确认输入文件存在
pub fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PhononToolsError::MissingInput {
            path: path.display().to_string(),
        })
    }
}

/// 创建目录（已存在时不报错）
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| write_error(path, e))
}

/// 复制文件，覆盖目标
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    require_file(src)?;
    fs::copy(src, dest)
        .map(|_| ())
        .map_err(|e| write_error(dest, e))
}

/// 移动或重命名文件
pub fn rename(src: &Path, dest: &Path) -> Result<()> {
    fs::rename(src, dest).map_err(|e| match e.kind() {
        ErrorKind::NotFound if !src.exists() => PhononToolsError::MissingInput {
            path: src.display().to_string(),
        },
        _ => write_error(dest, e),
    })
}

/// 写入文本文件
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| write_error(path, e))
}

/// 列出目录下（不递归）的所有普通文件，按文件名排序
///
/// 指向文件的符号链接按其目标计入；悬空链接返回 `FileReadError`。
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PhononToolsError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1) {
        let entry = entry.map_err(|e| PhononToolsError::FileReadError {
            path: dir.display().to_string(),
            source: e.into(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_missing_source_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("INCAR"), &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, PhononToolsError::MissingInput { .. }));
    }

    #[test]
    fn test_rename_missing_source_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = rename(
            &dir.path().join("FORCE_CONSTANTS_SPG"),
            &dir.path().join("FORCE_CONSTANTS"),
        )
        .unwrap_err();
        assert!(matches!(err, PhononToolsError::MissingInput { .. }));
    }

    #[test]
    fn test_list_files_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("KPOINTS"), "k").unwrap();
        fs::write(dir.path().join("INCAR"), "i").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("POTCAR"), "p").unwrap();

        let names: Vec<String> = list_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["INCAR", "KPOINTS"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_files_follows_symlinks_to_files() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let shared = dir.path().join("shared");
        fs::create_dir(&shared).unwrap();
        fs::write(shared.join("POTCAR.Fe"), "p").unwrap();
        fs::create_dir(shared.join("pseudo")).unwrap();

        let inputs = dir.path().join("inputs");
        fs::create_dir(&inputs).unwrap();
        fs::write(inputs.join("INCAR"), "i").unwrap();
        symlink(shared.join("POTCAR.Fe"), inputs.join("POTCAR")).unwrap();
        symlink(shared.join("pseudo"), inputs.join("pseudo")).unwrap();

        let names: Vec<String> = list_files(&inputs)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["INCAR", "POTCAR"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_files_dangling_symlink_is_error() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        symlink(dir.path().join("gone"), dir.path().join("POTCAR")).unwrap();
        assert!(matches!(
            list_files(dir.path()),
            Err(PhononToolsError::FileReadError { .. })
        ));
    }

    #[test]
    fn test_list_files_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            list_files(&dir.path().join("nope")),
            Err(PhononToolsError::DirectoryNotFound { .. })
        ));
    }
}
