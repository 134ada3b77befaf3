//! # 统一错误处理模块
//!
//! 定义 phonon-tools 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// phonon-tools 统一错误类型
#[derive(Error, Debug)]
pub enum PhononToolsError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid configuration file: {path}\nReason: {reason}")]
    Config { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 流水线输入/状态错误
    // ─────────────────────────────────────────────────────────────
    #[error("Required input is missing: {path}")]
    MissingInput { path: String },

    #[error("Refusing to reuse {path}: {reason}")]
    StaleWorkspace { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 结构文件错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unexpected structure file layout in {path}\nReason: {reason}")]
    StructureFormat { path: String, reason: String },

    #[error("Structure file {path} has {found} lines, expected at least {expected_line_count}")]
    TruncatedStructure {
        path: String,
        expected_line_count: usize,
        found: usize,
    },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed (exit code {}): {command}\n{stderr}", display_exit_code(.exit_code))]
    ExternalTool {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

fn display_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "signal".to_string(),
    }
}

impl PhononToolsError {
    /// 为结构文件错误附加文件路径
    ///
    /// 解析器只处理字符串内容，不知道文件来源，由调用方补充路径。
    pub fn at_path(self, path: &std::path::Path) -> Self {
        let path = path.display().to_string();
        match self {
            PhononToolsError::StructureFormat { reason, .. } => {
                PhononToolsError::StructureFormat { path, reason }
            }
            PhononToolsError::TruncatedStructure {
                expected_line_count,
                found,
                ..
            } => PhononToolsError::TruncatedStructure {
                path,
                expected_line_count,
                found,
            },
            other => other,
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, PhononToolsError>;
