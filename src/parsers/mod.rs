//! # 解析器模块
//!
//! 结构文件的读取与改写。
//!
//! ## 依赖关系
//! - 被 `pipeline/` 使用
//! - 子模块: poscar

pub mod poscar;

pub use poscar::Poscar;
