//! # phonon-tools - DFT 声子计算辅助工具
//!
//! 将 phonopy + VASP 的有限位移声子计算流程整理为两个可执行文件。
//!
//! ## 可执行文件
//! - `phonon-tools <CONFIG_FILE>` - 按配置中的 `mode` 执行
//!   - `relax` - 准备结构弛豫目录
//!   - `preprocess` - 生成位移结构并布置 `disp_set/disp-NNN`
//!   - `postprocess` - 收集力、重建力常数（可选 UPHO 对称化）
//! - `submit-jobs` - 批量提交 `disp-NNN` 计算到 Slurm
//!
//! ## 依赖关系
//! ```text
//! main.rs / bin/submit_jobs.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── pipeline/  (位移布置与力常数重建)
//!   │     ├── batch/     (作业提交)
//!   │     ├── parsers/   (POSCAR 编辑)
//!   │     └── models/    (配置与位移编号)
//!   ├── external.rs (外部程序调用)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod external;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod utils;

pub use error::{PhononToolsError, Result};
