//! # Slurm 作业脚本生成工具
//!
//! 生成每个位移目录下的 `job.sh`。
//!
//! ## 依赖关系
//! - 被 `batch/submitter.rs` 使用
//! - 无外部模块依赖

/// Slurm 作业配置
#[derive(Debug, Clone)]
pub struct SlurmConfig {
    pub job_name: String,
    pub nodes: u32,
    pub ntasks: u32,
    pub stdout_log: String,
    pub stderr_log: String,
    pub mpi_path: String,
    pub vasp_exec: String,
}

impl Default for SlurmConfig {
    fn default() -> Self {
        SlurmConfig {
            job_name: "job".to_string(),
            nodes: 1,
            ntasks: 16,
            stdout_log: "std.log".to_string(),
            stderr_log: "err.log".to_string(),
            mpi_path: "/usr/local/calc/openmpi-gcc".to_string(),
            vasp_exec: "/usr/local/calc/vasp/vasp544mpi".to_string(),
        }
    }
}

impl SlurmConfig {
    /// 以位移目录名作为作业名
    pub fn for_job(name: impl Into<String>) -> Self {
        SlurmConfig {
            job_name: name.into(),
            ..Default::default()
        }
    }
}

/// 生成作业脚本内容（末尾无换行）
pub fn generate_job_script(config: &SlurmConfig) -> String {
    format!(
        r#"#!/bin/zsh
#SBATCH -J {}
#SBATCH --nodes={}
#SBATCH -o {}
#SBATCH -e {}

export MPI_PATH={}
export PATH=${{MPI_PATH}}/bin:${{PATH}}
export LD_LIBRARY_PATH=${{MPI_PATH}}/lib:${{LD_LIBRARY_PATH}}
mpirun -np {} {}"#,
        config.job_name,
        config.nodes,
        config.stdout_log,
        config.stderr_log,
        config.mpi_path,
        config.ntasks,
        config.vasp_exec,
    )
}
