//! Process and filesystem adapters for the coverage ports

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use towercast_core::error::{Result, TowercastError};
use towercast_core::ports::{FileAllocator, ProcessExecutor, ProcessOutput};

/// Runs external tools with `tokio::process`, waiting for them to exit
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessExecutor;

#[async_trait]
impl ProcessExecutor for TokioProcessExecutor {
    async fn run(&self, program: &Path, args: &[String]) -> Result<ProcessOutput> {
        let output = Command::new(program).args(args).output().await.map_err(|e| {
            TowercastError::ProcessLaunch { program: program.to_path_buf(), reason: e.to_string() }
        })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        Ok(ProcessOutput { combined, exit_code: output.status.code() })
    }
}

/// Allocates output files with `tempfile`, which retries on name collisions
/// and creates with `O_EXCL`
#[derive(Debug, Clone, Copy, Default)]
pub struct TempFileAllocator;

impl FileAllocator for TempFileAllocator {
    fn create_unique(&self, dir: &Path, prefix: &str) -> Result<PathBuf> {
        let allocation_error =
            |source: std::io::Error| TowercastError::OutputAllocation { dir: dir.to_path_buf(), source };

        let file = tempfile::Builder::new()
            .prefix(prefix)
            .tempfile_in(dir)
            .map_err(allocation_error)?;

        // Keep the file: the tool writes its siblings next to it and the
        // file server reads them after this request returns.
        file.into_temp_path().keep().map_err(|e| allocation_error(e.error))
    }
}
