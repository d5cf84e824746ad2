//! Port trait definitions
//!
//! These traits define the interfaces that external collaborators must implement.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;

/// Captured result of one external process run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// stdout followed by stderr
    pub combined: Vec<u8>,
    /// Exit code; `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.combined).into_owned()
    }
}

/// Port for running external tools synchronously (no streaming)
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Run `program` with `args` to completion and capture its output.
    ///
    /// A non-zero exit is reported through [`ProcessOutput::exit_code`];
    /// `Err` means the process could not be started at all.
    async fn run(&self, program: &Path, args: &[String]) -> Result<ProcessOutput>;
}

/// Port for allocating collision-free output files
pub trait FileAllocator: Send + Sync {
    /// Create a new, previously non-existent file in `dir` whose name starts
    /// with `prefix`, and return its path. The file is left on disk.
    fn create_unique(&self, dir: &Path, prefix: &str) -> Result<PathBuf>;
}

#[async_trait]
impl<T: ProcessExecutor + ?Sized> ProcessExecutor for Arc<T> {
    async fn run(&self, program: &Path, args: &[String]) -> Result<ProcessOutput> {
        (**self).run(program, args).await
    }
}

impl<T: FileAllocator + ?Sized> FileAllocator for Arc<T> {
    fn create_unique(&self, dir: &Path, prefix: &str) -> Result<PathBuf> {
        (**self).create_unique(dir, prefix)
    }
}
