use towercast_core::config::CoverageSettings;
use towercast_core::error::Result;
use towercast_core::models::{CoverageRequest, CoverageResult};
use towercast_core::ports::{FileAllocator, ProcessExecutor};

use crate::bbox::parse_bounding_box;
use crate::job::{converter_args, tool_args};

/// Coverage pipeline orchestrating the propagation tool and the converter
pub struct CoveragePipeline<P, F>
where
    P: ProcessExecutor,
    F: FileAllocator,
{
    executor: P,
    allocator: F,
    settings: CoverageSettings,
}

impl<P, F> CoveragePipeline<P, F>
where
    P: ProcessExecutor,
    F: FileAllocator,
{
    /// Create a new coverage pipeline
    pub fn new(executor: P, allocator: F, settings: CoverageSettings) -> Self {
        Self { executor, allocator, settings }
    }

    /// Run one simulation.
    ///
    /// Only a failure to allocate the output file is returned as an error.
    /// Tool and converter failures are logged and the result carries whatever
    /// could be read, down to an all-zero bounding box.
    pub async fn run(&self, request: &CoverageRequest) -> Result<CoverageResult> {
        // Phase 1: Reserve a unique output path
        let output =
            self.allocator.create_unique(&self.settings.output_dir, &self.settings.output_prefix)?;

        // Phase 2: Simulate
        let args = tool_args(request, &self.settings.sdf_dir, &output);
        tracing::debug!(program = %self.settings.signal_server_path.display(), ?args, "Running RF simulation");

        let text = match self.executor.run(&self.settings.signal_server_path, &args).await {
            Ok(out) => {
                if !out.success() {
                    tracing::warn!(exit_code = ?out.exit_code, "Propagation tool exited unsuccessfully");
                }
                out.text()
            }
            Err(e) => {
                tracing::error!(error = %e, "Propagation tool failed to start");
                String::new()
            }
        };

        let bounding_box = parse_bounding_box(&text);
        tracing::debug!(?bounding_box, "Parsed bounding box");

        // Phase 3: Convert the raster for the browser
        let convert = converter_args(&output);
        match self.executor.run(&self.settings.convert_path, &convert).await {
            Ok(out) if out.success() => {}
            Ok(out) => {
                tracing::warn!(exit_code = ?out.exit_code, output = %out.text(), "Raster conversion failed");
            }
            Err(e) => tracing::error!(error = %e, "Raster converter failed to start"),
        }

        let file = output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::info!(file = %file, "Coverage job finished");

        Ok(CoverageResult { file, bounding_box })
    }
}
