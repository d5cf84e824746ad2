//! Argument lists for the external tools
//!
//! The propagation tool reads positional flags, so the order below is part of
//! its contract.

use std::path::Path;

use towercast_core::models::CoverageRequest;

/// Extension the propagation tool appends to its raster output
pub const RASTER_EXTENSION: &str = "ppm";

/// Extension of the converted image served to clients
pub const IMAGE_EXTENSION: &str = "png";

/// Build the propagation tool invocation for `request`
pub fn tool_args(request: &CoverageRequest, sdf_dir: &Path, output: &Path) -> Vec<String> {
    vec![
        "-sdf".to_string(),
        sdf_dir.display().to_string(),
        "-lat".to_string(),
        request.latitude.clone(),
        "-lon".to_string(),
        request.longitude.clone(),
        "-txh".to_string(),
        request.tx_height.clone(),
        "-f".to_string(),
        request.frequency.clone(),
        "-erp".to_string(),
        request.erp.clone(),
        "-rxh".to_string(),
        request.rx_height.clone(),
        "-rt".to_string(),
        request.rt.clone(),
        "-o".to_string(),
        output.display().to_string(),
        "-R".to_string(),
        request.radius.clone(),
        "-res".to_string(),
        request.resolution.clone(),
        "-pm".to_string(),
        request.propagation_model.clone(),
    ]
}

/// Build the converter invocation: `<output>.ppm <output>.png`
pub fn converter_args(output: &Path) -> Vec<String> {
    let base = output.display();
    vec![format!("{base}.{RASTER_EXTENSION}"), format!("{base}.{IMAGE_EXTENSION}")]
}
