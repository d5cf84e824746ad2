//! Towercast Coverage - RF propagation job pipeline
//!
//! This crate turns a [`CoverageRequest`](towercast_core::models::CoverageRequest)
//! into an invocation of the external propagation tool, reads the bounding box
//! it prints, and hands the raster to the image converter.

pub mod adapters;
pub mod bbox;
pub mod job;
pub mod pipeline;

pub use adapters::{TempFileAllocator, TokioProcessExecutor};
pub use bbox::parse_bounding_box;
pub use job::{converter_args, tool_args};
pub use pipeline::CoveragePipeline;
