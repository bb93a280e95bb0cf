//! Error types for the fault splitting pipeline.
//!
//! Only fatal misconfigurations appear here. Per-record issues (an invalid
//! region name, one region file failing to write) are logged and counted in
//! the run summary instead of aborting the run.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline errors.
#[derive(Error, Debug)]
pub enum SplitError {
    /// A dataset could not be opened or parsed.
    #[error("failed to load {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },

    /// The configured region-name field exists on no region feature.
    #[error(
        "region name field '{field}' not found in region data; available fields: {}",
        .available.join(", ")
    )]
    MissingRegionField { field: String, available: Vec<String> },

    /// A CRS identifier pair could not be resolved to a transform.
    #[error("cannot build transform from '{from}' to '{to}': {message}")]
    CrsTransform {
        from: String,
        to: String,
        message: String,
    },

    /// A region geometry failed to reproject.
    #[error("reprojection from '{from}' to '{to}' failed: {message}")]
    Reproject {
        from: String,
        to: String,
        message: String,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An output file could not be written. Recoverable at the run level:
    /// the pipeline logs it and continues with the remaining regions.
    #[error("failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}
