//! Splits geological fault traces into per-region GeoJSON files.
//!
//! Each fault line is assigned to every region polygon its geometry
//! intersects. Regions are indexed with an R-tree and reprojected onto the
//! fault CRS when the two datasets disagree. Output files are named from a
//! sanitized region slug; two region names collapsing to the same slug
//! overwrite each other (last write wins).

pub mod crs;
pub mod error;
pub mod feature;
pub mod geojson_io;
pub mod group;
pub mod index;
pub mod join;
pub mod slug;
pub mod splitter;

pub use error::SplitError;
pub use feature::{Feature, FeatureSet};
pub use splitter::{split_faults_by_region, SplitConfig, SplitSummary};
