//! Pipeline orchestration: load, normalize, index, join, group, write.

use crate::crs::normalize_crs;
use crate::error::SplitError;
use crate::feature::FeatureSet;
use crate::geojson_io::{load_feature_set, write_feature_set};
use crate::group::group_by_region;
use crate::index::RegionIndex;
use crate::join::join_faults_to_regions;
use crate::slug::slugify;
use log::{info, warn};
use std::fs::create_dir_all;
use std::path::PathBuf;

/// Explicit run configuration. There is no process-wide state; everything
/// the pipeline needs arrives through this value.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// GeoJSON file with fault line features.
    pub faults_path: PathBuf,
    /// GeoJSON file with region boundary polygons.
    pub regions_path: PathBuf,
    /// Directory receiving one GeoJSON file per region.
    pub output_dir: PathBuf,
    /// Region attribute field holding the region display name.
    pub region_name_field: String,
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SplitSummary {
    pub faults_loaded: usize,
    pub regions_loaded: usize,
    pub pairs_joined: usize,
    pub groups_written: usize,
    /// Join records discarded over an invalid region-name value.
    pub invalid_name_records: usize,
    /// Regions whose output file failed to write.
    pub failed_writes: usize,
}

/// Run the whole pipeline.
///
/// Fatal misconfigurations (unreadable input, unknown region-name field,
/// unresolvable CRS) return `Err`. Per-record issues are logged, counted in
/// the summary and never abort the run — a fault intersecting no region and
/// a run producing zero output files are both success cases.
pub fn split_faults_by_region(config: &SplitConfig) -> Result<SplitSummary, SplitError> {
    create_dir_all(&config.output_dir).map_err(|e| SplitError::OutputDir {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let mut faults = load_feature_set(&config.faults_path)?;
    let mut regions = load_feature_set(&config.regions_path)?;
    validate_region_field(&regions, &config.region_name_field)?;

    normalize_crs(&mut faults, &mut regions)?;

    let index = RegionIndex::build(&regions);
    info!("Indexed {} region bounding boxes", index.len());

    let records = join_faults_to_regions(&faults, &regions, &index);
    info!("Spatial join complete: {} fault/region pairs", records.len());

    let (groups, diagnostics) =
        group_by_region(&records, &faults, &regions, &config.region_name_field);
    info!("Found {} regions with associated fault data", groups.len());

    let mut groups_written = 0;
    let mut failed_writes = 0;
    for group in &groups {
        let file_name = format!("faults_{}.geojson", slugify(&group.name));
        let path = config.output_dir.join(file_name);
        match write_feature_set(&path, &group.features) {
            Ok(()) => {
                info!(
                    "Wrote {} faults for '{}' to {}",
                    group.features.len(),
                    group.name,
                    path.display()
                );
                groups_written += 1;
            }
            Err(e) => {
                warn!("Skipping region '{}': {}", group.name, e);
                failed_writes += 1;
            }
        }
    }

    let summary = SplitSummary {
        faults_loaded: faults.len(),
        regions_loaded: regions.len(),
        pairs_joined: records.len(),
        groups_written,
        invalid_name_records: diagnostics.invalid_name_records,
        failed_writes,
    };
    info!(
        "Run complete: {} faults, {} regions, {} pairs, {} files written, {} records discarded, {} write failures",
        summary.faults_loaded,
        summary.regions_loaded,
        summary.pairs_joined,
        summary.groups_written,
        summary.invalid_name_records,
        summary.failed_writes
    );
    Ok(summary)
}

// Fail before the slow join when the configured region-name field exists on
// no region feature; the error carries the available field names so the
// caller can correct the configuration. Zero regions is not an error.
fn validate_region_field(regions: &FeatureSet, field: &str) -> Result<(), SplitError> {
    if regions.is_empty() || regions.has_field(field) {
        return Ok(());
    }
    Err(SplitError::MissingRegionField {
        field: field.to_string(),
        available: regions.field_names(),
    })
}
