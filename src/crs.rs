//! Coordinate reference normalization.

use crate::error::SplitError;
use crate::feature::FeatureSet;
use geo::algorithm::map_coords::MapCoords;
use log::info;
use proj::Proj;

/// CRS assigned to data that declares none. Region boundary data is assumed
/// geographic WGS84 when its source recorded no projection.
pub const DEFAULT_CRS: &str = "EPSG:4326";

/// Bring both datasets onto one CRS.
///
/// Either side missing an identifier gets [`DEFAULT_CRS`]. If the
/// identifiers still differ, region geometries are reprojected into the
/// fault CRS — faults are authoritative, regions transform, never the
/// reverse. An identifier PROJ cannot resolve is a fatal error.
pub fn normalize_crs(faults: &mut FeatureSet, regions: &mut FeatureSet) -> Result<(), SplitError> {
    if faults.crs.is_none() {
        info!("Fault data carries no CRS, assuming {}", DEFAULT_CRS);
    }
    if regions.crs.is_none() {
        info!("Region data carries no CRS, assuming {}", DEFAULT_CRS);
    }
    let fault_crs = faults
        .crs
        .get_or_insert_with(|| DEFAULT_CRS.to_string())
        .clone();
    let region_crs = regions
        .crs
        .get_or_insert_with(|| DEFAULT_CRS.to_string())
        .clone();

    if fault_crs == region_crs {
        info!("CRS match: {}", fault_crs);
        return Ok(());
    }

    info!(
        "CRS mismatch, reprojecting regions from {} to {}",
        region_crs, fault_crs
    );
    let transform =
        Proj::new_known_crs(&region_crs, &fault_crs, None).map_err(|e| SplitError::CrsTransform {
            from: region_crs.clone(),
            to: fault_crs.clone(),
            message: e.to_string(),
        })?;

    for feature in &mut regions.features {
        feature.geometry = feature
            .geometry
            .try_map_coords(|coord| transform.convert(coord))
            .map_err(|e| SplitError::Reproject {
                from: region_crs.clone(),
                to: fault_crs.clone(),
                message: e.to_string(),
            })?;
    }
    regions.crs = Some(fault_crs);
    info!("Reprojection complete");

    Ok(())
}
