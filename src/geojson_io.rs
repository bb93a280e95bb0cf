//! GeoJSON loading and writing.
//!
//! The codec boundary of the pipeline: files in, files out. Geometry kinds
//! the join can work with (LineString, MultiLineString, Polygon,
//! MultiPolygon) are converted to `geo` types; anything else is skipped with
//! a counted diagnostic rather than an error.

use crate::crs::DEFAULT_CRS;
use crate::error::SplitError;
use crate::feature::{Feature, FeatureSet};
use geo::{Geometry, LineString, MultiLineString, MultiPolygon, Polygon};
use geojson::{
    Feature as GeoJsonFeature, FeatureCollection, GeoJson, Geometry as GeoJsonGeometry,
    Value as GeoJsonValue,
};
use log::{info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a GeoJSON FeatureCollection into a [`FeatureSet`].
pub fn load_feature_set(path: &Path) -> Result<FeatureSet, SplitError> {
    info!("Loading file: {}", path.display());
    let file = File::open(path).map_err(|e| SplitError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let reader = BufReader::new(file);

    let geojson = GeoJson::from_reader(reader).map_err(|e| SplitError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => {
            return Err(SplitError::Load {
                path: path.to_path_buf(),
                message: "expected a FeatureCollection".to_string(),
            })
        }
    };

    let crs = collection_crs(&collection);
    let total_features = collection.features.len();
    info!("Found {} features in file", total_features);

    let mut features = Vec::with_capacity(total_features);
    let mut skipped = 0usize;
    for (feature_count, feature) in collection.features.into_iter().enumerate() {
        if (feature_count + 1) % 1000 == 0 {
            info!("Reading feature {}/{}", feature_count + 1, total_features);
        }
        let properties = feature.properties.unwrap_or_default();
        match feature.geometry.and_then(|g| geometry_from_geojson(g.value)) {
            Some(geometry) => features.push(Feature {
                geometry,
                properties,
            }),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(
            "Skipped {} features with missing or unsupported geometry in {}",
            skipped,
            path.display()
        );
    }
    info!("Loaded {} features from {}", features.len(), path.display());

    Ok(FeatureSet { features, crs })
}

/// Serialize features to a GeoJSON FeatureCollection file.
pub fn write_feature_set(path: &Path, features: &[Feature]) -> Result<(), SplitError> {
    let geojson_features: Vec<GeoJsonFeature> = features
        .iter()
        .map(|feature| GeoJsonFeature {
            bbox: None,
            geometry: geometry_to_geojson(&feature.geometry),
            id: None,
            properties: Some(feature.properties.clone()),
            foreign_members: None,
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features: geojson_features,
        foreign_members: None,
    };

    let file = File::create(path).map_err(|e| SplitError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::to_writer_pretty(file, &collection).map_err(|e| SplitError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

// Legacy GeoJSON "crs" member: {"type": "name", "properties": {"name": ...}}.
// The OGC CRS84 URN is the GeoJSON default in lon/lat order, so it reads as
// the default identifier.
fn collection_crs(collection: &FeatureCollection) -> Option<String> {
    let name = collection
        .foreign_members
        .as_ref()?
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()?;
    if name == "urn:ogc:def:crs:OGC:1.3:CRS84" {
        Some(DEFAULT_CRS.to_string())
    } else {
        Some(name.to_string())
    }
}

fn geometry_from_geojson(value: GeoJsonValue) -> Option<Geometry<f64>> {
    match value {
        GeoJsonValue::LineString(coords) => Some(Geometry::LineString(line_from_coords(&coords))),
        GeoJsonValue::MultiLineString(lines) => Some(Geometry::MultiLineString(
            MultiLineString::new(lines.iter().map(|coords| line_from_coords(coords)).collect()),
        )),
        GeoJsonValue::Polygon(rings) => polygon_from_rings(&rings).map(Geometry::Polygon),
        GeoJsonValue::MultiPolygon(polygons) => {
            let polygons: Vec<Polygon<f64>> = polygons
                .iter()
                .filter_map(|rings| polygon_from_rings(rings))
                .collect();
            if polygons.is_empty() {
                None
            } else {
                Some(Geometry::MultiPolygon(MultiPolygon::new(polygons)))
            }
        }
        _ => None,
    }
}

fn line_from_coords(coords: &[Vec<f64>]) -> LineString<f64> {
    LineString::new(
        coords
            .iter()
            .map(|coord| (coord[0], coord[1]).into())
            .collect(),
    )
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let exterior = line_from_coords(rings.first()?);
    let holes: Vec<LineString<f64>> = rings.iter().skip(1).map(|ring| line_from_coords(ring)).collect();
    Some(Polygon::new(exterior, holes))
}

fn geometry_to_geojson(geometry: &Geometry<f64>) -> Option<GeoJsonGeometry> {
    let value = match geometry {
        Geometry::LineString(line) => GeoJsonValue::LineString(coords_from_line(line)),
        Geometry::MultiLineString(lines) => {
            GeoJsonValue::MultiLineString(lines.iter().map(coords_from_line).collect())
        }
        Geometry::Polygon(polygon) => GeoJsonValue::Polygon(rings_from_polygon(polygon)),
        Geometry::MultiPolygon(polygons) => {
            GeoJsonValue::MultiPolygon(polygons.iter().map(rings_from_polygon).collect())
        }
        _ => return None,
    };
    Some(GeoJsonGeometry::new(value))
}

fn coords_from_line(line: &LineString<f64>) -> Vec<Vec<f64>> {
    line.points().map(|p| vec![p.x(), p.y()]).collect()
}

fn rings_from_polygon(polygon: &Polygon<f64>) -> Vec<Vec<Vec<f64>>> {
    let mut rings = vec![coords_from_line(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(coords_from_line));
    rings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_supported_geometry_kinds() {
        let line = geometry_from_geojson(GeoJsonValue::LineString(vec![
            vec![0.0, 0.0],
            vec![1.0, 1.0],
        ]));
        assert!(matches!(line, Some(Geometry::LineString(_))));

        let multi = geometry_from_geojson(GeoJsonValue::MultiLineString(vec![
            vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            vec![vec![2.0, 2.0], vec![3.0, 3.0]],
        ]));
        assert!(matches!(multi, Some(Geometry::MultiLineString(_))));

        let polygon = geometry_from_geojson(GeoJsonValue::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ]]));
        assert!(matches!(polygon, Some(Geometry::Polygon(_))));
    }

    #[test]
    fn rejects_unsupported_geometry_kinds() {
        assert!(geometry_from_geojson(GeoJsonValue::Point(vec![1.0, 2.0])).is_none());
        assert!(geometry_from_geojson(GeoJsonValue::Polygon(vec![])).is_none());
    }

    #[test]
    fn reads_legacy_crs_member() {
        let mut foreign = serde_json::Map::new();
        foreign.insert(
            "crs".to_string(),
            json!({"type": "name", "properties": {"name": "EPSG:32633"}}),
        );
        let collection = FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: Some(foreign),
        };
        assert_eq!(collection_crs(&collection).as_deref(), Some("EPSG:32633"));
    }

    #[test]
    fn crs84_urn_reads_as_default() {
        let mut foreign = serde_json::Map::new();
        foreign.insert(
            "crs".to_string(),
            json!({"type": "name", "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}}),
        );
        let collection = FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: Some(foreign),
        };
        assert_eq!(collection_crs(&collection).as_deref(), Some(DEFAULT_CRS));
    }

    #[test]
    fn written_file_loads_back_with_attributes() {
        let mut properties = serde_json::Map::new();
        properties.insert("name".to_string(), json!("alpha fault"));
        properties.insert("slip_rate".to_string(), json!(2.5));
        let feature = Feature {
            geometry: Geometry::LineString(LineString::new(vec![
                (0.0, 0.0).into(),
                (1.0, 2.0).into(),
            ])),
            properties,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.geojson");
        write_feature_set(&path, &[feature.clone()]).unwrap();

        let loaded = load_feature_set(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.features[0].properties, feature.properties);
        assert_eq!(loaded.features[0].geometry, feature.geometry);
        assert!(loaded.crs.is_none());
    }

    #[test]
    fn non_collection_input_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feature.geojson");
        std::fs::write(
            &path,
            r#"{"type": "Feature", "geometry": null, "properties": {}}"#,
        )
        .unwrap();
        assert!(matches!(
            load_feature_set(&path),
            Err(SplitError::Load { .. })
        ));
    }
}
