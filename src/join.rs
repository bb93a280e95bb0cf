//! Fault-to-region intersection join.

use crate::feature::FeatureSet;
use crate::index::RegionIndex;
use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::intersects::Intersects;
use log::info;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One fault/region pairing produced by the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinRecord {
    /// Row of the fault in the fault feature set.
    pub fault_row: usize,
    /// Row of the region in the region feature set.
    pub region_row: usize,
}

/// Pair every fault with every region whose geometry it intersects.
///
/// Candidates come from the bounding-box index and are confirmed with an
/// exact intersects test — boundary touches and full containment count. A
/// fault intersecting k regions yields k records; a fault intersecting none
/// yields nothing and silently drops out of all outputs.
///
/// Faults are processed in parallel; the merged records are sorted by
/// (fault row, region row) afterwards, so the result is identical across
/// runs and thread schedules.
pub fn join_faults_to_regions(
    faults: &FeatureSet,
    regions: &FeatureSet,
    index: &RegionIndex,
) -> Vec<JoinRecord> {
    let total = faults.features.len();
    let progress_interval = (total / 20).max(1);
    let processed = AtomicUsize::new(0);

    let mut records: Vec<JoinRecord> = faults
        .features
        .par_iter()
        .enumerate()
        .flat_map_iter(|(fault_row, fault)| {
            let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % progress_interval == 0 {
                info!(
                    "Join progress: {:.1}% ({}/{})",
                    (done as f64 / total as f64) * 100.0,
                    done,
                    total
                );
            }

            let candidates = match fault.geometry.bounding_rect() {
                Some(bbox) => index.candidates(&bbox),
                None => Vec::new(),
            };
            candidates
                .into_iter()
                .filter(|&region_row| {
                    fault
                        .geometry
                        .intersects(&regions.features[region_row].geometry)
                })
                .map(move |region_row| JoinRecord {
                    fault_row,
                    region_row,
                })
                .collect::<Vec<_>>()
        })
        .collect();

    // Thread scheduling scrambles emission order; restore input order.
    records.sort_unstable_by_key(|record| (record.fault_row, record.region_row));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Feature;
    use geo::{Geometry, LineString, Polygon};

    fn line(points: &[(f64, f64)]) -> Feature {
        Feature {
            geometry: Geometry::LineString(LineString::new(
                points.iter().map(|&p| p.into()).collect(),
            )),
            properties: Default::default(),
        }
    }

    fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Feature {
        let exterior = LineString::new(vec![
            (min_x, min_y).into(),
            (max_x, min_y).into(),
            (max_x, max_y).into(),
            (min_x, max_y).into(),
            (min_x, min_y).into(),
        ]);
        Feature {
            geometry: Geometry::Polygon(Polygon::new(exterior, vec![])),
            properties: Default::default(),
        }
    }

    fn record(fault_row: usize, region_row: usize) -> JoinRecord {
        JoinRecord {
            fault_row,
            region_row,
        }
    }

    #[test]
    fn border_crossing_fault_pairs_with_both_regions() {
        let regions = FeatureSet {
            features: vec![square(0.0, 0.0, 10.0, 10.0), square(10.0, 0.0, 20.0, 10.0)],
            crs: None,
        };
        let faults = FeatureSet {
            // Crosses the shared border, fully inside one region, fully
            // outside everything, touching a boundary at one endpoint.
            features: vec![
                line(&[(8.0, 5.0), (12.0, 5.0)]),
                line(&[(14.0, 2.0), (16.0, 4.0)]),
                line(&[(40.0, 40.0), (45.0, 45.0)]),
                line(&[(-2.0, 5.0), (0.0, 5.0)]),
            ],
            crs: None,
        };
        let index = RegionIndex::build(&regions);

        let records = join_faults_to_regions(&faults, &regions, &index);
        assert_eq!(
            records,
            vec![record(0, 0), record(0, 1), record(1, 1), record(3, 0)]
        );
    }

    #[test]
    fn fault_contained_by_region_counts_as_intersecting() {
        let regions = FeatureSet {
            features: vec![square(0.0, 0.0, 100.0, 100.0)],
            crs: None,
        };
        let faults = FeatureSet {
            features: vec![line(&[(10.0, 10.0), (20.0, 20.0)])],
            crs: None,
        };
        let index = RegionIndex::build(&regions);
        let records = join_faults_to_regions(&faults, &regions, &index);
        assert_eq!(records, vec![record(0, 0)]);
    }

    #[test]
    fn bbox_candidate_without_real_intersection_is_filtered() {
        // Diagonal line on x + y = 4.5: its bbox covers the whole square,
        // but the geometry passes beyond the (2, 2) corner.
        let regions = FeatureSet {
            features: vec![square(0.0, 0.0, 2.0, 2.0)],
            crs: None,
        };
        let index = RegionIndex::build(&regions);
        let faults = FeatureSet {
            features: vec![line(&[(5.5, -1.0), (-1.0, 5.5)])],
            crs: None,
        };
        assert!(!index
            .candidates(&faults.features[0].geometry.bounding_rect().unwrap())
            .is_empty());
        let records = join_faults_to_regions(&faults, &regions, &index);
        assert!(records.is_empty());
    }

    #[test]
    fn zero_faults_or_zero_regions_join_to_nothing() {
        let empty = FeatureSet {
            features: vec![],
            crs: None,
        };
        let faults = FeatureSet {
            features: vec![line(&[(0.0, 0.0), (1.0, 1.0)])],
            crs: None,
        };
        let index = RegionIndex::build(&empty);
        assert!(join_faults_to_regions(&faults, &empty, &index).is_empty());
        assert!(join_faults_to_regions(&empty, &empty, &index).is_empty());
    }

    #[test]
    fn record_order_is_deterministic_across_runs() {
        let regions = FeatureSet {
            features: (0..8)
                .map(|i| square(i as f64 * 10.0, 0.0, i as f64 * 10.0 + 10.0, 10.0))
                .collect(),
            crs: None,
        };
        let faults = FeatureSet {
            features: (0..50)
                .map(|i| {
                    let x = (i % 8) as f64 * 10.0 + 5.0;
                    line(&[(x - 6.0, 5.0), (x + 6.0, 5.0)])
                })
                .collect(),
            crs: None,
        };
        let index = RegionIndex::build(&regions);

        let first = join_faults_to_regions(&faults, &regions, &index);
        let second = join_faults_to_regions(&faults, &regions, &index);
        assert_eq!(first, second);
        assert!(first
            .windows(2)
            .all(|w| (w[0].fault_row, w[0].region_row) < (w[1].fault_row, w[1].region_row)));
    }
}
