//! Bounding-box index over region geometries.

use crate::feature::FeatureSet;
use geo::algorithm::bounding_rect::BoundingRect;
use geo::Rect;
use rstar::{RTree, RTreeObject, AABB};

// R-tree entry: one region row and its axis-aligned bounds.
struct RegionEnvelope {
    row: usize,
    env: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.env
    }
}

/// Read-only spatial index mapping a query box to candidate region rows.
///
/// Built once from the normalized region set, queried for every fault.
/// Candidate lists are a conservative superset: bounding boxes overlap, the
/// geometries may not — callers follow up with exact intersection tests.
pub struct RegionIndex {
    tree: RTree<RegionEnvelope>,
    indexed: usize,
}

impl RegionIndex {
    /// Build the index. Regions without a computable bounding box (empty
    /// geometries) are left out and can never match.
    pub fn build(regions: &FeatureSet) -> Self {
        let envelopes: Vec<RegionEnvelope> = regions
            .features
            .iter()
            .enumerate()
            .filter_map(|(row, feature)| {
                feature.geometry.bounding_rect().map(|rect| RegionEnvelope {
                    row,
                    env: aabb_from_rect(&rect),
                })
            })
            .collect();
        let indexed = envelopes.len();
        Self {
            tree: RTree::bulk_load(envelopes),
            indexed,
        }
    }

    /// Number of indexed regions.
    pub fn len(&self) -> usize {
        self.indexed
    }

    pub fn is_empty(&self) -> bool {
        self.indexed == 0
    }

    /// Region rows whose bounds overlap the query box, sorted ascending.
    pub fn candidates(&self, query: &Rect<f64>) -> Vec<usize> {
        let envelope = aabb_from_rect(query);
        let mut rows: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.row)
            .collect();
        rows.sort_unstable();
        rows
    }
}

fn aabb_from_rect(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [rect.min().x, rect.min().y],
        [rect.max().x, rect.max().y],
    )
}
