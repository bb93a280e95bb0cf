//! In-memory feature model shared by the fault and region datasets.

use geo::Geometry;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Attribute mapping of a single feature.
pub type Properties = Map<String, Value>;

/// One record: a geometry plus its attribute mapping.
#[derive(Debug, Clone)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub properties: Properties,
}

/// An ordered collection of features sharing one coordinate reference system.
///
/// `crs` may be `None` straight off disk; after normalization both datasets
/// carry the same identifier.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub features: Vec<Feature>,
    pub crs: Option<String>,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// True if at least one feature carries the given attribute field.
    pub fn has_field(&self, name: &str) -> bool {
        self.features
            .iter()
            .any(|feature| feature.properties.contains_key(name))
    }

    /// Sorted union of attribute field names across all features.
    pub fn field_names(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for feature in &self.features {
            for key in feature.properties.keys() {
                names.insert(key.clone());
            }
        }
        names.into_iter().collect()
    }
}
