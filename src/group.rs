//! Grouping of join records by region identity.

use crate::feature::{Feature, FeatureSet};
use crate::join::JoinRecord;
use log::warn;
use serde_json::Value;
use std::collections::HashMap;

/// Attribute fields that exist only as join bookkeeping and must never leak
/// into per-region output. Enumerated explicitly so the filter does not rely
/// on name-prefix conventions.
pub const JOIN_ARTIFACT_FIELDS: &[&str] = &["region_row", "index_right"];

/// All faults assigned to one region, in join order.
#[derive(Debug, Clone)]
pub struct RegionGroup {
    /// Raw region display name, pre-slug.
    pub name: String,
    pub features: Vec<Feature>,
}

/// Per-record issues encountered while grouping.
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupDiagnostics {
    /// Join records discarded because the region name was missing, non-text
    /// or blank.
    pub invalid_name_records: usize,
}

/// Group join records by the value of the region-name attribute field.
///
/// Groups appear in first-appearance order; two region rows sharing a name
/// merge into one group. A region whose name value is absent, non-text or
/// blank loses all its records with a logged diagnostic — never fatally.
/// Each grouped feature is a sanitized copy of its fault.
pub fn group_by_region(
    records: &[JoinRecord],
    faults: &FeatureSet,
    regions: &FeatureSet,
    region_field: &str,
) -> (Vec<RegionGroup>, GroupDiagnostics) {
    let mut groups: Vec<RegionGroup> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut diagnostics = GroupDiagnostics::default();

    for record in records {
        let region = &regions.features[record.region_row];
        let name = match region.properties.get(region_field).and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                warn!(
                    "Discarding fault {} paired with region {}: invalid '{}' value",
                    record.fault_row, record.region_row, region_field
                );
                diagnostics.invalid_name_records += 1;
                continue;
            }
        };

        let slot = match slots.get(name) {
            Some(&slot) => slot,
            None => {
                slots.insert(name.to_string(), groups.len());
                groups.push(RegionGroup {
                    name: name.to_string(),
                    features: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[slot]
            .features
            .push(sanitize_feature(&faults.features[record.fault_row], region_field));
    }

    (groups, diagnostics)
}

// Copy a fault without the fields the join made redundant: the region-name
// field (the group identity already encodes it) and the enumerated artifact
// fields.
fn sanitize_feature(fault: &Feature, region_field: &str) -> Feature {
    let mut feature = fault.clone();
    feature.properties.remove(region_field);
    for field in JOIN_ARTIFACT_FIELDS {
        feature.properties.remove(*field);
    }
    feature
}
