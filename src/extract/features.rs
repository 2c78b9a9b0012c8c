//! DISM feature list and detail output.

use std::collections::BTreeMap;

use super::{capture, capture_pair, Field};
use crate::error::{DetectError, Result};
use crate::records::{Category, FeatureRecord};

/// A feature as it appears in the list output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFeature {
    pub name: String,
    pub state: Option<String>,
}

/// Parse `/get-features /format:list` output into names and states.
///
/// Each `State` line belongs to the `Feature Name` line before it. Output
/// with no feature names at all is an `ExtractionMismatch`.
pub fn parse_feature_list(output: &str) -> Result<Vec<ListedFeature>> {
    let mut features: Vec<ListedFeature> = Vec::new();

    for line in output.lines() {
        if let Some(name) = capture(Field::FeatureName, line) {
            features.push(ListedFeature { name, state: None });
        } else if let Some(state) = capture(Field::FeatureState, line) {
            if let Some(last) = features.last_mut() {
                last.state = Some(state);
            }
        }
    }

    if features.is_empty() {
        return Err(DetectError::ExtractionMismatch {
            category: Category::WindowsFeatures.to_string(),
            field: format!("{:?}", Field::FeatureName),
        });
    }
    Ok(features)
}

/// Every `key : value` line of a detail output.
pub fn parse_feature_details(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter_map(|line| capture_pair(Field::DetailLine, line))
        .collect()
}

/// Whether a DISM state string means the feature is on.
pub fn is_enabled(state: &str) -> bool {
    state.trim().eq_ignore_ascii_case("Enabled")
}

/// Build the record for one feature.
///
/// The state in `detail` wins over the list state; without a detail output
/// the record has no details.
pub fn feature_record(listed: &ListedFeature, detail: Option<&str>) -> FeatureRecord {
    let details = detail.map(parse_feature_details).unwrap_or_default();
    let state = detail
        .and_then(|text| capture(Field::FeatureState, text))
        .or_else(|| listed.state.clone());

    FeatureRecord {
        name: listed.name.clone(),
        installed: state.as_deref().is_some_and(is_enabled),
        details,
    }
}
