//! Road-name normalization and feed matching.
//!
//! The geocoder, the map-data service and the traffic feed all spell
//! road names differently (full-width digits, embedded prefixes, bare
//! route numbers). Matching therefore happens on a canonical form: NFKC
//! normalization followed by extraction of the `<digits>号` route-number
//! pattern when one is present.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::feed::{FeedFeature, FeedPayload};

static ROAD_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+号").expect("road number pattern is valid"));

/// Canonicalize a road-name string.
///
/// Applies Unicode compatibility normalization (NFKC), then returns the
/// first `<digits>号` match if the name contains one, otherwise the
/// normalized name unchanged. Idempotent.
pub fn normalize_road_name(name: &str) -> String {
    let normalized: String = name.nfkc().collect();
    match ROAD_NUMBER_PATTERN.find(&normalized) {
        Some(code) => code.as_str().to_string(),
        None => normalized,
    }
}

/// Filter feed features whose route name canonicalizes to exactly
/// `canonical`.
///
/// Both sides pass through [`normalize_road_name`] before comparison;
/// matching is exact string equality, not substring or fuzzy matching.
/// The result may be empty.
pub fn match_features(canonical: &str, payload: &FeedPayload) -> Vec<FeedFeature> {
    let canonical = normalize_road_name(canonical);
    payload
        .features
        .iter()
        .filter(|feature| {
            feature
                .properties
                .route_name
                .as_deref()
                .is_some_and(|name| normalize_road_name(name) == canonical)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedProperties;

    fn payload_with_routes(names: &[&str]) -> FeedPayload {
        FeedPayload {
            features: names
                .iter()
                .map(|name| FeedFeature {
                    geometry: None,
                    properties: FeedProperties {
                        route_name: Some((*name).to_string()),
                        ..Default::default()
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn extracts_route_number_anywhere_in_string() {
        assert_eq!(normalize_road_name("国道123号線"), "123号");
        assert_eq!(normalize_road_name("123号"), "123号");
    }

    #[test]
    fn full_width_digits_normalize_before_extraction() {
        assert_eq!(normalize_road_name("１２３号"), "123号");
    }

    #[test]
    fn names_without_pattern_pass_through() {
        assert_eq!(normalize_road_name("中央通り"), "中央通り");
    }

    #[test]
    fn normalization_is_idempotent() {
        for name in ["国道１２３号線", "中央通り", "123号", "Ｙasukuni"] {
            let once = normalize_road_name(name);
            assert_eq!(normalize_road_name(&once), once);
        }
    }

    #[test]
    fn matches_on_exact_canonical_equality() {
        let payload = payload_with_routes(&["国道123号", "124号", "中央通り"]);
        let matched = match_features("123号", &payload);
        assert_eq!(matched.len(), 1);
        assert_eq!(
            matched[0].properties.route_name.as_deref(),
            Some("国道123号")
        );
    }

    #[test]
    fn near_miss_numbers_do_not_match() {
        let payload = payload_with_routes(&["124号"]);
        assert!(match_features("123号", &payload).is_empty());
    }

    #[test]
    fn canonical_side_is_normalized_too() {
        let payload = payload_with_routes(&["123号"]);
        assert_eq!(match_features("国道１２３号線", &payload).len(), 1);
    }

    #[test]
    fn features_without_route_name_never_match() {
        let payload = FeedPayload {
            features: vec![FeedFeature {
                geometry: None,
                properties: FeedProperties::default(),
            }],
        };
        assert!(match_features("123号", &payload).is_empty());
    }
}
