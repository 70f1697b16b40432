use crate::cache::*;
use crate::context::*;
use crate::location::*;
use log::*;

/// Normalized density scores of one sub-type's kernel at both segment
/// endpoints, or nothing when the resolved window is empty or unfittable.
fn subtype_scores(
    cache: &mut DensityCache,
    category: &Category,
    subtype: &str,
    windows: &WindowedPoints,
    segment: (GeoPoint, GeoPoint),
    query_time: f64,
) -> Vec<f64> {
    let (window, points) = match windows.resolve(query_time) {
        Some(resolved) => resolved,
        None => return Vec::new(),
    };

    trace!(
        "{}/{}: query_time={} resolved to window {} ({} points)",
        category.key(),
        subtype,
        query_time,
        window,
        points.len()
    );

    if points.is_empty() {
        return Vec::new();
    }

    let key = KernelKey::new(category.key(), subtype, window);
    if !cache.ensure_fitted(points, &key) {
        return Vec::new();
    }

    let (start, end) = segment;
    vec![cache.score_at(start, &key), cache.score_at(end, &key)]
}

/// Score of one category for the segment `start -> end` at `query_time`.
///
/// The maximum over both endpoints of every sub-type, seeded with 0: a
/// segment is in context when either endpoint lies in a dense region of
/// any sub-type.
pub fn score_category(
    cache: &mut DensityCache,
    category: &Category,
    start: GeoPoint,
    end: GeoPoint,
    query_time: f64,
) -> f64 {
    let mut score = 0.0f64;

    for (subtype, windows) in category.shape().subtypes() {
        for endpoint_score in
            subtype_scores(cache, category, subtype, windows, (start, end), query_time)
        {
            score = score.max(endpoint_score);
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::window::*;

    const STORE: &str = r#"{
        "chicago_crimes": {
            "theft": {
                "0": [[0.0, 0.0], [1.0, 0.2], [0.3, 1.1], [-0.4, 0.6], [0.8, -0.7]],
                "100": []
            },
            "battery": {
                "0": [[5.0, 5.0], [6.0, 5.2], [5.3, 6.1], [4.6, 5.6], [5.8, 4.3]]
            }
        },
        "chicago_crashes": {
            "unknown": {
                "0": [[2.0, 2.0], [2.0, 2.0], [2.0, 2.0]],
                "50": [[0.0, 0.0], [1.0, 0.2], [0.3, 1.1], [-0.4, 0.6], [0.8, -0.7]]
            }
        }
    }"#;

    fn store() -> ContextStore {
        ContextStore::from_json_str("chicago", "sunday", STORE).unwrap()
    }

    #[test]
    fn takes_max_over_subtypes_and_endpoints() {
        let store = store();
        let crimes = store.category("chicago_crimes").unwrap();
        let mut cache = DensityCache::default();

        let start = GeoPoint::new(0.3, 0.2);
        let end = GeoPoint::new(5.3, 5.2);
        let score = score_category(&mut cache, crimes, start, end, 10.0);

        let theft = KernelKey::new("chicago_crimes", "theft", WindowBoundary::new(0));
        let battery = KernelKey::new("chicago_crimes", "battery", WindowBoundary::new(0));
        let expected = [
            cache.score_at(start, &theft),
            cache.score_at(end, &theft),
            cache.score_at(start, &battery),
            cache.score_at(end, &battery),
        ]
        .into_iter()
        .fold(0.0f64, f64::max);

        assert_eq!(cache.len(), 2);
        assert_eq!(score, expected);
        assert!(score > 0.5);
    }

    #[test]
    fn empty_window_scores_zero() {
        let store = store();
        let crimes = store.category("chicago_crimes").unwrap();
        let mut cache = DensityCache::default();

        // theft resolves to the empty "100" window; battery is far away.
        let score = score_category(
            &mut cache,
            crimes,
            GeoPoint::new(-50.0, -50.0),
            GeoPoint::new(-50.0, -50.0),
            150.0,
        );

        assert_eq!(cache.len(), 1);
        assert!(score.abs() < 1e-9);
    }

    #[test]
    fn singular_window_contributes_nothing() {
        let store = store();
        let crashes = store.category("chicago_crashes").unwrap();
        let mut cache = DensityCache::default();

        let at = GeoPoint::new(2.0, 2.0);
        assert_eq!(score_category(&mut cache, crashes, at, at, 10.0), 0.0);
        assert!(cache.is_empty());

        let score = score_category(&mut cache, crashes, GeoPoint::new(0.3, 0.2), at, 60.0);
        let key = KernelKey::new("chicago_crashes", UNKNOWN_SUBTYPE, WindowBoundary::new(50));
        assert!(cache.get(&key).is_some());
        assert!(score > 0.0);
    }
}
