use context_foreman::cache::{DensityCache, KernelKey};
use context_foreman::grid::{BoundingBox, DensityGrid};
use context_foreman::kde::GaussianKde;
use context_foreman::{select_window, GeoPoint, WindowBoundary};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

const TOLERANCE: f64 = 1e-9;

fn boundaries_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1_000i64..90_000, 1..16)
}

fn cloud_strategy() -> impl Strategy<Value = Vec<GeoPoint>> {
    prop::collection::vec((41.6f64..42.1, -87.9f64..-87.5), 3..24)
        .prop_map(|coords| coords.into_iter().map(GeoPoint::from).collect::<Vec<_>>())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn selected_window_is_latest_start_not_after_query(
        values in boundaries_strategy(),
        query in -2_000.0f64..100_000.0,
    ) {
        let boundaries: Vec<WindowBoundary> = values.iter().copied().map(WindowBoundary::new).collect();
        let selected = select_window(boundaries.clone(), query).unwrap();
        let smallest = *boundaries.iter().min().unwrap();

        prop_assert!(boundaries.contains(&selected));
        if (smallest.value() as f64) <= query {
            prop_assert!(selected.value() as f64 <= query);
            prop_assert!(!boundaries
                .iter()
                .any(|b| *b > selected && b.value() as f64 <= query));
        } else {
            prop_assert_eq!(selected, smallest);
        }
    }

    #[test]
    fn selection_ignores_boundary_order(
        mut values in boundaries_strategy(),
        query in -2_000.0f64..100_000.0,
    ) {
        let forward = select_window(values.iter().copied().map(WindowBoundary::new), query);
        values.reverse();
        let backward = select_window(values.iter().copied().map(WindowBoundary::new), query);

        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn normalized_scores_span_unit_range_on_grid(points in cloud_strategy()) {
        let kernel = GaussianKde::fit(&points);
        prop_assume!(kernel.is_ok());
        let kernel = kernel.unwrap();

        let key = KernelKey::new("chicago_crimes", "unknown", WindowBoundary::new(0));
        let mut cache = DensityCache::new(40);
        prop_assert!(cache.ensure_fitted(&points, &key));

        let bounds = BoundingBox::of(&points).unwrap();
        let mut grid = DensityGrid::new(&bounds, 40);
        grid.fill(|node| kernel.pdf(node));

        let peak = cache.score_at(grid.argmax().unwrap(), &key);
        let trough = cache.score_at(grid.argmin().unwrap(), &key);
        prop_assert!((peak - 1.0).abs() < TOLERANCE);
        prop_assert!(trough.abs() < TOLERANCE);

        for ((x, y), _) in grid.iter() {
            let score = cache.score_at(grid.node(x, y), &key);
            prop_assert!((-TOLERANCE..=1.0 + TOLERANCE).contains(&score));
        }
    }
}
