use dbscan::cluster::{
    BruteForce, Clustering, Dbscan, DensityClassifier, Euclidean, Expansion, GridIndex, IndexKind,
    PointStore, QueryBuffer, SpatialIndex, NOISE,
};
use proptest::prelude::*;

fn points_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..4).prop_flat_map(|dim| {
        prop::collection::vec(prop::collection::vec(-5.0f64..5.0, dim), 0..80)
    })
}

/// Points within `eps` of point `i`, by exhaustive comparison.
fn brute_neighbors(data: &[Vec<f64>], i: usize, eps: f64) -> Vec<usize> {
    (0..data.len())
        .filter(|&j| {
            let d2: f64 = data[i]
                .iter()
                .zip(&data[j])
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            d2 <= eps * eps
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_repeated_runs_are_identical(
        data in points_strategy(),
        eps in 0.1f64..2.0,
        min_samples in 1usize..8,
    ) {
        let model = Dbscan::new(eps, min_samples);
        let first = model.fit_predict(&data).unwrap();
        let second = model.fit_predict(&data).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_labels_are_contiguous_and_bounded(
        data in points_strategy(),
        eps in 0.1f64..2.0,
        min_samples in 1usize..8,
    ) {
        let fit = Dbscan::new(eps, min_samples).fit(&data).unwrap();
        let k = fit.n_clusters;

        prop_assert_eq!(fit.labels.len(), data.len());
        prop_assert!(k <= data.len());
        if fit.core_sample_indices.is_empty() {
            prop_assert_eq!(k, 0);
        }
        for &l in &fit.labels {
            prop_assert!(l == NOISE || (0..k as i32).contains(&l));
        }

        // Ids follow discovery order: cluster c's first core point precedes
        // cluster c + 1's.
        let mut first_core = vec![usize::MAX; k];
        for &i in &fit.core_sample_indices {
            let c = fit.labels[i] as usize;
            first_core[c] = first_core[c].min(i);
        }
        prop_assert!(first_core.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_self_membership(
        data in points_strategy(),
        eps in 0.1f64..2.0,
    ) {
        let points = PointStore::from_rows(&data).unwrap();
        let grid = GridIndex::build(&points, &Euclidean, eps).unwrap();
        let mut buf = QueryBuffer::new();
        for (i, p) in points.iter().enumerate() {
            grid.range_query(p, eps, &mut buf);
            prop_assert!(buf.hits().binary_search(&i).is_ok());
        }
    }

    #[test]
    fn prop_grid_matches_linear_scan(
        data in points_strategy(),
        eps in 0.05f64..3.0,
        radius_scale in 0.5f64..2.5,
    ) {
        let points = PointStore::from_rows(&data).unwrap();
        let grid = GridIndex::build(&points, &Euclidean, eps).unwrap();
        let brute = BruteForce::new(&points, &Euclidean);
        let radius = eps * radius_scale;
        let (mut a, mut b) = (QueryBuffer::new(), QueryBuffer::new());
        for p in points.iter() {
            grid.range_query(p, radius, &mut a);
            brute.range_query(p, radius, &mut b);
            prop_assert_eq!(a.hits(), b.hits());
        }
    }

    #[test]
    fn prop_core_count_is_monotone_in_min_samples(
        data in points_strategy(),
        eps in 0.1f64..2.0,
        min_samples in 1usize..8,
    ) {
        let points = PointStore::from_rows(&data).unwrap();
        let grid = GridIndex::build(&points, &Euclidean, eps).unwrap();
        let lower = DensityClassifier::classify(&points, &grid, eps, min_samples, false).unwrap();
        let higher = DensityClassifier::classify(&points, &grid, eps, min_samples + 1, false).unwrap();
        prop_assert!(higher.n_core() <= lower.n_core());
        for i in 0..points.len() {
            prop_assert!(!higher.is_core(i) || lower.is_core(i));
        }
    }

    #[test]
    fn prop_noise_is_exactly_the_unreachable_points(
        data in points_strategy(),
        eps in 0.1f64..2.0,
        min_samples in 1usize..8,
    ) {
        let fit = Dbscan::new(eps, min_samples).fit(&data).unwrap();
        let core: Vec<bool> = (0..data.len())
            .map(|i| brute_neighbors(&data, i, eps).len() >= min_samples)
            .collect();
        for i in 0..data.len() {
            prop_assert_eq!(fit.is_core(i), core[i]);
            let near_core = brute_neighbors(&data, i, eps).into_iter().any(|j| core[j]);
            prop_assert_eq!(fit.labels[i] == NOISE, !near_core);
            // A border point takes the label of one of its core neighbors.
            if !core[i] && near_core {
                let l = fit.labels[i];
                prop_assert!(brute_neighbors(&data, i, eps)
                    .into_iter()
                    .any(|j| core[j] && fit.labels[j] == l));
            }
        }
    }

    #[test]
    fn prop_min_samples_one_leaves_no_noise(
        data in points_strategy(),
        eps in 0.01f64..1.0,
    ) {
        let labels = Dbscan::new(eps, 1).fit_predict(&data).unwrap();
        prop_assert!(labels.iter().all(|&l| l >= 0));
    }

    #[test]
    fn prop_strategies_and_indexes_agree(
        data in points_strategy(),
        eps in 0.1f64..2.0,
        min_samples in 1usize..8,
    ) {
        let reference = Dbscan::new(eps, min_samples)
            .with_index(IndexKind::BruteForce)
            .fit_predict(&data)
            .unwrap();
        let other = Dbscan::new(eps, min_samples)
            .with_index(IndexKind::Grid)
            .with_expansion(Expansion::UnionFind)
            .with_parallel(true)
            .fit_predict(&data)
            .unwrap();
        prop_assert_eq!(reference, other);
    }

    #[test]
    fn prop_core_partition_ignores_input_order(
        data in points_strategy(),
        eps in 0.1f64..2.0,
        min_samples in 1usize..8,
    ) {
        let n = data.len();
        let model = Dbscan::new(eps, min_samples);
        let forward = model.fit(&data).unwrap();
        let reversed_data: Vec<Vec<f64>> = data.iter().rev().cloned().collect();
        let backward = model.fit(&reversed_data).unwrap();

        prop_assert_eq!(forward.n_clusters, backward.n_clusters);
        let cores = &forward.core_sample_indices;
        for &i in cores {
            for &j in cores {
                let same_forward = forward.labels[i] == forward.labels[j];
                let same_backward =
                    backward.labels[n - 1 - i] == backward.labels[n - 1 - j];
                prop_assert_eq!(same_forward, same_backward);
            }
        }
    }
}
