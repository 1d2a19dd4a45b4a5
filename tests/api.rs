//! Public API integration tests for radius-cluster.

mod support;

use std::collections::BTreeSet;

use radius_cluster::{
    cluster_count, cluster_points, print_cluster_points, Axis, ClusterConfig, ClusterError,
    ClusterPartition, Method, Point, SpatialIndex,
};
use support::points::{assert_is_partition, unit_square_points};

fn example_points() -> Vec<Point> {
    vec![
        Point::new(0.0, 10.0),
        Point::new(2.0, 0.0),
        Point::new(2.0, 10.0),
        Point::new(13.0, 10.0),
        Point::new(14.0, 10.0),
    ]
}

fn expected_example_partition() -> ClusterPartition {
    let a: BTreeSet<u32> = [0, 1, 2].into_iter().collect();
    let b: BTreeSet<u32> = [3, 4].into_iter().collect();
    [a, b].into_iter().collect()
}

fn sweep_config() -> ClusterConfig {
    ClusterConfig {
        memory_threshold: 0.0,
        ..Default::default()
    }
}

#[test]
fn test_example_on_grid_path() {
    let points = example_points();
    let mut index = SpatialIndex::build(&points, 10.0, &ClusterConfig::default());
    assert_eq!(index.method(), Some(Method::Chunked));
    assert_eq!(index.compute_clusters(false), 2);
    assert_eq!(index.clusters(), expected_example_partition());
}

#[test]
fn test_example_on_sweep_paths() {
    let points = example_points();
    for stable in [false, true] {
        let mut index = SpatialIndex::build(&points, 10.0, &sweep_config());
        assert_eq!(index.method(), Some(Method::Sweep));
        assert_eq!(index.compute_clusters(stable), 2, "stable={}", stable);
        assert_eq!(index.clusters(), expected_example_partition(), "stable={}", stable);
        assert!(matches!(index.winning_axis(), Some(Axis::X) | Some(Axis::Y)));
    }
}

#[test]
fn test_print_clusters() {
    let points = example_points();
    let mut index = SpatialIndex::build(&points, 10.0, &ClusterConfig::default());
    index.compute_clusters(false);
    let mut out = Vec::new();
    index.print_clusters(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "\n0 1 2 \n\n3 4 \n\n");
}

#[test]
fn test_convenience_surface() {
    let raw: Vec<[f64; 2]> = example_points().iter().map(|p| [p.x, p.y]).collect();
    let config = ClusterConfig::default();
    assert_eq!(cluster_count(&raw, 10.0, &config), 2);
    assert_eq!(cluster_points(&raw, 10.0, &config), expected_example_partition());

    let tuples: Vec<(f64, f64)> = raw.iter().map(|p| (p[0], p[1])).collect();
    let mut out = Vec::new();
    print_cluster_points(&tuples, 10.0, &config, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "\n0 1 2 \n\n3 4 \n\n");
}

#[test]
fn test_single_point_is_one_cluster() {
    let points = [Point::new(5.0, -3.0)];
    for config in [ClusterConfig::default(), sweep_config()] {
        let mut index = SpatialIndex::build(&points, 1.0, &config);
        assert_eq!(index.compute_clusters(true), 1);
        let clusters = index.clusters();
        assert_eq!(clusters.len(), 1);
        assert_is_partition(&clusters, 1);
    }
}

#[test]
fn test_identical_points_are_one_cluster() {
    let points = vec![Point::new(0.25, 0.75); 1000];
    for config in [ClusterConfig::default(), sweep_config()] {
        let mut index = SpatialIndex::build(&points, 1.0e-9, &config);
        assert_eq!(index.compute_clusters(true), 1);
        assert_is_partition(&index.clusters(), points.len());
    }
}

#[test]
fn test_scale_beyond_diagonal_is_one_cluster() {
    let points = unit_square_points(500, 7);
    for config in [ClusterConfig::default(), sweep_config()] {
        let mut index = SpatialIndex::build(&points, 2.0, &config);
        assert_eq!(index.compute_clusters(false), 1);
        assert_eq!(index.clusters().len(), 1);
    }
}

#[test]
fn test_rejected_inputs_yield_zero() {
    let points = example_points();
    let config = ClusterConfig::default();

    for scale in [0.0, -10.0] {
        let mut index = SpatialIndex::build(&points, scale, &config);
        assert!(!index.is_usable());
        assert!(matches!(index.rejection(), Some(ClusterError::InvalidScale(_))));
        assert_eq!(index.compute_clusters(false), 0);
        assert!(index.clusters().is_empty());
    }

    let empty: Vec<Point> = Vec::new();
    let mut index = SpatialIndex::build(&empty, 1.0, &config);
    assert_eq!(index.rejection(), Some(&ClusterError::EmptyInput));
    assert_eq!(index.compute_clusters(true), 0);
    assert_eq!(cluster_count(&empty, 1.0, &config), 0);
    assert!(cluster_points(&empty, 1.0, &config).is_empty());
}

#[test]
fn test_try_build_reports_reason() {
    let err = SpatialIndex::try_build(&[], 1.0, &ClusterConfig::default()).unwrap_err();
    assert_eq!(err, ClusterError::EmptyInput);
    assert_eq!(err.to_string(), "point set is empty");
}

#[test]
fn test_idempotence() {
    let points = unit_square_points(2000, 99);
    for config in [ClusterConfig::default(), sweep_config()] {
        let mut index = SpatialIndex::build(&points, 0.02, &config);
        let first = index.compute_clusters(true);
        let second = index.compute_clusters(true);
        assert_eq!(first, second);
        let a = index.clusters();
        let b = index.clusters();
        assert_eq!(a, b);
        assert_eq!(a.len(), first as usize);
    }
}

#[test]
fn test_extreme_magnitudes() {
    let points = vec![
        Point::new(-1.0e100, -1.0e100),
        Point::new(-1.0e100 + 1.0e98, -1.0e100),
        Point::new(1.0e100, 1.0e100),
    ];
    for config in [ClusterConfig::default(), sweep_config()] {
        let mut index = SpatialIndex::build(&points, 1.0e99, &config);
        assert!(index.is_usable());
        assert_eq!(index.compute_clusters(false), 2);
    }
}

#[test]
fn test_explicit_thread_budget() {
    let points = unit_square_points(3000, 5);
    let mut counts = Vec::new();
    for threads in [1, 2, 7] {
        let config = ClusterConfig {
            threads: Some(threads),
            memory_threshold: 0.0,
            ..Default::default()
        };
        let mut index = SpatialIndex::build(&points, 0.015, &config);
        counts.push(index.compute_clusters(true));
    }
    assert!(counts.windows(2).all(|w| w[0] == w[1]), "counts differ: {:?}", counts);
}

#[test]
fn test_verbose_runs_log_without_changing_results() {
    let _ = env_logger::builder().is_test(true).try_init();
    let points = unit_square_points(1500, 3);
    let quiet = cluster_points(&points, 0.03, &ClusterConfig::default());
    for config in [ClusterConfig::default(), sweep_config()] {
        let config = ClusterConfig {
            verbose: true,
            stable: true,
            ..config
        };
        assert_eq!(cluster_points(&points, 0.03, &config), quiet);
    }
}

#[test]
fn test_tiny_scales() {
    // 1e-170² underflows, so the squared-distance test could no longer tell
    // these two points apart from a coincident pair.
    let apart = [Point::new(0.0, 0.0), Point::new(1.0e-170, 1.0e-170)];
    for config in [ClusterConfig::default(), sweep_config()] {
        let mut index = SpatialIndex::build(&apart, 1.0e-170, &config);
        assert!(matches!(index.rejection(), Some(ClusterError::InvalidScale(_))));
        assert_eq!(index.compute_clusters(false), 0);
    }

    // Smallest magnitudes whose square is still normal work on both paths.
    let apart = [Point::new(0.0, 0.0), Point::new(1.0e-150, 1.0e-150)];
    let close = [Point::new(0.0, 0.0), Point::new(7.0e-151, 7.0e-151)];
    for config in [ClusterConfig::default(), sweep_config()] {
        let mut index = SpatialIndex::build(&apart, 1.0e-150, &config);
        assert!(index.is_usable());
        assert_eq!(index.compute_clusters(false), 2);

        let mut index = SpatialIndex::build(&close, 1.0e-150, &config);
        assert_eq!(index.compute_clusters(true), 1);
    }
}
