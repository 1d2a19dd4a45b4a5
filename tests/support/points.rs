#![allow(dead_code)]

use std::collections::BTreeSet;

use radius_cluster::{ClusterPartition, Point};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Points uniformly distributed in `[min, max]²`.
pub fn uniform_points(n: usize, min: f64, max: f64, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point::new(rng.gen_range(min..max), rng.gen_range(min..max)))
        .collect()
}

/// Points uniformly distributed in the unit square.
pub fn unit_square_points(n: usize, seed: u64) -> Vec<Point> {
    uniform_points(n, 0.0, 1.0, seed)
}

/// Tight blobs around random centers, the usual shape radius clustering is run on.
pub fn blob_points(n: usize, blobs: usize, spread: f64, extent: f64, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let centers: Vec<Point> = (0..blobs.max(1))
        .map(|_| Point::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent)))
        .collect();
    (0..n)
        .map(|i| {
            let c = centers[i % centers.len()];
            Point::new(
                c.x + rng.gen_range(-spread..spread),
                c.y + rng.gen_range(-spread..spread),
            )
        })
        .collect()
}

/// Points on a jittered line; stresses one sweep axis and not the other.
pub fn line_points(n: usize, step: f64, jitter: f64, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let j = if jitter > 0.0 { rng.gen_range(-jitter..jitter) } else { 0.0 };
            Point::new(i as f64 * step, 3.0 + j)
        })
        .collect()
}

/// Points on a coarse lattice, with exact duplicates and exact-distance pairs.
pub fn lattice_points(side: usize, spacing: f64) -> Vec<Point> {
    let mut points = Vec::with_capacity(side * side * 2);
    for r in 0..side {
        for c in 0..side {
            let p = Point::new(c as f64 * spacing, r as f64 * spacing);
            points.push(p);
            if (r + c) % 3 == 0 {
                points.push(p);
            }
        }
    }
    points
}

/// O(n²) single-linkage clustering: the reference every method must match.
pub fn brute_force_partition(points: &[Point], scale: f64) -> ClusterPartition {
    let n = points.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    let scale_sq = scale * scale;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = points[i].x - points[j].x;
            let dy = points[i].y - points[j].y;
            if dx * dx + dy * dy <= scale_sq {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                parent[rj] = ri;
            }
        }
    }

    let mut groups: std::collections::BTreeMap<usize, BTreeSet<u32>> = Default::default();
    for i in 0..n {
        let r = find(&mut parent, i);
        groups.entry(r).or_default().insert(i as u32);
    }
    groups.into_values().collect()
}

/// Every index in `0..n` appears in exactly one non-empty cluster.
pub fn assert_is_partition(partition: &ClusterPartition, n: usize) {
    let mut seen = vec![false; n];
    for cluster in partition {
        assert!(!cluster.is_empty(), "empty cluster in partition");
        for &i in cluster {
            let i = i as usize;
            assert!(i < n, "index {} out of range ({} points)", i, n);
            assert!(!seen[i], "index {} appears in more than one cluster", i);
            seen[i] = true;
        }
    }
    if let Some(missing) = seen.iter().position(|&s| !s) {
        panic!("index {} missing from partition", missing);
    }
}
