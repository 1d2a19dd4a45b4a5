//! Cluster a random planar point set and report the cluster count and run time.
//!
//! Run with: cargo run --release --features cli --bin cluster_points
//!
//! Usage:
//!   cluster_points                         100k points in [-1e100, 1e100]², scale = range / 1e10
//!   cluster_points -n 10m --factor 1e3     10 million points, coarser scale
//!   cluster_points -n 1m --scale 0.5 --range 1000 --stable
//!   cluster_points --demo --print          the five-point example, partition printed
//!
//! For per-phase timing, build with: cargo run --release --features cli,timing --bin cluster_points

use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use radius_cluster::{ClusterConfig, Method, Point, SpatialIndex};
use std::io::{self, Write};
use std::time::Instant;

/// Largest supported coordinate magnitude for generated points.
const MAX_POINT_VALUE: f64 = 1.0e100;

fn parse_count(s: &str) -> Result<usize, String> {
    let s = s.to_lowercase();
    let (num_str, multiplier) = if let Some(rest) = s.strip_suffix('b') {
        (rest, 1_000_000_000)
    } else if let Some(rest) = s.strip_suffix('m') {
        (rest, 1_000_000)
    } else if let Some(rest) = s.strip_suffix('k') {
        (rest, 1_000)
    } else {
        (s.as_str(), 1)
    };

    num_str
        .parse::<f64>()
        .map(|n| (n * multiplier as f64) as usize)
        .map_err(|e| format!("Invalid number '{}': {}", s, e))
}

#[derive(Parser, Debug)]
#[command(name = "cluster_points")]
#[command(about = "Single-linkage radius clustering of random 2D points")]
struct Args {
    /// Number of points (accepts k/m/b suffixes)
    #[arg(short = 'n', long, default_value = "100k", value_parser = parse_count)]
    points: usize,

    /// Points are drawn uniformly from [-range, range]²
    #[arg(long, default_value_t = MAX_POINT_VALUE)]
    range: f64,

    /// Linkage distance; overrides --factor
    #[arg(long)]
    scale: Option<f64>,

    /// Scale is range / factor when --scale is not given
    #[arg(long, default_value_t = 1.0e10)]
    factor: f64,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Race an x sweep against a y sweep
    #[arg(long)]
    stable: bool,

    /// Log progress
    #[arg(short, long)]
    verbose: bool,

    /// Print the partition to stdout
    #[arg(long)]
    print: bool,

    /// Total worker threads (default: hardware concurrency)
    #[arg(long)]
    threads: Option<usize>,

    /// Grid cell budget before falling back to the sweep
    #[arg(long)]
    memory_threshold: Option<f64>,

    /// Use the five-point example with scale 10 instead of random points
    #[arg(long)]
    demo: bool,
}

fn random_points(n: usize, seed: u64, min: f64, max: f64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point::new(rng.gen_range(min..=max), rng.gen_range(min..=max)))
        .collect()
}

fn demo_points() -> Vec<Point> {
    vec![
        Point::new(0.0, 10.0),
        Point::new(2.0, 0.0),
        Point::new(2.0, 10.0),
        Point::new(13.0, 10.0),
        Point::new(14.0, 10.0),
    ]
}

fn main() -> io::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let (points, scale) = if args.demo {
        (demo_points(), 10.0)
    } else {
        println!("Creating {} points...", args.points);
        let scale = args.scale.unwrap_or(args.range / args.factor);
        (random_points(args.points, args.seed, -args.range, args.range), scale)
    };

    let mut config = ClusterConfig {
        stable: args.stable,
        verbose: args.verbose,
        threads: args.threads,
        ..Default::default()
    };
    if let Some(threshold) = args.memory_threshold {
        config.memory_threshold = threshold;
    }

    println!("Computing clusters...");
    let start = Instant::now();
    let mut index = SpatialIndex::build(&points, scale, &config);
    let count = index.compute_clusters(config.stable);
    let elapsed = start.elapsed();

    let method = match index.method() {
        Some(Method::Chunked) => "chunked space",
        Some(Method::Sweep) => "connected components",
        None => "none (input rejected)",
    };
    println!("Method: {}", method);
    println!("Number of clusters: {}", count);
    println!("Computing time was: {:.3}s", elapsed.as_secs_f64());

    if args.print {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        index.print_clusters(&mut out)?;
        out.flush()?;
    }

    Ok(())
}
