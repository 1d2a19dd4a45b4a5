//! Single-linkage radius clustering of very large 2D point sets.
//!
//! Two points belong to the same cluster iff a chain of points, each within
//! `scale` of the next, connects them. The engine picks one of two methods:
//!
//! - **Chunked space**: bucket points into a grid of `scale / √2` cells and
//!   merge cells containing a close pair. Memory grows with the cell count.
//! - **Sweep**: sort points along an axis and merge points inside a sliding
//!   window of width `scale`. Memory grows only with the point count; used
//!   when the grid would exceed the configured cell budget.
//!
//! # Example
//!
//! ```
//! use radius_cluster::{ClusterConfig, Point, SpatialIndex};
//!
//! let points = vec![
//!     Point::new(0.0, 10.0),
//!     Point::new(2.0, 0.0),
//!     Point::new(2.0, 10.0),
//!     Point::new(13.0, 10.0),
//!     Point::new(14.0, 10.0),
//! ];
//!
//! let mut index = SpatialIndex::build(&points, 10.0, &ClusterConfig::default());
//! assert!(index.is_usable());
//! assert_eq!(index.compute_clusters(false), 2);
//!
//! let clusters = index.clusters();
//! assert!(clusters.same_cluster(0, 1));
//! assert!(clusters.same_cluster(3, 4));
//! assert!(!clusters.same_cluster(2, 3));
//! ```

/// Log at info level when the run is verbose.
macro_rules! progress {
    ($verbose:expr, $($arg:tt)*) => {
        if $verbose {
            log::info!($($arg)*);
        }
    };
}

mod chunk;
mod chunked;
mod error;
mod grid;
mod index;
mod partition;
mod sweep;
mod timing;
mod types;
mod union_find;
mod workers;

use std::io::{self, Write};

pub use chunked::{PARALLEL_MAX_CELLS_PER_POINT, PARALLEL_MIN_CELLS};
pub use error::ClusterError;
pub use grid::DEFAULT_MEMORY_THRESHOLD;
pub use index::{Method, SpatialIndex};
pub use partition::ClusterPartition;
pub use sweep::Axis;
pub use types::{Point, Point2Like};

/// Configuration for a clustering run.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Race an x-sorted sweep against a y-sorted sweep and keep whichever
    /// finishes first.
    ///
    /// Both produce the same partition; racing only helps inputs that sort
    /// badly along one axis. Uses the full thread budget. Ignored when the
    /// chunked method is chosen.
    pub stable: bool,
    /// Log progress (bounds, chosen method, grid size, threads) at info level.
    pub verbose: bool,
    /// Largest grid (in cells) the chunked method may allocate. Bigger grids
    /// fall back to the sweep.
    pub memory_threshold: f64,
    /// Total worker budget. `None` uses the detected hardware concurrency.
    pub threads: Option<usize>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            stable: false,
            verbose: false,
            memory_threshold: DEFAULT_MEMORY_THRESHOLD,
            threads: None,
        }
    }
}

fn to_points<P: Point2Like>(points: &[P]) -> Vec<Point> {
    points.iter().map(Point::from_like).collect()
}

/// Build, cluster, and return the number of clusters (0 if the input is rejected).
pub fn cluster_count<P: Point2Like>(points: &[P], scale: f64, config: &ClusterConfig) -> u32 {
    let points = to_points(points);
    let mut index = SpatialIndex::build(&points, scale, config);
    index.compute_clusters(config.stable)
}

/// Build, cluster, and return the partition (empty if the input is rejected).
pub fn cluster_points<P: Point2Like>(points: &[P], scale: f64, config: &ClusterConfig) -> ClusterPartition {
    let points = to_points(points);
    let mut index = SpatialIndex::build(&points, scale, config);
    index.compute_clusters(config.stable);
    index.clusters()
}

/// Build, cluster, and render the partition to `sink`.
pub fn print_cluster_points<P: Point2Like, W: Write + ?Sized>(
    points: &[P],
    scale: f64,
    config: &ClusterConfig,
    sink: &mut W,
) -> io::Result<()> {
    let points = to_points(points);
    let mut index = SpatialIndex::build(&points, scale, config);
    index.compute_clusters(config.stable);
    index.print_clusters(sink)
}
