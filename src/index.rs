//! The clustering state of one run over a fixed point set.

use std::io::{self, Write};

use rayon::prelude::*;

use crate::chunk::MAX_POINTS;
use crate::chunked::{self, ChunkedClusterer};
use crate::grid::{self, Bounds, ChunkGrid, GridPlan};
use crate::partition::ClusterPartition;
use crate::sweep::{Axis, SweepClusterer, SweepResult};
use crate::timing::Timer;
use crate::{workers, ClusterConfig, ClusterError, Point};

/// Which algorithm an index clusters with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Grid of `scale / √2` cells, merged through a forest over cells.
    Chunked,
    /// Axis sort and sliding-window sweep, merged through a forest over points.
    Sweep,
}

#[derive(Debug)]
enum State {
    Unusable(ClusterError),
    Chunked(ChunkGrid),
    Sweep(Option<SweepResult>),
}

/// Spatial index over a borrowed point set.
///
/// Construction never fails loudly: inputs that violate the preconditions
/// produce an unusable index on which every operation returns an empty or
/// zero result. Use [`SpatialIndex::try_build`] to get the reason as an error.
#[derive(Debug)]
pub struct SpatialIndex<'a> {
    points: &'a [Point],
    scale: f64,
    threads: Option<usize>,
    verbose: bool,
    state: State,
    clusters: Option<u32>,
}

impl<'a> SpatialIndex<'a> {
    /// Build the index, logging and keeping any rejection instead of returning it.
    pub fn build(points: &'a [Point], scale: f64, config: &ClusterConfig) -> Self {
        match Self::try_build(points, scale, config) {
            Ok(index) => index,
            Err(err) => {
                log::warn!("{}. Structure wasn't created.", err);
                Self {
                    points,
                    scale,
                    threads: config.threads,
                    verbose: config.verbose,
                    state: State::Unusable(err),
                    clusters: None,
                }
            }
        }
    }

    /// Validate the input, measure its bounds, and bucket it if the grid fits.
    pub fn try_build(points: &'a [Point], scale: f64, config: &ClusterConfig) -> Result<Self, ClusterError> {
        let verbose = config.verbose;
        let timer = Timer::start();

        if points.is_empty() {
            return Err(ClusterError::EmptyInput);
        }
        if points.len() > MAX_POINTS {
            return Err(ClusterError::TooManyPoints {
                count: points.len(),
                max: MAX_POINTS,
            });
        }
        if scale.is_nan() || scale <= 0.0 || !(scale * scale).is_normal() {
            return Err(ClusterError::InvalidScale(scale));
        }
        if let Some(index) = points.par_iter().position_first(|p| !p.is_finite()) {
            return Err(ClusterError::NonFiniteCoordinate { index });
        }

        let bounds = Bounds::of(points);
        if !bounds.diagonal_squared().is_finite() {
            return Err(ClusterError::RangeTooLarge);
        }

        progress!(verbose, "Minimum X: {:.3}", bounds.min_x);
        progress!(verbose, "Maximum X: {:.3}", bounds.max_x);
        progress!(verbose, "Minimum Y: {:.3}", bounds.min_y);
        progress!(verbose, "Maximum Y: {:.3}", bounds.max_y);
        progress!(verbose, "Scale length: {:.3}", scale);

        let state = match grid::plan(&bounds, scale, config.memory_threshold) {
            GridPlan::Chunked { rows, columns, edge } => {
                progress!(
                    verbose,
                    "Will use the chunked space method. Number of chunks: {} ({} rows x {} columns)",
                    rows as u64 * columns as u64,
                    rows,
                    columns
                );
                State::Chunked(ChunkGrid::build(points, &bounds, rows, columns, edge))
            }
            GridPlan::Sweep { rows, columns } => {
                progress!(
                    verbose,
                    "Will use the connected components method ({:.0} x {:.0} grid exceeds the memory threshold).",
                    rows,
                    columns
                );
                State::Sweep(None)
            }
        };

        progress!(verbose, "Structure was created for {} points.", points.len());
        timer.report("build");

        Ok(Self {
            points,
            scale,
            threads: config.threads,
            verbose,
            state,
            clusters: None,
        })
    }

    /// False if construction rejected the input.
    #[inline]
    pub fn is_usable(&self) -> bool {
        !matches!(self.state, State::Unusable(_))
    }

    /// Why construction rejected the input, if it did.
    pub fn rejection(&self) -> Option<&ClusterError> {
        match &self.state {
            State::Unusable(err) => Some(err),
            _ => None,
        }
    }

    /// The method chosen at construction; `None` when unusable.
    pub fn method(&self) -> Option<Method> {
        match self.state {
            State::Unusable(_) => None,
            State::Chunked(_) => Some(Method::Chunked),
            State::Sweep(_) => Some(Method::Sweep),
        }
    }

    /// `(rows, columns)` of the grid when the chunked method is used.
    pub fn grid_dimensions(&self) -> Option<(u32, u32)> {
        match &self.state {
            State::Chunked(grid) => Some((grid.rows, grid.columns)),
            _ => None,
        }
    }

    /// Axis whose sweep produced the stored result, once a sweep has run.
    pub fn winning_axis(&self) -> Option<Axis> {
        match &self.state {
            State::Sweep(Some(result)) => Some(result.axis),
            _ => None,
        }
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Cluster the points and return the number of clusters.
    ///
    /// Idempotent: later calls return the memoized count. `stable` selects the
    /// racing x/y sweep and is ignored on the chunked path. Returns 0 for an
    /// unusable index.
    pub fn compute_clusters(&mut self, stable: bool) -> u32 {
        if let Some(count) = self.clusters {
            return count;
        }

        let timer = Timer::start();
        let points = self.points;
        let count = match &mut self.state {
            State::Unusable(_) => return 0,
            State::Chunked(grid) => {
                let mode = chunked::select_mode(grid.num_cells(), points.len());
                let workers = workers::half_threads(self.threads);
                ChunkedClusterer::new(points, self.scale, workers, self.verbose).run(grid, mode)
            }
            State::Sweep(slot) => {
                let workers = workers::half_threads(self.threads);
                let result = SweepClusterer::new(points, self.scale, workers, self.verbose).run(stable);
                let count = result.clusters;
                *slot = Some(result);
                count
            }
        };
        timer.report("cluster");

        progress!(self.verbose, "Number of clusters: {}", count);
        self.clusters = Some(count);
        count
    }

    /// The memoized cluster count, if clustering has run.
    #[inline]
    pub fn cluster_count(&self) -> Option<u32> {
        self.clusters
    }

    /// The partition found by [`compute_clusters`](Self::compute_clusters).
    ///
    /// Empty if the index is unusable or has not been clustered yet.
    pub fn clusters(&self) -> ClusterPartition {
        if self.clusters.is_none() {
            return ClusterPartition::default();
        }
        match &self.state {
            State::Unusable(_) | State::Sweep(None) => ClusterPartition::default(),
            State::Chunked(grid) => ClusterPartition::from_grid(grid),
            State::Sweep(Some(result)) => ClusterPartition::from_sweep(result),
        }
    }

    /// Render the partition to `sink`.
    pub fn print_clusters<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        self.clusters().render(sink)
    }
}
