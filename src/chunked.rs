//! Chunked-space clustering: merge grid cells that contain a close pair.
//!
//! Points sharing a cell are always within `scale` of each other, so each
//! non-empty cell starts as one cluster and only cell-to-cell links across
//! the 2-ring need checking. The forest lives over cells, not points.

use std::sync::{Mutex, PoisonError};

use crate::grid::{ChunkGrid, ExecutionMode};
use crate::timing::Timer;
use crate::union_find::DisjointSetForest;
use crate::workers::{self, WorkerPool};
use crate::Point;

/// Grids smaller than this always run serially.
pub const PARALLEL_MIN_CELLS: usize = 1_000_000;

/// Grids with more cells per point than this are too sparse to parallelize.
pub const PARALLEL_MAX_CELLS_PER_POINT: usize = 10;

/// Pick one execution mode for the whole run from the measured grid density.
pub(crate) fn select_mode(num_cells: usize, num_points: usize) -> ExecutionMode {
    let dense_enough = num_cells <= num_points.saturating_mul(PARALLEL_MAX_CELLS_PER_POINT);
    if num_cells >= PARALLEL_MIN_CELLS && dense_enough {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Serial
    }
}

/// Radius test shared by both clustering methods.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DistanceRule {
    scale: f64,
    scale_squared: f64,
}

impl DistanceRule {
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            scale_squared: scale * scale,
        }
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Axis-bound rejection, then exact squared distance.
    ///
    /// Both deltas are bounded by `scale` before squaring, and construction
    /// guarantees `scale²` is a normal finite number, so the sum can neither
    /// overflow nor flush to zero.
    #[inline]
    pub fn check_distance(&self, a: &Point, b: &Point) -> bool {
        let dx = a.x - b.x;
        if dx > self.scale || dx < -self.scale {
            return false;
        }
        let dy = a.y - b.y;
        dy >= -self.scale && dy <= self.scale && dx * dx + dy * dy <= self.scale_squared
    }
}

pub(crate) struct ChunkedClusterer<'a> {
    points: &'a [Point],
    rule: DistanceRule,
    workers: usize,
    verbose: bool,
}

impl<'a> ChunkedClusterer<'a> {
    pub fn new(points: &'a [Point], scale: f64, workers: usize, verbose: bool) -> Self {
        Self {
            points,
            rule: DistanceRule::new(scale),
            workers: workers.max(1),
            verbose,
        }
    }

    /// True iff some point of cell `a` is within `scale` of some point of cell `b`.
    pub fn compare_chunk_points(&self, grid: &ChunkGrid, a: usize, b: usize) -> bool {
        grid.cell_points(a).any(|ia| {
            let pa = &self.points[ia as usize];
            grid.cell_points(b)
                .any(|ib| self.rule.check_distance(pa, &self.points[ib as usize]))
        })
    }

    /// Merge every close non-empty neighbor of `cell` into `cell`'s root.
    fn visit_chunk_serial(&self, grid: &ChunkGrid, forest: &mut DisjointSetForest, cell: usize) {
        let root = forest.find(cell as u32);
        for neighbour in grid.neighbour_chunks(cell, ExecutionMode::Serial) {
            if grid.chunk(neighbour).is_empty() {
                continue;
            }
            if self.compare_chunk_points(grid, cell, neighbour) {
                forest.attach_to_root(root, neighbour as u32);
            }
        }
    }

    /// Same as the serial visit, but the merge target is re-resolved under the
    /// lock: other workers may have moved `cell`'s root since the comparison.
    fn visit_chunk_parallel(&self, grid: &ChunkGrid, forest: &Mutex<DisjointSetForest>, cell: usize) {
        for neighbour in grid.neighbour_chunks(cell, ExecutionMode::Parallel) {
            if grid.chunk(neighbour).is_empty() {
                continue;
            }
            if self.compare_chunk_points(grid, cell, neighbour) {
                let mut forest = forest.lock().unwrap_or_else(PoisonError::into_inner);
                forest.union(cell as u32, neighbour as u32);
            }
        }
    }

    /// Run the chosen traversal, then count (and in parallel mode flatten) roots.
    ///
    /// Returns the number of clusters among non-empty cells.
    pub fn run(&self, grid: &mut ChunkGrid, mode: ExecutionMode) -> u32 {
        let num_cells = grid.num_cells();
        let mut forest = std::mem::take(&mut grid.forest);

        match mode {
            ExecutionMode::Serial => {
                for cell in 0..num_cells {
                    if !grid.chunk(cell).is_empty() {
                        self.visit_chunk_serial(grid, &mut forest, cell);
                    }
                }
            }
            ExecutionMode::Parallel => {
                let pool = WorkerPool::new(self.workers, "chunked");
                progress!(self.verbose, "Using {} threads...", pool.workers());
                let shared = Mutex::new(forest);
                let grid_ref: &ChunkGrid = grid;
                pool.broadcast(|id, workers| {
                    let (start, end) = workers::contiguous_range(num_cells, id, workers);
                    for cell in start..end {
                        if !grid_ref.chunk(cell).is_empty() {
                            self.visit_chunk_parallel(grid_ref, &shared, cell);
                        }
                    }
                });
                forest = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
            }
        }

        let timer = Timer::start();
        let mut clusters = 0u32;
        let mut occupied = 0usize;
        for cell in (0..num_cells).rev() {
            if grid.chunk(cell).is_empty() {
                continue;
            }
            occupied += 1;
            let was_root = match mode {
                ExecutionMode::Parallel => forest.flatten_one(cell as u32),
                ExecutionMode::Serial => forest.is_root(cell as u32),
            };
            clusters += was_root as u32;
        }
        timer.report("finalize");

        progress!(
            self.verbose,
            "Empty chunks are {:.3}% of total.",
            100.0 * (num_cells - occupied) as f64 / num_cells as f64
        );
        if self.verbose {
            let largest = (0..num_cells)
                .map(|cell| grid.chunk(cell).len(grid.links()))
                .max()
                .unwrap_or(0);
            log::info!("Largest chunk holds {} points.", largest);
        }

        grid.forest = forest;
        clusters
    }
}
