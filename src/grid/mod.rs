//! Uniform grid over the bounding box of the input.
//!
//! Cells have edge just under `scale / √2`, so any two points sharing a cell
//! are within `scale` of each other and a point's possible partners are
//! confined to the 2-ring described in [`neighbors`]. Points are bucketed into index-linked
//! [`Chunk`]s; one disjoint-set forest over the cells records merges.

pub(crate) mod neighbors;

use rayon::prelude::*;

use crate::chunk::{Chunk, ChunkLinks};
use crate::union_find::DisjointSetForest;
use crate::Point;

pub(crate) use neighbors::{neighbor_cells, ExecutionMode};

/// Default cell budget (number of grid cells) before falling back to the sweep.
pub const DEFAULT_MEMORY_THRESHOLD: f64 = 4.0e9;

/// Cells are addressed with `u32` forest entries.
const MAX_CELLS: f64 = u32::MAX as f64;

/// Axis-aligned bounding box of the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    const EMPTY: Bounds = Bounds {
        min_x: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        min_y: f64::INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    #[inline]
    fn include(mut self, p: &Point) -> Self {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
        self
    }

    #[inline]
    fn merge(self, other: Bounds) -> Self {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Parallel min/max reduction over all points.
    pub fn of(points: &[Point]) -> Self {
        points
            .par_iter()
            .fold(|| Bounds::EMPTY, Bounds::include)
            .reduce(|| Bounds::EMPTY, Bounds::merge)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Squared diagonal; construction refuses boxes where this is not finite.
    #[inline]
    pub fn diagonal_squared(&self) -> f64 {
        self.width() * self.width() + self.height() * self.height()
    }
}

/// Which clustering method the grid dimensions allow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum GridPlan {
    Chunked { rows: u32, columns: u32, edge: f64 },
    Sweep { rows: f64, columns: f64 },
}

/// Cell edge for `scale`: `scale / √2`, shrunk by the worst-case relative error
/// of the `(p - min) / edge` lookup over `extent`, so that two points sharing a
/// computed cell are always within `scale` of each other.
pub(crate) fn cell_edge(scale: f64, extent: f64) -> f64 {
    let nominal = scale / std::f64::consts::SQRT_2;
    let cells = (extent / nominal).ceil().max(1.0);
    let slack = (16.0 * f64::EPSILON * (cells + 2.0)).min(0.5);
    let mut edge = nominal * (1.0 - slack);
    while 2.0 * edge * edge > scale * scale {
        edge = f64::from_bits(edge.to_bits() - 1);
    }
    edge
}

/// Choose the grid when its cell count stays under `memory_threshold`.
pub(crate) fn plan(bounds: &Bounds, scale: f64, memory_threshold: f64) -> GridPlan {
    let edge = cell_edge(scale, bounds.width().max(bounds.height()));
    // A zero extent still needs one row or column.
    let rows = (bounds.height() / edge).ceil().max(1.0);
    let columns = (bounds.width() / edge).ceil().max(1.0);

    if rows < memory_threshold / columns && rows * columns <= MAX_CELLS {
        GridPlan::Chunked {
            rows: rows as u32,
            columns: columns as u32,
            edge,
        }
    } else {
        GridPlan::Sweep { rows, columns }
    }
}

/// Bucketed grid plus the forest over its cells.
#[derive(Debug)]
pub(crate) struct ChunkGrid {
    pub rows: u32,
    pub columns: u32,
    edge: f64,
    min_x: f64,
    min_y: f64,
    chunks: Vec<Chunk>,
    links: ChunkLinks,
    pub forest: DisjointSetForest,
}

impl ChunkGrid {
    /// Allocate one chunk per cell and bucket every point by index.
    pub fn build(points: &[Point], bounds: &Bounds, rows: u32, columns: u32, edge: f64) -> Self {
        let num_cells = rows as usize * columns as usize;
        let mut grid = ChunkGrid {
            rows,
            columns,
            edge,
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            chunks: vec![Chunk::default(); num_cells],
            links: ChunkLinks::new(points.len()),
            forest: DisjointSetForest::new(num_cells),
        };

        for (index, p) in points.iter().enumerate() {
            let cell = grid.cell_of(p);
            grid.chunks[cell].append(index as u32, &mut grid.links);
        }

        grid
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.chunks.len()
    }

    /// Row and column of `p`; points on the upper boundary land in the last row/column.
    #[inline]
    pub fn row_column_of(&self, p: &Point) -> (u32, u32) {
        let row = (((p.y - self.min_y) / self.edge) as u32).min(self.rows - 1);
        let column = (((p.x - self.min_x) / self.edge) as u32).min(self.columns - 1);
        (row, column)
    }

    #[inline]
    pub fn cell_of(&self, p: &Point) -> usize {
        let (row, column) = self.row_column_of(p);
        self.flat(row, column)
    }

    #[inline]
    pub fn flat(&self, row: u32, column: u32) -> usize {
        row as usize * self.columns as usize + column as usize
    }

    #[inline]
    pub fn row_column(&self, cell: usize) -> (u32, u32) {
        let columns = self.columns as usize;
        ((cell / columns) as u32, (cell % columns) as u32)
    }

    #[inline]
    pub fn chunk(&self, cell: usize) -> &Chunk {
        &self.chunks[cell]
    }

    #[inline]
    pub fn links(&self) -> &ChunkLinks {
        &self.links
    }

    /// Point indices bucketed in `cell`, in insertion order.
    #[inline]
    pub fn cell_points(&self, cell: usize) -> impl Iterator<Item = u32> + '_ {
        self.chunks[cell].iter(&self.links)
    }

    /// Flattened indices of the in-bounds 2-ring neighbors of `cell`.
    #[inline]
    pub fn neighbour_chunks(&self, cell: usize, mode: ExecutionMode) -> impl Iterator<Item = usize> + '_ {
        let (row, column) = self.row_column(cell);
        neighbor_cells(row, column, self.rows, self.columns, mode).map(move |(r, c)| self.flat(r, c))
    }
}
