//! 2-ring neighbor enumeration for grid cells.
//!
//! With a cell edge just under `scale / √2`, two points within `scale` of each
//! other sit at most two rows and two columns apart. In exact arithmetic the
//! (±2, ±2) corner cells are a full `√2 · edge` away and could be skipped, but
//! the rounded edge and cell lookup put pairs at distance `scale` into them,
//! so every cell of the 5×5 block except the center is a candidate.

/// How neighbors are enumerated for one whole clustering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExecutionMode {
    /// Single thread, cells visited in ascending order: only later cells are
    /// returned because every earlier cell already compared itself with us.
    Serial,
    /// Worker threads visit cells in no particular order: the full symmetric ring.
    Parallel,
}

/// Offsets `(drow, dcol)` to cells with a larger flattened index.
const FORWARD_OFFSETS: [(i8, i8); 12] = [
    (0, 1),
    (1, 0),
    (1, -1),
    (1, 1),
    (2, 0),
    (0, 2),
    (2, -1),
    (2, 1),
    (1, 2),
    (1, -2),
    (2, -2),
    (2, 2),
];

/// Forward offsets preceded by their mirror images.
const FULL_OFFSETS: [(i8, i8); 24] = [
    (0, -1),
    (0, -2),
    (-1, -2),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (-1, 2),
    (-2, -1),
    (-2, 0),
    (-2, 1),
    (-2, 2),
    (-2, -2),
    (0, 1),
    (1, 0),
    (1, -1),
    (1, 1),
    (2, 0),
    (0, 2),
    (2, -1),
    (2, 1),
    (1, 2),
    (1, -2),
    (2, -2),
    (2, 2),
];

impl ExecutionMode {
    #[inline]
    fn offsets(self) -> &'static [(i8, i8)] {
        match self {
            ExecutionMode::Serial => &FORWARD_OFFSETS,
            ExecutionMode::Parallel => &FULL_OFFSETS,
        }
    }
}

/// In-bounds `(row, column)` pairs of the cells that may hold a point within
/// `scale` of a point in cell `(row, column)`. Nothing wraps past the grid edge.
#[inline]
pub(crate) fn neighbor_cells(
    row: u32,
    column: u32,
    rows: u32,
    columns: u32,
    mode: ExecutionMode,
) -> impl Iterator<Item = (u32, u32)> {
    let (row, column) = (i64::from(row), i64::from(column));
    let (rows, columns) = (i64::from(rows), i64::from(columns));
    mode.offsets().iter().filter_map(move |&(dr, dc)| {
        let r = row + i64::from(dr);
        let c = column + i64::from(dc);
        if r < 0 || c < 0 || r >= rows || c >= columns {
            return None;
        }
        Some((r as u32, c as u32))
    })
}
