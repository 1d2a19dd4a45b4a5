//! Cluster extraction and rendering.

use std::collections::BTreeSet;
use std::io::{self, Write};

use rustc_hash::FxHashMap;

use crate::grid::ChunkGrid;
use crate::sweep::SweepResult;

/// The clusters of one run: disjoint, non-empty sets of point indices whose
/// union is `0..n`.
///
/// Clusters are anonymous; two partitions are equal when they group the same
/// points together, whatever representatives the engine picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterPartition {
    clusters: BTreeSet<BTreeSet<u32>>,
}

impl ClusterPartition {
    /// Number of clusters.
    #[inline]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Iterate clusters in a deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BTreeSet<u32>> {
        self.clusters.iter()
    }

    /// The cluster containing `point`, if any.
    pub fn cluster_of(&self, point: u32) -> Option<&BTreeSet<u32>> {
        self.clusters.iter().find(|c| c.contains(&point))
    }

    /// True if `a` and `b` belong to the same cluster.
    pub fn same_cluster(&self, a: u32, b: u32) -> bool {
        self.cluster_of(a).is_some_and(|c| c.contains(&b))
    }

    pub fn into_inner(self) -> BTreeSet<BTreeSet<u32>> {
        self.clusters
    }

    /// Write each cluster's point indices on one line, followed by a blank line.
    pub fn render<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        for cluster in &self.clusters {
            for index in cluster {
                write!(out, "{} ", index)?;
            }
            write!(out, "\n\n")?;
        }
        Ok(())
    }

    /// Group points of a resolved grid by the forest root of their cell.
    pub(crate) fn from_grid(grid: &ChunkGrid) -> Self {
        let mut by_root: FxHashMap<u32, BTreeSet<u32>> = FxHashMap::default();
        for cell in (0..grid.num_cells()).rev() {
            if grid.chunk(cell).is_empty() {
                continue;
            }
            let root = grid.forest.find(cell as u32);
            by_root.entry(root).or_default().extend(grid.cell_points(cell));
        }
        Self::from_groups(by_root)
    }

    /// Group points of a resolved sweep by the forest root of their sorted position.
    pub(crate) fn from_sweep(sweep: &SweepResult) -> Self {
        let mut by_root: FxHashMap<u32, BTreeSet<u32>> = FxHashMap::default();
        for (position, &point) in sweep.order.iter().enumerate().rev() {
            let root = sweep.forest.find(position as u32);
            by_root.entry(root).or_default().insert(point);
        }
        Self::from_groups(by_root)
    }

    fn from_groups(by_root: FxHashMap<u32, BTreeSet<u32>>) -> Self {
        Self {
            clusters: by_root.into_values().collect(),
        }
    }
}

impl IntoIterator for ClusterPartition {
    type Item = BTreeSet<u32>;
    type IntoIter = std::collections::btree_set::IntoIter<BTreeSet<u32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.into_iter()
    }
}

impl<'a> IntoIterator for &'a ClusterPartition {
    type Item = &'a BTreeSet<u32>;
    type IntoIter = std::collections::btree_set::Iter<'a, BTreeSet<u32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

impl FromIterator<BTreeSet<u32>> for ClusterPartition {
    fn from_iter<I: IntoIterator<Item = BTreeSet<u32>>>(iter: I) -> Self {
        Self {
            clusters: iter.into_iter().filter(|c| !c.is_empty()).collect(),
        }
    }
}
