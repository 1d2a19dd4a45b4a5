//! Index-linked buckets.
//!
//! Every grid cell is a [`Chunk`] holding only the head and tail of an
//! intrusive singly-linked list of point indices. The `next` links of all
//! chunks live in one [`ChunkLinks`] array sized to the point count, so a
//! chunk costs 8 bytes no matter how many points it holds.

/// Reserved "no point" marker; never a valid point index.
pub(crate) const EMPTY: u32 = u32::MAX;

/// Largest number of points addressable with the `EMPTY` sentinel reserved.
pub(crate) const MAX_POINTS: usize = (u32::MAX - 1) as usize;

/// Shared `next` array backing every chunk of one grid.
///
/// `next[i]` is the index chained after point `i` in its chunk, or `EMPTY`
/// for the tail. Written only while the grid is being filled.
#[derive(Debug)]
pub(crate) struct ChunkLinks {
    next: Vec<u32>,
}

impl ChunkLinks {
    pub fn new(n: usize) -> Self {
        Self {
            next: vec![EMPTY; n],
        }
    }

    #[inline]
    pub fn next(&self, index: u32) -> u32 {
        self.next[index as usize]
    }
}

/// One grid cell: an unordered multiset of point indices.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Chunk {
    start: u32,
    end: u32,
}

impl Default for Chunk {
    fn default() -> Self {
        Self {
            start: EMPTY,
            end: EMPTY,
        }
    }
}

impl Chunk {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == EMPTY
    }

    /// Append `index` at the tail. O(1).
    #[inline]
    pub fn append(&mut self, index: u32, links: &mut ChunkLinks) {
        debug_assert_ne!(index, EMPTY);
        if self.start == EMPTY {
            self.start = index;
            self.end = index;
            return;
        }
        links.next[self.end as usize] = index;
        self.end = index;
    }

    /// Number of chained points. O(len).
    pub fn len(&self, links: &ChunkLinks) -> usize {
        self.iter(links).count()
    }

    /// Walk the chain from head to tail.
    #[inline]
    pub fn iter<'a>(&self, links: &'a ChunkLinks) -> ChunkIter<'a> {
        ChunkIter {
            current: self.start,
            links,
        }
    }
}

/// Forward, single-pass iterator over a chunk's point indices.
pub(crate) struct ChunkIter<'a> {
    current: u32,
    links: &'a ChunkLinks,
}

impl Iterator for ChunkIter<'_> {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        if self.current == EMPTY {
            return None;
        }
        let index = self.current;
        self.current = self.links.next(index);
        Some(index)
    }
}
