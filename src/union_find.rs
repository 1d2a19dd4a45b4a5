//! Disjoint-set forest with asymmetric union and deferred flattening.
//!
//! One structure serves every domain the engine clusters over: grid cells,
//! points in x-sorted order, and points in y-sorted order. Concurrent users
//! wrap it in a `Mutex` and hold the lock for each whole `union`.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DisjointSetForest {
    parent: Vec<u32>,
}

impl DisjointSetForest {
    pub fn new(n: usize) -> Self {
        debug_assert!(n <= u32::MAX as usize);
        Self {
            parent: (0..n as u32).collect(),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[cfg(test)]
    pub fn parent(&self, x: u32) -> u32 {
        self.parent[x as usize]
    }

    #[inline]
    pub fn is_root(&self, x: u32) -> bool {
        self.parent[x as usize] == x
    }

    /// Follow parent links to the root. No path compression.
    #[inline]
    pub fn find(&self, x: u32) -> u32 {
        let mut current = x;
        loop {
            let p = self.parent[current as usize];
            if p == current {
                return current;
            }
            current = p;
        }
    }

    /// `parent[find(b)] = find(a)`.
    ///
    /// The root of `a` always survives, so tree shape depends on call order
    /// while the resulting partition does not.
    #[inline]
    pub fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        self.parent[rb as usize] = ra;
    }

    /// Point `b`'s root at a root already resolved by the caller.
    #[inline]
    pub fn attach_to_root(&mut self, root: u32, b: u32) {
        debug_assert!(self.is_root(root));
        let rb = self.find(b);
        self.parent[rb as usize] = root;
    }

    /// Rewrite `parent[x]` to its root. Returns whether `x` was a root before.
    #[inline]
    pub fn flatten_one(&mut self, x: u32) -> bool {
        let was_root = self.is_root(x);
        if !was_root {
            let root = self.find(x);
            self.parent[x as usize] = root;
        }
        was_root
    }

    /// Flatten every entry and return the number of roots.
    pub fn flatten(&mut self) -> u32 {
        let mut roots = 0u32;
        for x in (0..self.parent.len() as u32).rev() {
            roots += self.flatten_one(x) as u32;
        }
        roots
    }

    #[cfg(test)]
    pub fn count_roots(&self) -> u32 {
        (0..self.parent.len() as u32)
            .filter(|&x| self.is_root(x))
            .count() as u32
    }
}
