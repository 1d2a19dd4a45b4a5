//! Sort-and-sweep clustering over individual points.
//!
//! Points are sorted along one axis; each point only needs to be compared
//! with the contiguous run of later points whose coordinate on that axis is
//! within `scale`. The forest lives over positions in the sorted order.
//!
//! In racing mode an x pass and a y pass run concurrently. Both compute the
//! same partition, so whichever finishes first is kept and the other stops at
//! its next starting point and is discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use crate::chunked::DistanceRule;
use crate::timing::Timer;
use crate::union_find::DisjointSetForest;
use crate::workers::WorkerPool;
use crate::Point;

/// Sort axis of a sweep pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Signed distance from `a` to `b` along this axis.
    #[inline]
    fn lead(self, a: &Point, b: &Point) -> f64 {
        match self {
            Axis::X => b.x - a.x,
            Axis::Y => b.y - a.y,
        }
    }

    #[inline]
    fn thread_name(self) -> &'static str {
        match self {
            Axis::X => "sweep-x",
            Axis::Y => "sweep-y",
        }
    }
}

/// The resolved state of one completed sweep pass.
#[derive(Debug)]
pub(crate) struct SweepResult {
    pub axis: Axis,
    /// `order[k]` is the point at sorted position `k`.
    pub order: Vec<u32>,
    /// Flattened forest over sorted positions.
    pub forest: DisjointSetForest,
    pub clusters: u32,
}

/// Shared state of a dual-axis race.
#[derive(Default)]
struct Race {
    winner: Mutex<Option<Axis>>,
    stop: AtomicBool,
}

pub(crate) struct SweepClusterer<'a> {
    points: &'a [Point],
    rule: DistanceRule,
    workers_per_pass: usize,
    verbose: bool,
}

impl<'a> SweepClusterer<'a> {
    pub fn new(points: &'a [Point], scale: f64, workers_per_pass: usize, verbose: bool) -> Self {
        Self {
            points,
            rule: DistanceRule::new(scale),
            workers_per_pass: workers_per_pass.max(1),
            verbose,
        }
    }

    /// Single x pass, or an x/y race when `stable` is set.
    pub fn run(&self, stable: bool) -> SweepResult {
        if !stable {
            let pool = WorkerPool::new(self.workers_per_pass, Axis::X.thread_name());
            progress!(self.verbose, "Using {} threads...", pool.workers());
            let never = AtomicBool::new(false);
            let order = self.sorted_order(&pool, Axis::X);
            let mut forest = self.scan(&pool, Axis::X, &order, &never);
            let clusters = forest.flatten();
            return SweepResult {
                axis: Axis::X,
                order,
                forest,
                clusters,
            };
        }

        progress!(self.verbose, "Using all {} threads...", 2 * self.workers_per_pass);
        let race = Race::default();
        let (x, y) = std::thread::scope(|s| {
            let x = s.spawn(|| self.race_pass(Axis::X, &race));
            let y = s.spawn(|| self.race_pass(Axis::Y, &race));
            let x = x.join().unwrap_or_else(|e| std::panic::resume_unwind(e));
            let y = y.join().unwrap_or_else(|e| std::panic::resume_unwind(e));
            (x, y)
        });

        match (x, y) {
            (Some(result), _) | (None, Some(result)) => {
                progress!(self.verbose, "Sweep along {:?} finished first.", result.axis);
                result
            }
            (None, None) => unreachable!("the first finished sweep pass always claims the race"),
        }
    }

    /// Permutation of point indices sorted by `(x, y)` or `(y, x)`.
    fn sorted_order(&self, pool: &WorkerPool, axis: Axis) -> Vec<u32> {
        let points = self.points;
        let mut order: Vec<u32> = (0..points.len() as u32).collect();
        pool.install(|| match axis {
            Axis::X => order.par_sort_unstable_by(|&a, &b| points[a as usize].cmp_xy(&points[b as usize])),
            Axis::Y => order.par_sort_unstable_by(|&a, &b| points[a as usize].cmp_yx(&points[b as usize])),
        });
        order
    }

    /// Merge every close pair along `axis`, striping starting positions
    /// round-robin over the pool. Stops taking new starting positions once
    /// `stop` is set; a position already being scanned is finished.
    fn scan(&self, pool: &WorkerPool, axis: Axis, order: &[u32], stop: &AtomicBool) -> DisjointSetForest {
        let n = order.len();
        let points = self.points;
        let scale = self.rule.scale();
        let forest = Mutex::new(DisjointSetForest::new(n));
        let timer = Timer::start();

        pool.broadcast(|id, step| {
            let mut i = id;
            while i < n && !stop.load(Ordering::Relaxed) {
                let pi = &points[order[i] as usize];
                for (j, &pj_index) in order.iter().enumerate().skip(i + 1) {
                    let pj = &points[pj_index as usize];
                    if axis.lead(pi, pj) > scale {
                        break;
                    }
                    if self.rule.check_distance(pi, pj) {
                        let mut forest = forest.lock().unwrap_or_else(PoisonError::into_inner);
                        forest.union(i as u32, j as u32);
                    }
                }
                i += step;
            }
        });

        timer.report(axis.thread_name());
        forest.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// One side of the race: sort, scan, then claim the win or discard.
    fn race_pass(&self, axis: Axis, race: &Race) -> Option<SweepResult> {
        let pool = WorkerPool::new(self.workers_per_pass, axis.thread_name());
        let order = self.sorted_order(&pool, axis);
        let mut forest = self.scan(&pool, axis, &order, &race.stop);
        drop(pool);

        {
            let mut winner = race.winner.lock().unwrap_or_else(PoisonError::into_inner);
            if winner.is_some() {
                return None;
            }
            *winner = Some(axis);
            race.stop.store(true, Ordering::Relaxed);
        }

        let timer = Timer::start();
        let clusters = forest.flatten();
        timer.report("finalize");
        Some(SweepResult {
            axis,
            order,
            forest,
            clusters,
        })
    }
}
