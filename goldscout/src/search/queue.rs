//! Priority queue of unexplored regions.
//!
//! Regions are ordered by expected density (higher first), then by creation
//! order. Densities are compared after rounding to multiples of
//! [`DENSITY_EPSILON`], so values that differ only by float noise tie and
//! pop FIFO, while the ordering stays a total order the heap can rely on.
//! This ensures:
//!
//! 1. The most promising region is always probed next
//! 2. Equal estimates are probed in the order they were created, so runs
//!    are reproducible
//!
//! Unlike a plain `BinaryHeap`, the queue keeps a position table indexed by
//! [`RegionId`], so a queued region's density can be changed in place with
//! an O(log n) sift instead of a rebuild.
//!
//! # Example
//!
//! ```ignore
//! use goldscout::search::RegionQueue;
//!
//! let mut queue = RegionQueue::new();
//! queue.push(a, 0.1);
//! queue.push(b, 0.1);
//! queue.update(b, 0.5);
//!
//! // b comes out first despite being pushed second
//! assert_eq!(queue.pop().unwrap().region, b);
//! ```

use std::cmp::Ordering;

use super::region::RegionId;
use super::DENSITY_EPSILON;

/// Position-table marker for regions not in the heap.
const NOT_QUEUED: usize = usize::MAX;

// =============================================================================
// Queue Entry
// =============================================================================

/// A region waiting to be probed, with the density it is ordered by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueEntry {
    pub region: RegionId,
    pub density: f64,
}

impl QueueEntry {
    /// Ordering used by the heap: `Greater` means `self` is popped first.
    ///
    /// Densities falling in the same [`DENSITY_EPSILON`]-wide bucket are
    /// treated as equal and fall back to creation order (lower id first).
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        self.density_key()
            .cmp(&other.density_key())
            // Reverse id ordering: older (lower id) should come first
            .then_with(|| other.region.cmp(&self.region))
    }

    /// Density rounded to a multiple of [`DENSITY_EPSILON`].
    #[inline]
    fn density_key(&self) -> i64 {
        (self.density / DENSITY_EPSILON).round() as i64
    }

    #[inline]
    fn outranks(&self, other: &Self) -> bool {
        self.priority_cmp(other) == Ordering::Greater
    }
}

// =============================================================================
// Region Queue
// =============================================================================

/// Indexed max-heap of regions keyed by expected density.
#[derive(Default)]
pub struct RegionQueue {
    heap: Vec<QueueEntry>,
    /// `positions[id]` = index of the region in `heap`, or `NOT_QUEUED`.
    positions: Vec<usize>,
}

impl RegionQueue {
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a queue with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
        }
    }

    /// Adds a region to the queue.
    ///
    /// # Panics
    ///
    /// Panics if the region is already queued.
    pub fn push(&mut self, region: RegionId, density: f64) {
        let slot = region.index();
        if slot >= self.positions.len() {
            self.positions.resize(slot + 1, NOT_QUEUED);
        }
        assert_eq!(
            self.positions[slot], NOT_QUEUED,
            "region {} is already queued",
            region
        );

        let pos = self.heap.len();
        self.heap.push(QueueEntry { region, density });
        self.positions[slot] = pos;
        self.sift_up(pos);
    }

    /// Removes and returns the highest-priority region.
    ///
    /// Returns `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<QueueEntry> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let top = self.heap.pop()?;
        self.positions[top.region.index()] = NOT_QUEUED;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    /// Returns the highest-priority entry without removing it.
    pub fn peek(&self) -> Option<&QueueEntry> {
        self.heap.first()
    }

    /// Changes the density of a queued region and restores heap order.
    ///
    /// Returns `false` (and does nothing) if the region is not queued.
    pub fn update(&mut self, region: RegionId, density: f64) -> bool {
        let Some(pos) = self.position(region) else {
            return false;
        };
        let old = self.heap[pos].density;
        if old == density {
            return true;
        }
        self.heap[pos].density = density;
        if density > old {
            self.sift_up(pos);
        } else {
            self.sift_down(pos);
        }
        true
    }

    /// Returns true if the region is waiting in the queue.
    pub fn contains(&self, region: RegionId) -> bool {
        self.position(region).is_some()
    }

    /// Density the region is currently queued with.
    pub fn density(&self, region: RegionId) -> Option<f64> {
        self.position(region).map(|pos| self.heap[pos].density)
    }

    /// Returns the number of queued regions.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn position(&self, region: RegionId) -> Option<usize> {
        match self.positions.get(region.index()) {
            Some(&pos) if pos != NOT_QUEUED => Some(pos),
            _ => None,
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a].region.index()] = a;
        self.positions[self.heap[b].region.index()] = b;
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.heap[pos].outranks(&self.heap[parent]) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut best = pos;
            if left < len && self.heap[left].outranks(&self.heap[best]) {
                best = left;
            }
            if right < len && self.heap[right].outranks(&self.heap[best]) {
                best = right;
            }
            if best == pos {
                break;
            }
            self.swap(pos, best);
            pos = best;
        }
    }
}

impl std::fmt::Debug for RegionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionQueue")
            .field("len", &self.heap.len())
            .field("top", &self.peek())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
