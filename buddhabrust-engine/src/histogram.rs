use std::sync::{Mutex, MutexGuard, PoisonError};

use buddhabrust_core::ExportSize;

use crate::error::EngineError;

/// The shared hit-count grid all sampler workers plot into.
///
/// A dense row-major `u32` grid plus the largest count seen so far, both
/// behind one coarse mutex. The lock domain is deliberately the whole grid:
/// a plot call touches a handful of cells and the running maximum together,
/// and contention is cheap next to the iteration work between plots.
///
/// [`deposit`](Self::deposit) is the only way to mutate cells, and it updates
/// the maximum in the same critical section — so the maximum can never lag
/// behind a cell and normalization never divides by a stale value.
pub struct Histogram {
    width: u32,
    height: u32,
    inner: Mutex<Cells>,
}

struct Cells {
    counts: Vec<u32>,
    max_count: u32,
}

impl Histogram {
    /// Allocate a zeroed grid. Export scales run to multi-hundred-megapixel
    /// grids, so exhaustion is reported instead of aborting.
    pub fn new(size: ExportSize) -> crate::Result<Self> {
        let len = size.len();
        let mut counts = Vec::new();
        counts
            .try_reserve_exact(len)
            .map_err(|_| EngineError::Allocation {
                bytes: len.saturating_mul(std::mem::size_of::<u32>()),
            })?;
        counts.resize(len, 0);
        Ok(Self {
            width: size.width,
            height: size.height,
            inner: Mutex::new(Cells {
                counts,
                max_count: 0,
            }),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells in the grid.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply one plot call's increments as a single atomic unit.
    ///
    /// Each `(cell index, weight)` pair is added and the running maximum is
    /// raised if any cell passed it, all under one lock acquisition. Indices
    /// must be in bounds; the plotting layer guarantees that.
    pub fn deposit(&self, cells: &[(usize, u32)]) {
        let mut inner = self.lock();
        for &(index, weight) in cells {
            let value = inner.counts[index].saturating_add(weight);
            inner.counts[index] = value;
            if value > inner.max_count {
                inner.max_count = value;
            }
        }
    }

    /// Read the counts and the running maximum under the same lock that
    /// guards deposits, so a materialization pass never races a plot.
    pub fn read<R>(&self, f: impl FnOnce(&[u32], u32) -> R) -> R {
        let inner = self.lock();
        f(&inner.counts, inner.max_count)
    }

    /// The largest cell value seen so far. Monotonically non-decreasing for
    /// the lifetime of the grid.
    pub fn max_count(&self) -> u32 {
        self.lock().max_count
    }

    fn lock(&self) -> MutexGuard<'_, Cells> {
        // A poisoned lock means a panic mid-deposit; the counts are still
        // well-formed u32s, so keep serving them.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
