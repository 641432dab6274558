//! Partitioning of instances into blocks under a per-draw ceiling.
//!
//! Instanced draw calls cap the number of instances per call. A
//! [`BlockLayout`] splits N instances into `ceil(N / C)` blocks of C, with
//! the remainder in the last block, so renderers issue one draw per block
//! and never see the ceiling themselves.

use std::num::NonZeroUsize;
use std::ops::Range;

/// Default maximum instances per instanced draw call.
pub const DEFAULT_MAX_INSTANCES_PER_BLOCK: usize = 180;

/// One instanced draw call: which block and how many instances it draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    /// Block index.
    pub block: usize,
    /// Instances to draw from that block.
    pub instance_count: usize,
}

/// Partition of `total` instances into fixed-capacity blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    total: usize,
    instances_per_block: NonZeroUsize,
    block_count: usize,
    remaining_instances: usize,
}

impl BlockLayout {
    /// Partition `total` instances into blocks of at most `ceiling`.
    #[must_use]
    pub fn new(total: usize, ceiling: NonZeroUsize) -> Self {
        let per_block = ceiling.get();
        let block_count = total.div_ceil(per_block);
        let remaining_instances = if block_count == 0 {
            0
        } else {
            total - per_block * (block_count - 1)
        };
        Self {
            total,
            instances_per_block: ceiling,
            block_count,
            remaining_instances,
        }
    }

    /// Total instances across all blocks.
    #[must_use]
    pub fn total_instances(&self) -> usize {
        self.total
    }

    /// Capacity of every block.
    #[must_use]
    pub fn instances_per_block(&self) -> usize {
        self.instances_per_block.get()
    }

    /// Number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.block_count
    }

    /// Instances in the last block (equals the capacity when `total` is an
    /// exact multiple; 0 when there are no blocks).
    #[must_use]
    pub fn remaining_instances(&self) -> usize {
        self.remaining_instances
    }

    /// Instances in `block`; 0 past the end.
    #[must_use]
    pub fn instances_in_block(&self, block: usize) -> usize {
        if block >= self.block_count {
            0
        } else if block + 1 == self.block_count {
            self.remaining_instances
        } else {
            self.instances_per_block()
        }
    }

    /// Instance index range covered by `block`.
    #[must_use]
    pub fn block_range(&self, block: usize) -> Range<usize> {
        let start = (block * self.instances_per_block()).min(self.total);
        start..start + self.instances_in_block(block)
    }

    /// Instance index ranges of every block, in order.
    pub fn block_ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.block_count).map(|b| self.block_range(b))
    }

    /// One draw call per block, in order.
    pub fn draw_calls(&self) -> impl Iterator<Item = DrawCall> + '_ {
        (0..self.block_count).map(|block| DrawCall {
            block,
            instance_count: self.instances_in_block(block),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ceiling(c: usize) -> NonZeroUsize {
        NonZeroUsize::new(c).unwrap()
    }

    #[test]
    fn partition_185_by_180() {
        let layout = BlockLayout::new(185, ceiling(180));
        assert_eq!(layout.block_count(), 2);
        assert_eq!(layout.remaining_instances(), 5);
        let sizes: Vec<usize> =
            layout.draw_calls().map(|d| d.instance_count).collect();
        assert_eq!(sizes, vec![180, 5]);
        assert_eq!(layout.block_range(1), 180..185);
    }

    #[test]
    fn exact_multiple_fills_last_block() {
        let layout = BlockLayout::new(360, ceiling(180));
        assert_eq!(layout.block_count(), 2);
        assert_eq!(layout.remaining_instances(), 180);
    }

    #[test]
    fn empty_has_no_blocks() {
        let layout = BlockLayout::new(0, ceiling(180));
        assert_eq!(layout.block_count(), 0);
        assert_eq!(layout.remaining_instances(), 0);
        assert_eq!(layout.draw_calls().count(), 0);
        assert_eq!(layout.instances_in_block(0), 0);
    }

    #[test]
    fn partition_properties_hold() {
        for c in [1, 2, 7, 180] {
            for n in 0..400 {
                let layout = BlockLayout::new(n, ceiling(c));
                let blocks = n.div_ceil(c);
                assert_eq!(layout.block_count(), blocks);
                let sizes: Vec<usize> =
                    layout.draw_calls().map(|d| d.instance_count).collect();
                assert_eq!(sizes.iter().sum::<usize>(), n);
                if let Some((last, rest)) = sizes.split_last() {
                    assert!(rest.iter().all(|&s| s == c));
                    let expected = if n % c == 0 { c } else { n - c * (blocks - 1) };
                    assert_eq!(*last, expected);
                }
                let covered: Vec<usize> = layout.block_ranges().flatten().collect();
                assert_eq!(covered, (0..n).collect::<Vec<_>>());
            }
        }
    }
}
