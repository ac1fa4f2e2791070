//! # Group Partitioning
//!
//! Splits a range of uniform-cost items into a few contiguous groups, one
//! job each.
//!
//! ```text
//!   count = 5001, ideal = 1024, max_groups = 8
//!
//!   group_num        = min(5001 / min(5001, 1024), 8) = 4
//!   count_per_group  = 5001 / 4                        = 1250
//!   last_group_count = 5001 - 4 * 1250                 = 1
//!
//!   [ 1250 | 1250 | 1250 | 1250 | 1 ]   -> 5 jobs
//! ```
//!
//! Groups are sized so each one covers roughly [`IDEAL_GROUP_BYTES`] of
//! records: smaller groups spend more time handing off work than doing it.

use std::ops::Range;

/// Target byte footprint of one group.
pub const IDEAL_GROUP_BYTES: usize = 64 * 1024;

/// Number of `P` records in a group of `group_bytes` bytes, at least 1.
///
/// Zero-sized records fit any number per group.
#[must_use]
pub const fn ideal_group_count_for<P>(group_bytes: usize) -> u32 {
    let size = std::mem::size_of::<P>();
    if size == 0 {
        return u32::MAX;
    }
    let count = group_bytes / size;
    if count == 0 {
        1
    } else if count > u32::MAX as usize {
        u32::MAX
    } else {
        count as u32
    }
}

/// Number of `P` records in a [`IDEAL_GROUP_BYTES`] group.
#[must_use]
pub const fn ideal_group_count<P>() -> u32 {
    ideal_group_count_for::<P>(IDEAL_GROUP_BYTES)
}

/// How one bulk operation is split into jobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupPlan {
    /// Number of equal-sized groups, `1..=max_groups`.
    pub group_num: u32,
    /// Items in each equal-sized group.
    pub count_per_group: u32,
    /// Items in the trailing group, dispatched only when non-zero.
    pub last_group_count: u32,
}

impl GroupPlan {
    /// Plans the split of `count` items.
    ///
    /// Returns `None` when there is nothing to do. `ideal` and `max_groups`
    /// are treated as at least 1.
    #[must_use]
    pub fn calc(count: u32, ideal: u32, max_groups: u32) -> Option<Self> {
        if count == 0 {
            return None;
        }

        let ideal = ideal.max(1);
        let max_groups = max_groups.max(1);

        let group_num = (count / count.min(ideal)).min(max_groups);
        let count_per_group = count / group_num;
        let last_group_count = count - group_num * count_per_group;

        Some(Self {
            group_num,
            count_per_group,
            last_group_count,
        })
    }

    /// Total items covered by the plan.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.group_num * self.count_per_group + self.last_group_count
    }

    /// Number of jobs the plan dispatches.
    #[inline]
    #[must_use]
    pub const fn task_count(&self) -> u32 {
        if self.last_group_count > 0 {
            self.group_num + 1
        } else {
            self.group_num
        }
    }

    /// Absolute index ranges of every group, starting at `begin`.
    #[must_use]
    pub fn ranges(&self, begin: u32) -> GroupRanges {
        GroupRanges {
            plan: *self,
            begin,
            next: 0,
        }
    }
}

/// Iterator over the index ranges of a [`GroupPlan`].
#[derive(Clone, Debug)]
pub struct GroupRanges {
    plan: GroupPlan,
    begin: u32,
    next: u32,
}

impl Iterator for GroupRanges {
    type Item = Range<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        let group = self.next;
        let len = if group < self.plan.group_num {
            self.plan.count_per_group
        } else if group == self.plan.group_num && self.plan.last_group_count > 0 {
            self.plan.last_group_count
        } else {
            return None;
        };

        self.next += 1;
        let start = self.begin + group * self.plan.count_per_group;
        Some(start..start + len)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.task_count().saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GroupRanges {}
