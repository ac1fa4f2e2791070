//! Property tests for group partitioning.

use ember_particles::GroupPlan;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_group_count_within_limits(
        count in 1u32..2_000_000,
        ideal in 1u32..100_000,
        max_groups in 1u32..256,
    ) {
        let plan = GroupPlan::calc(count, ideal, max_groups).unwrap();
        prop_assert!(plan.group_num >= 1);
        prop_assert!(plan.group_num <= max_groups);
        prop_assert_eq!(
            plan.group_num * plan.count_per_group + plan.last_group_count,
            count
        );
    }

    #[test]
    fn prop_ranges_tile_without_gaps(
        begin in 0u32..1_000_000,
        count in 1u32..500_000,
        ideal in 1u32..20_000,
        max_groups in 1u32..64,
    ) {
        let plan = GroupPlan::calc(count, ideal, max_groups).unwrap();
        let ranges: Vec<_> = plan.ranges(begin).collect();

        prop_assert_eq!(ranges.len() as u32, plan.task_count());
        let mut cursor = begin;
        for range in &ranges {
            prop_assert_eq!(range.start, cursor);
            prop_assert!(range.end > range.start);
            cursor = range.end;
        }
        prop_assert_eq!(cursor, begin + count);
    }

    #[test]
    fn prop_small_ranges_single_group(
        count in 1u32..1024,
        max_groups in 1u32..64,
    ) {
        let plan = GroupPlan::calc(count, 1024, max_groups).unwrap();
        prop_assert_eq!(plan.group_num, 1);
        prop_assert_eq!(plan.count_per_group, count);
        prop_assert_eq!(plan.last_group_count, 0);
    }
}

#[test]
fn test_zero_count_dispatches_nothing() {
    assert!(GroupPlan::calc(0, 1, 1).is_none());
}
