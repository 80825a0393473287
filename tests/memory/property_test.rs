/*!
 * Allocator Property Tests
 * Invariants over random allocate/deallocate sequences
 */

use fragsim::memory::{Allocator, FirstFitAllocator, FixedBlockAllocator, MemoryError};
use fragsim::ProcessId;
use proptest::prelude::*;
use std::fmt::Debug;

#[derive(Debug, Clone)]
enum Op {
    Alloc(i64),
    /// Index into the live list, modulo its length
    Free(usize),
    /// Id that was never handed out
    FreeUnknown,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-2i64..40).prop_map(Op::Alloc),
        3 => any::<usize>().prop_map(Op::Free),
        1 => Just(Op::FreeUnknown),
    ]
}

/// Apply `op`; `view` captures the allocator's full layout so a failed
/// allocation can be checked for leaving no trace
fn apply<A, V>(alloc: &mut A, op: &Op, view: impl Fn(&A) -> V)
where
    A: Allocator,
    V: PartialEq + Debug,
{
    match *op {
        Op::Alloc(size) => {
            let before = alloc.processes().to_vec();
            let layout_before = view(&*alloc);
            if alloc.allocate(size).is_err() {
                assert_eq!(alloc.processes(), before.as_slice());
                assert_eq!(view(&*alloc), layout_before);
            }
        }
        Op::Free(index) => {
            let live = alloc.processes();
            if !live.is_empty() {
                let id = live[index % live.len()].id;
                assert!(alloc.deallocate(id).is_some());
                assert!(alloc.deallocate(id).is_none());
            }
        }
        Op::FreeUnknown => {
            assert!(alloc.deallocate(ProcessId(u64::MAX)).is_none());
        }
    }
}

proptest! {
    #[test]
    fn prop_first_fit_partition_holds(
        capacity in 1usize..200,
        ops in prop::collection::vec(op(), 0..80),
    ) {
        let mut alloc = FirstFitAllocator::new(capacity).unwrap();
        for op in &ops {
            apply(&mut alloc, op, FirstFitAllocator::layout);
            prop_assert!(alloc.check_invariants().is_ok());

            let stats = alloc.stats();
            prop_assert_eq!(stats.allocated_memory + stats.total_free_memory, capacity);

            let regions = alloc.free_regions();
            for pair in regions.windows(2) {
                prop_assert!(pair[0].end_address() < pair[1].start_address);
            }
        }
    }

    #[test]
    fn prop_first_fit_releases_to_one_region(
        sizes in prop::collection::vec(1i64..20, 1..20),
        seed in any::<u64>(),
    ) {
        let mut alloc = FirstFitAllocator::new(400).unwrap();
        let mut ids: Vec<ProcessId> = sizes
            .iter()
            .filter_map(|size| alloc.allocate(*size).ok())
            .map(|p| p.id)
            .collect();

        // Deterministic shuffle from the seed
        let len = ids.len();
        for i in 0..len {
            let j = (seed.rotate_left(i as u32) as usize) % len;
            ids.swap(i, j);
        }
        for id in ids {
            alloc.deallocate(id);
            prop_assert!(alloc.check_invariants().is_ok());
        }

        let regions = alloc.free_regions();
        prop_assert_eq!(regions.len(), 1);
        prop_assert_eq!(regions[0].start_address, 0);
        prop_assert_eq!(regions[0].size, 400);
    }

    #[test]
    fn prop_fixed_block_runs_disjoint(
        block_size in 1usize..32,
        blocks in 1usize..16,
        ops in prop::collection::vec(op(), 0..80),
    ) {
        let capacity = block_size * blocks;
        let mut alloc = FixedBlockAllocator::new(capacity, block_size).unwrap();
        for op in &ops {
            apply(&mut alloc, op, FixedBlockAllocator::block_map);
            prop_assert!(alloc.check_invariants().is_ok());

            let stats = alloc.stats();
            prop_assert_eq!(stats.allocated_memory + stats.free_memory, capacity);
            prop_assert_eq!(
                stats.internal_fragmentation,
                stats.allocated_memory - stats.requested_memory
            );

            let occupied = alloc.block_map().iter().filter(|slot| !slot.is_free()).count();
            prop_assert_eq!(occupied, stats.used_blocks);
        }
    }

    #[test]
    fn prop_reset_matches_fresh(ops in prop::collection::vec(op(), 0..40)) {
        let mut first_fit = FirstFitAllocator::new(100).unwrap();
        let mut fixed = FixedBlockAllocator::new(100, 20).unwrap();
        for op in &ops {
            apply(&mut first_fit, op, FirstFitAllocator::layout);
            apply(&mut fixed, op, FixedBlockAllocator::block_map);
        }
        first_fit.reset();
        fixed.reset();

        let fresh_first_fit = FirstFitAllocator::new(100).unwrap();
        let fresh_fixed = FixedBlockAllocator::new(100, 20).unwrap();
        prop_assert_eq!(first_fit.layout(), fresh_first_fit.layout());
        prop_assert_eq!(first_fit.free_regions(), fresh_first_fit.free_regions());
        prop_assert_eq!(fixed.block_map(), fresh_fixed.block_map());
        prop_assert_eq!(
            first_fit.allocate(10).map(|p| p.name),
            FirstFitAllocator::new(100).unwrap().allocate(10).map(|p| p.name)
        );
    }

    #[test]
    fn prop_ids_unique_across_resets(
        rounds in prop::collection::vec(prop::collection::vec(1i64..30, 1..6), 1..5),
    ) {
        let mut first_fit = FirstFitAllocator::new(100).unwrap();
        let mut fixed = FixedBlockAllocator::new(100, 20).unwrap();
        let mut seen = std::collections::HashSet::new();

        for sizes in &rounds {
            for size in sizes {
                if let Ok(process) = first_fit.allocate(*size) {
                    prop_assert!(seen.insert(("first-fit", process.id)));
                }
                if let Ok(process) = fixed.allocate(*size) {
                    prop_assert!(seen.insert(("fixed", process.id)));
                }
            }
            first_fit.reset();
            fixed.reset();
        }
    }

    #[test]
    fn prop_non_positive_requests_rejected(size in i64::MIN..=0) {
        let mut alloc = FirstFitAllocator::new(100).unwrap();
        let is_invalid = matches!(alloc.allocate(size), Err(MemoryError::InvalidSize { .. }));
        prop_assert!(is_invalid);
        prop_assert_eq!(alloc.free_regions().len(), 1);
    }
}

#[test]
fn test_three_adjacent_release_orders() {
    let orders = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    for order in orders {
        let mut alloc = FirstFitAllocator::new(100).unwrap();
        let live: Vec<_> = [10, 20, 30]
            .iter()
            .map(|size| alloc.allocate(*size).unwrap())
            .collect();
        // Pin the tail so the three merge into one region of their own
        alloc.allocate(40).unwrap();

        for index in order {
            alloc.deallocate(live[index].id);
            assert!(alloc.check_invariants().is_ok(), "order {:?}", order);
        }

        let regions = alloc.free_regions();
        assert_eq!(regions.len(), 1, "order {:?}", order);
        assert_eq!((regions[0].start_address, regions[0].size), (0, 60));
    }
}
