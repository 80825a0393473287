/*!
 * Fixed-Block Allocator Tests
 * Block placement and internal fragmentation accounting
 */

use fragsim::config::{ConfigError, FixedBlockConfig};
use fragsim::memory::{Allocator, FixedBlockAllocator, MemoryError, MemoryInfo};
use pretty_assertions::assert_eq;

#[test]
fn test_twentyfive_then_twenty_scenario() {
    let mut alloc = FixedBlockAllocator::new(100, 20).unwrap();

    let p1 = alloc.allocate(25).unwrap();
    assert_eq!(p1.block_index, Some(0));
    assert_eq!(alloc.blocks_for(p1.size), 2);

    let p2 = alloc.allocate(20).unwrap();
    assert_eq!(p2.block_index, Some(2));
    assert_eq!(p2.start_address, 40);

    let stats = alloc.stats();
    assert_eq!(stats.internal_fragmentation, 15);
    assert_eq!(stats.allocated_memory, 60);
    assert_eq!(stats.requested_memory, 45);
    assert_eq!(stats.used_blocks, 3);
    assert_eq!(stats.free_blocks, 2);
}

#[test]
fn test_lowest_run_reused_after_release() {
    let mut alloc = FixedBlockAllocator::new(100, 20).unwrap();
    let p1 = alloc.allocate(20).unwrap();
    alloc.allocate(20).unwrap();
    let p3 = alloc.allocate(20).unwrap();
    alloc.deallocate(p1.id);
    alloc.deallocate(p3.id);

    // Blocks 0, 2, 3, 4 free; a two-block run only exists at 2
    let p4 = alloc.allocate(40).unwrap();
    assert_eq!(p4.block_index, Some(2));
    let p5 = alloc.allocate(5).unwrap();
    assert_eq!(p5.block_index, Some(0));
}

#[test]
fn test_no_contiguous_run() {
    let mut alloc = FixedBlockAllocator::new(100, 20).unwrap();
    let ids: Vec<_> = (0..5).map(|_| alloc.allocate(20).unwrap().id).collect();
    alloc.deallocate(ids[1]);
    alloc.deallocate(ids[3]);

    let err = alloc.allocate(40).unwrap_err();
    assert_eq!(
        err,
        MemoryError::OutOfMemory {
            requested: 40,
            available: 40,
            largest_free: 20,
            total: 100,
        }
    );
    assert_eq!(alloc.processes().len(), 3);
}

#[test]
fn test_partial_trailing_block_is_unusable() {
    let mut alloc = FixedBlockAllocator::new(50, 20).unwrap();
    assert_eq!(alloc.total_blocks(), 2);
    assert!(alloc.allocate(40).is_ok());
    assert!(matches!(alloc.allocate(10), Err(MemoryError::OutOfMemory { .. })));
}

#[test]
fn test_boundary_requests() {
    let mut alloc = FixedBlockAllocator::new(100, 20).unwrap();
    assert!(matches!(alloc.allocate(0), Err(MemoryError::InvalidSize { .. })));
    assert!(matches!(alloc.allocate(-5), Err(MemoryError::InvalidSize { .. })));
    assert!(matches!(alloc.allocate(101), Err(MemoryError::OutOfMemory { .. })));
    assert!(alloc.processes().is_empty());
    assert!(alloc.block_map().iter().all(|slot| slot.is_free()));

    assert!(alloc.allocate(100).is_ok());
    assert_eq!(alloc.stats().free_blocks, 0);
}

#[test]
fn test_block_map_shows_waste() {
    let mut alloc = FixedBlockAllocator::new(100, 20).unwrap();
    let p1 = alloc.allocate(25).unwrap();
    let map = alloc.block_map();

    assert_eq!(map[0].occupant, Some(p1.id));
    assert_eq!((map[0].used, map[0].waste), (20, 0));
    assert_eq!((map[1].used, map[1].waste), (5, 15));
    assert!(map[2..].iter().all(|slot| slot.is_free()));
}

#[test]
fn test_with_config_applies_request_limit() {
    let config = FixedBlockConfig {
        total_memory: 200,
        block_size: 50,
        max_request: Some(60),
    };
    let mut alloc = FixedBlockAllocator::with_config(&config).unwrap();
    assert_eq!(alloc.total_blocks(), 4);
    assert!(matches!(
        alloc.allocate(61),
        Err(MemoryError::InvalidSize { limit: Some(60), .. })
    ));
    assert_eq!(alloc.allocate(60).unwrap().block_index, Some(0));
}

#[test]
fn test_with_config_rejects_zero_block_size() {
    let config = FixedBlockConfig {
        total_memory: 100,
        block_size: 0,
        max_request: None,
    };
    assert!(FixedBlockAllocator::with_config(&config).is_err());
}

#[test]
fn test_conservation_when_block_divides_capacity() {
    let mut alloc = FixedBlockAllocator::new(100, 20).unwrap();
    alloc.allocate(7).unwrap();
    alloc.allocate(33).unwrap();
    let stats = alloc.stats();
    assert_eq!(stats.allocated_memory + stats.free_memory, 100);
    assert_eq!(stats.free_blocks * 20, stats.free_memory);
    assert_eq!(alloc.allocated_memory(), 60);
}

#[test]
fn test_late_release_after_reset_keeps_new_process() {
    let mut alloc = FixedBlockAllocator::new(100, 20).unwrap();
    let stale = alloc.allocate(30).unwrap();
    alloc.reset();
    let fresh = alloc.allocate(10).unwrap();

    assert_eq!(fresh.name.as_str(), "P1");
    assert_eq!(alloc.deallocate(stale.id), None);
    assert_eq!(alloc.processes().len(), 1);
    assert_eq!(alloc.stats().used_blocks, 1);
}

#[test]
fn test_invalid_geometry_is_a_config_error() {
    assert!(matches!(
        FixedBlockAllocator::new(0, 20),
        Err(ConfigError::ZeroCapacity)
    ));
    assert!(matches!(
        FixedBlockAllocator::new(100, 0),
        Err(ConfigError::ZeroBlockSize)
    ));
    assert!(matches!(
        FixedBlockAllocator::new(10, 20),
        Err(ConfigError::BlockLargerThanMemory {
            block_size: 20,
            total_memory: 10
        })
    ));
}
