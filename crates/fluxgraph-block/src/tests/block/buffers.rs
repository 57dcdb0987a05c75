//! Output buffer allocation, production, and zero-copy pass-through.

use std::sync::Arc;

use fluxgraph_core::block::buffer::BufferHandle;
use fluxgraph_core::block::config::OutputPortConfig;
use fluxgraph_core::block::message::Delivery;
use fluxgraph_core::block::topology::HeapAllocator;

use super::test_harness::{CaptureRouter, FnLogic, RouterEvent, RECV_TIMEOUT};
use crate::block::startup::start_block;

fn expect_buffer(event: RouterEvent) -> (usize, BufferHandle) {
    match event {
        RouterEvent::Downstream(port, Delivery::Buffer(buffer)) => (port, buffer),
        other => panic!("expected a downstream buffer, got {other:?}"),
    }
}

#[test]
fn an_untouched_output_buffer_is_produced_at_full_capacity() {
    let (router, rx) = CaptureRouter::pair();
    let block = start_block(
        "full-producer",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            let len = io.output_buffer(0).len();
            io.produce(0, len);
            Ok(())
        })),
        Arc::new(HeapAllocator::new(64)),
        router,
    );

    block
        .set_output_config(
            0,
            OutputPortConfig {
                item_size: 1,
                reserve_items: 100,
                ..OutputPortConfig::default()
            },
        )
        .expect("set output config");
    block.perform_work().expect("work");

    // 100 bytes requested, 64-byte granularity: the allocator hands
    // back 128 and the whole span counts as produced.
    let (port, buffer) = expect_buffer(rx.recv_timeout(RECV_TIMEOUT).expect("posted buffer"));
    assert_eq!(port, 0);
    assert_eq!(buffer.len(), 128);
    let stats = block.snapshot().expect("snapshot").stats;
    assert_eq!(stats.items_produced(0), 128);
    block.shutdown().expect("shutdown");
}

#[test]
fn popping_narrows_the_buffer_before_production() {
    let (router, rx) = CaptureRouter::pair();
    let block = start_block(
        "narrow-producer",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            io.output_buffer(0).as_mut_slice()[..5].copy_from_slice(b"first");
            io.pop_output_buffer(0, 5)?;
            io.produce(0, 5);
            Ok(())
        })),
        Arc::new(HeapAllocator::new(64)),
        router,
    );

    block.perform_work().expect("work");

    let (_, buffer) = expect_buffer(rx.recv_timeout(RECV_TIMEOUT).expect("posted buffer"));
    assert_eq!(buffer.as_slice(), b"first");
    let stats = block.snapshot().expect("snapshot").stats;
    assert_eq!(stats.items_produced(0), 5);
    block.shutdown().expect("shutdown");
}

#[test]
fn each_work_invocation_gets_a_fresh_output_buffer() {
    let (router, rx) = CaptureRouter::pair();
    let block = start_block(
        "repeat-producer",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            io.pop_output_buffer(0, 3)?;
            io.produce(0, 3);
            Ok(())
        })),
        Arc::new(HeapAllocator::new(64)),
        router,
    );

    block.perform_work().expect("first work");
    block.perform_work().expect("second work");

    let (_, first) = expect_buffer(rx.recv_timeout(RECV_TIMEOUT).expect("first buffer"));
    let (_, second) = expect_buffer(rx.recv_timeout(RECV_TIMEOUT).expect("second buffer"));
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    let stats = block.snapshot().expect("snapshot").stats;
    assert_eq!(stats.items_produced(0), 6);
    block.shutdown().expect("shutdown");
}

#[test]
fn posting_a_foreign_buffer_credits_whole_items() {
    let (router, rx) = CaptureRouter::pair();
    let block = start_block(
        "passthrough",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            let mut buffer = BufferHandle::zeroed(12);
            buffer.as_mut_slice().copy_from_slice(b"abcdabcdabcd");
            io.post_output_buffer(0, buffer);
            Ok(())
        })),
        Arc::new(HeapAllocator::new(64)),
        router,
    );

    block
        .set_output_config(
            0,
            OutputPortConfig {
                item_size: 4,
                ..OutputPortConfig::default()
            },
        )
        .expect("set output config");
    block.perform_work().expect("work");

    let (_, buffer) = expect_buffer(rx.recv_timeout(RECV_TIMEOUT).expect("posted buffer"));
    assert_eq!(buffer.as_slice(), b"abcdabcdabcd");
    // 12 bytes at 4 bytes per item.
    let stats = block.snapshot().expect("snapshot").stats;
    assert_eq!(stats.items_produced(0), 3);
    block.shutdown().expect("shutdown");
}

#[test]
fn output_allocation_honors_the_maximum_item_cap() {
    let (router, rx) = CaptureRouter::pair();
    let block = start_block(
        "capped-producer",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            let len = io.output_buffer(0).len();
            io.produce(0, len);
            Ok(())
        })),
        Arc::new(HeapAllocator::new(1)),
        router,
    );

    block
        .set_output_config(
            0,
            OutputPortConfig {
                item_size: 1,
                reserve_items: 500,
                maximum_items: 32,
            },
        )
        .expect("set output config");
    block.perform_work().expect("work");

    let (_, buffer) = expect_buffer(rx.recv_timeout(RECV_TIMEOUT).expect("posted buffer"));
    assert_eq!(buffer.len(), 32);
    block.shutdown().expect("shutdown");
}
