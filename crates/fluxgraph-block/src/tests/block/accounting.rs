//! Consume/produce accounting and out-of-band message semantics.

use std::sync::Arc;

use fluxgraph_core::block::buffer::BufferHandle;
use fluxgraph_core::block::message::Delivery;
use fluxgraph_core::block::payload::Payload;
use fluxgraph_core::block::topology::HeapAllocator;

use super::test_harness::{buffer_with_bytes, CaptureRouter, FnLogic, RECV_TIMEOUT};
use crate::block::startup::start_block;
use crate::error::BlockError;

#[test]
fn consumed_counts_accumulate_across_work_invocations() {
    let (router, _events) = CaptureRouter::pair();
    let block = start_block(
        "consumer",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            io.consume(0, 3);
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    block.notify_topology(1, 0).expect("notify topology");
    block
        .endpoint()
        .deliver(0, Delivery::Buffer(BufferHandle::zeroed(40)))
        .expect("deliver buffer");

    block.perform_work().expect("first work");
    block.perform_work().expect("second work");

    let stats = block.snapshot().expect("snapshot").stats;
    assert_eq!(stats.items_consumed(0), 6);
    block.shutdown().expect("shutdown");
}

#[test]
fn whole_block_accounting_covers_every_announced_port() {
    let (router, rx) = CaptureRouter::pair();
    let block = start_block(
        "lockstep",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            io.consume_each(2);
            io.produce_each(4);
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    block.notify_topology(4, 4).expect("notify topology");
    for input in 0..4 {
        block
            .endpoint()
            .deliver(input, Delivery::Buffer(BufferHandle::zeroed(16)))
            .expect("deliver buffer");
    }

    block.perform_work().expect("work");

    let stats = block.snapshot().expect("snapshot").stats;
    for port in 0..4 {
        assert_eq!(stats.items_consumed(port), 2);
        assert_eq!(stats.items_produced(port), 4);
    }
    // No pending output buffers existed, so nothing was posted.
    assert!(rx.try_recv().is_err());
    block.shutdown().expect("shutdown");
}

#[test]
fn whole_block_accounting_covers_a_single_port() {
    let (router, _events) = CaptureRouter::pair();
    let block = start_block(
        "single",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            io.consume_each(2);
            io.produce_each(4);
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    block.notify_topology(1, 1).expect("notify topology");
    block
        .endpoint()
        .deliver(0, Delivery::Buffer(BufferHandle::zeroed(16)))
        .expect("deliver buffer");

    block.perform_work().expect("work");

    let stats = block.snapshot().expect("snapshot").stats;
    assert_eq!(stats.items_consumed(0), 2);
    assert_eq!(stats.items_produced(0), 4);
    block.shutdown().expect("shutdown");
}

#[test]
fn whole_block_accounting_on_zero_ports_is_a_no_op() {
    let (router, _events) = CaptureRouter::pair();
    let block = start_block(
        "portless",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            io.consume_each(10);
            io.produce_each(10);
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    block.perform_work().expect("work");

    let stats = block.snapshot().expect("snapshot").stats;
    assert_eq!(stats.items_consumed(0), 0);
    assert_eq!(stats.items_produced(0), 0);
    block.shutdown().expect("shutdown");
}

#[test]
fn a_negative_item_count_kills_the_block() {
    let (router, _events) = CaptureRouter::pair();
    let block = start_block(
        "corrupt",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            // A negative count computed by broken block math shows up
            // as a huge unsigned value with the sign bit set.
            io.consume(0, usize::MAX);
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    let err = block.perform_work().expect_err("work must abort");
    assert!(matches!(err, BlockError::ActorExited { .. }));
    // The actor is gone; later commands fail the same way.
    let err = block.snapshot().expect_err("actor is dead");
    assert!(matches!(err, BlockError::ActorExited { .. }));
    drop(block);
}

#[test]
fn input_message_cursor_never_rewinds() {
    let (router, _events) = CaptureRouter::pair();
    let (seen_tx, seen_rx) = crossbeam_channel::unbounded();
    let block = start_block(
        "msg-consumer",
        Box::new(FnLogic(move |io: &mut crate::BlockIo| {
            while let Some(msg) = io.pop_input_msg(0) {
                let _ = seen_tx.send(msg);
            }
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    let original = Payload::new(String::from("out-of-band"));
    block
        .endpoint()
        .deliver(0, Delivery::Payload(original.clone()))
        .expect("deliver payload");
    block
        .endpoint()
        .deliver(0, Delivery::Payload(Payload::new(7u32)))
        .expect("deliver payload");

    block.perform_work().expect("first work");
    // The second pass starts past the tail and must pop nothing.
    block.perform_work().expect("second work");

    let first = seen_rx.recv_timeout(RECV_TIMEOUT).expect("first message");
    assert!(first.same_value(&original));
    assert_eq!(first.downcast_ref::<String>().map(String::as_str), Some("out-of-band"));
    let second = seen_rx.recv_timeout(RECV_TIMEOUT).expect("second message");
    assert_eq!(second.downcast_ref::<u32>(), Some(&7));
    assert!(seen_rx.try_recv().is_err());

    let stats = block.snapshot().expect("snapshot").stats;
    assert_eq!(stats.msgs_consumed[0], 2);
    block.shutdown().expect("shutdown");
}

#[test]
fn popping_a_never_delivered_input_is_empty_twice_without_fault() {
    let (router, _events) = CaptureRouter::pair();
    let (seen_tx, seen_rx) = crossbeam_channel::unbounded();
    let block = start_block(
        "starved",
        Box::new(FnLogic(move |io: &mut crate::BlockIo| {
            let first = io.pop_input_msg(0).is_none();
            let second = io.pop_input_msg(0).is_none();
            let _ = seen_tx.send((first, second));
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    block.perform_work().expect("work");

    assert_eq!(
        seen_rx.recv_timeout(RECV_TIMEOUT).expect("pop results"),
        (true, true)
    );
    let stats = block.snapshot().expect("snapshot").stats;
    assert_eq!(stats.msgs_consumed[0], 0);
    block.shutdown().expect("shutdown");
}

#[test]
fn posting_messages_downstream_counts_them() {
    let (router, rx) = CaptureRouter::pair();
    let block = start_block(
        "msg-producer",
        Box::new(FnLogic(|io: &mut crate::BlockIo| {
            io.post_output_msg(1, Payload::new(42u64));
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    block.perform_work().expect("work");

    match rx.recv_timeout(RECV_TIMEOUT).expect("router event") {
        super::test_harness::RouterEvent::Downstream(1, Delivery::Payload(payload)) => {
            assert_eq!(payload.downcast_ref::<u64>(), Some(&42));
        }
        other => panic!("unexpected router event: {other:?}"),
    }
    let stats = block.snapshot().expect("snapshot").stats;
    assert_eq!(stats.msgs_produced[1], 1);
    block.shutdown().expect("shutdown");
}

#[test]
fn consuming_advances_the_queued_view() {
    let (router, _events) = CaptureRouter::pair();
    let (seen_tx, seen_rx) = crossbeam_channel::unbounded();
    let block = start_block(
        "peeker",
        Box::new(FnLogic(move |io: &mut crate::BlockIo| {
            let first = io.input_buffer(0).map(|b| b.as_slice()[0]);
            let _ = seen_tx.send(first);
            io.consume(0, 3);
            Ok(())
        })),
        Arc::new(HeapAllocator::default()),
        router,
    );

    block
        .endpoint()
        .deliver(
            0,
            Delivery::Buffer(buffer_with_bytes(&[1, 2, 3, 4, 5, 6, 7, 8])),
        )
        .expect("deliver buffer");

    block.perform_work().expect("first work");
    block.perform_work().expect("second work");

    assert_eq!(seen_rx.recv_timeout(RECV_TIMEOUT).expect("peek"), Some(1));
    assert_eq!(seen_rx.recv_timeout(RECV_TIMEOUT).expect("peek"), Some(4));
    block.shutdown().expect("shutdown");
}
