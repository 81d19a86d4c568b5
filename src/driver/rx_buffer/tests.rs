//! Receive buffer ordering, overrun reporting and masking.
extern crate std;

use std::vec;

use super::*;
use crate::driver::mock::MockAdapter;
use crate::protocol::transport::can_id::CanId;

fn frame(priority: u8, tag: u8) -> CanFrame {
    CanFrame::new_extended(CanId::from_parts(priority, 129026, tag), &[tag, 0, 0])
}

#[test]
/// Nothing pending is the normal idle state, not an error.
fn test_poll_empty_returns_none() {
    let mut bus = MockAdapter::with_mailboxes(3);
    let mut rx = RxBuffer::<32, 7>::default();
    assert!(rx.poll(&mut bus).is_none());
    assert_eq!(rx.stats(), RxStats::default());
}

#[test]
/// Frames arriving in any order are handed out highest priority first.
fn test_poll_in_priority_order() {
    let mut bus = MockAdapter::with_mailboxes(3);
    let mut rx = RxBuffer::<32, 7>::default();
    rx.on_frame_received(&frame(6, 60));
    rx.on_frame_received(&frame(2, 20));
    rx.on_frame_received(&frame(6, 61));
    rx.on_frame_received(&frame(2, 21));

    let mut tags = vec![];
    while let Some(frame) = rx.poll(&mut bus) {
        tags.push(frame.data[0]);
    }
    assert_eq!(tags, vec![20, 21, 60, 61]);
    assert_eq!(rx.stats().received, 4);
}

#[test]
/// `poll` brackets the read with the receive source only.
fn test_poll_masks_rx_interrupt() {
    let mut bus = MockAdapter::with_mailboxes(3);
    let mut rx = RxBuffer::<32, 7>::default();
    rx.on_frame_received(&frame(1, 1));
    assert!(bus.mask_log.is_empty());

    rx.poll(&mut bus);
    assert_eq!(
        bus.mask_log,
        vec![(IrqSource::RxFramePending, true), (IrqSource::RxFramePending, false)]
    );
    assert!(bus.masked.is_empty());
}

#[test]
/// A burst larger than the lane keeps the newest frames and flags the loss.
fn test_burst_overruns_lane() {
    // 7 slots over 7 lanes: one per lane.
    let mut rx = RxBuffer::<7, 7>::default();
    rx.on_frame_received(&frame(3, 1));
    rx.on_frame_received(&frame(3, 2));

    let latest = rx.pop().expect("newest frame kept");
    assert_eq!(latest.data[0], 2);
    assert!(latest.flags.overrun);
    assert_eq!(rx.stats().overruns, 1);
    assert!(rx.pop().is_none());
}

#[test]
/// Hardware fields (remote, length) are copied as received; DLC above 8 is clamped.
fn test_hardware_fields_copied() {
    let mut rx = RxBuffer::<14, 7>::default();
    let mut incoming = frame(0, 9);
    incoming.flags.remote = true;
    incoming.len = 12;
    rx.on_frame_received(&incoming);

    let stored = rx.pop().expect("stored");
    assert!(stored.flags.remote);
    assert!(stored.flags.extended);
    assert_eq!(stored.len, 8);
    assert_eq!(stored.id, incoming.id);
}

#[test]
/// Under `Reject` a full lane drops the newcomer and counts it.
fn test_reject_policy_counts_drops() {
    let mut rx = RxBuffer::<7, 7>::new(OverflowPolicy::Reject);
    rx.on_frame_received(&frame(5, 1));
    rx.on_frame_received(&frame(5, 2));
    assert_eq!(rx.stats().dropped, 1);
    assert_eq!(rx.pop().map(|f| f.data[0]), Some(1));
}
