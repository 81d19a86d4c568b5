//! Handle-based dispatch of interrupt events.
use core::sync::atomic::{AtomicU32, Ordering};

use super::*;
use crate::protocol::transport::can_id::CanId;

#[derive(Default)]
struct Counter {
    frames: AtomicU32,
    mailbox_events: AtomicU32,
}

impl CanInterrupts for Counter {
    fn on_frame_received(&self, _frame: &CanFrame) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    fn on_mailbox_free(&self) {
        self.mailbox_events.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
/// Events reach the driver registered for that handle and no other.
fn test_dispatch_by_handle() {
    let can1 = Counter::default();
    let can2 = Counter::default();
    let mut registry = BusRegistry::<2>::new();
    registry.register(BusHandle(0x4000_6400), &can1).expect("slot free");
    registry.register(BusHandle(0x4000_6800), &can2).expect("slot free");

    let frame = CanFrame::new_extended(CanId::from_parts(2, 129025, 1), &[0; 8]);
    assert!(registry.on_frame_received(BusHandle(0x4000_6800), &frame));
    assert!(registry.on_mailbox_free(BusHandle(0x4000_6400)));

    assert_eq!(can1.frames.load(Ordering::Relaxed), 0);
    assert_eq!(can1.mailbox_events.load(Ordering::Relaxed), 1);
    assert_eq!(can2.frames.load(Ordering::Relaxed), 1);
    assert_eq!(can2.mailbox_events.load(Ordering::Relaxed), 0);
}

#[test]
/// Unknown handles are a silent no-op.
fn test_unknown_handle_dropped() {
    let can1 = Counter::default();
    let mut registry = BusRegistry::<1>::new();
    registry.register(BusHandle(1), &can1).expect("slot free");

    assert!(!registry.on_mailbox_free(BusHandle(2)));
    assert!(!registry.on_frame_received(BusHandle(2), &CanFrame::EMPTY));
    assert_eq!(can1.mailbox_events.load(Ordering::Relaxed), 0);
    assert!(BusRegistry::<0>::new().lookup(BusHandle(1)).is_none());
}

#[test]
/// Registration fails when full or when the handle is taken.
fn test_register_errors() {
    let a = Counter::default();
    let b = Counter::default();
    let mut registry = BusRegistry::<1>::new();
    assert!(registry.is_empty());
    registry.register(BusHandle(7), &a).expect("slot free");

    assert_eq!(
        registry.register(BusHandle(7), &b).err(),
        Some(RegistryError::AlreadyRegistered {
            handle: BusHandle(7)
        })
    );
    assert_eq!(
        registry.register(BusHandle(8), &b).err(),
        Some(RegistryError::Full)
    );
    assert_eq!(registry.len(), 1);
}

#[test]
/// Pointer identity gives distinct handles for distinct peripherals.
fn test_handle_from_ptr() {
    let first = [0u32; 2];
    let h0 = BusHandle::from_ptr(&first[0] as *const u32);
    let h1 = BusHandle::from_ptr(&first[1] as *const u32);
    assert_ne!(h0, h1);
    assert_eq!(h0, BusHandle::from_ptr(&first[0] as *const u32));
}
