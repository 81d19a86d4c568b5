//! Async `CanBus` view over an interrupt-shared driver.
mod helpers;

use std::sync::Arc;

use helpers::{tagged, SimController};
use korri_can_sched::driver::registry::CanInterrupts;
use korri_can_sched::driver::shared::SharedDriver;
use korri_can_sched::driver::DriverConfig;
use korri_can_sched::infra::ring::OverflowPolicy;
use korri_can_sched::error::BusError;
use korri_can_sched::protocol::transport::traits::can_bus::CanBus;
use tokio::time::{sleep, timeout, Duration};

type Bus = SharedDriver<SimController, 14, 14>;

#[tokio::test]
async fn test_recv_wakes_on_receive_interrupt() {
    let shared = Arc::new(Bus::new(SimController::new(3), DriverConfig::default()));
    shared.open().expect("sim opens");

    let isr = Arc::clone(&shared);
    let producer = tokio::spawn(async move {
        sleep(Duration::from_millis(20)).await;
        isr.on_frame_received(&tagged(3, 33));
    });

    let mut bus = shared.bus();
    let frame = timeout(Duration::from_secs(1), bus.recv())
        .await
        .expect("receive interrupt must wake the reader")
        .expect("recv never fails");
    assert_eq!(frame.data[0], 33);
    producer.await.expect("producer task");
}

#[tokio::test]
async fn test_recv_returns_buffered_frames_first() {
    let shared = Bus::new(SimController::new(3), DriverConfig::default());
    shared.open().expect("sim opens");
    shared.on_frame_received(&tagged(6, 60));
    shared.on_frame_received(&tagged(0, 1));

    let mut bus = shared.bus();
    assert_eq!(bus.recv().await.map(|f| f.data[0]), Ok(1));
    assert_eq!(bus.recv().await.map(|f| f.data[0]), Ok(60));
}

#[tokio::test]
async fn test_send_goes_through_scheduler() {
    let shared = Bus::new(SimController::new(1), DriverConfig::default());
    shared.open().expect("sim opens");

    let mut bus = shared.bus();
    bus.send(&tagged(4, 1)).await.expect("direct send");
    bus.send(&tagged(4, 2)).await.expect("buffered");
    assert_eq!(shared.with(|d| d.adapter().wire_tags()), vec![1]);

    shared.with(|d| d.adapter_mut().finish_one());
    shared.on_mailbox_free();
    assert_eq!(shared.with(|d| d.adapter().wire_tags()), vec![1, 2]);
}

#[tokio::test]
async fn test_send_reports_rejection() {
    let config = DriverConfig {
        tx_overflow: OverflowPolicy::Reject,
        ..DriverConfig::default()
    };
    // 7 slots over 7 lanes: a single slot per lane.
    let shared = SharedDriver::<SimController, 7, 7>::new(SimController::new(1), config);
    shared.open().expect("sim opens");

    let mut bus = shared.bus();
    bus.send(&tagged(2, 1)).await.expect("direct send");
    bus.send(&tagged(2, 2)).await.expect("buffered");
    assert_eq!(bus.send(&tagged(2, 3)).await, Err(BusError::TransmitRejected));
}
