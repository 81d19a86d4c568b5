//! # Quickstart Example
//!
//! Minimal walk through the driver core:
//! - Implement a `BusAdapter` for a (simulated) controller
//! - Queue frames before and after `open`
//! - Feed completion and receive interrupts
//!
//! This example uses `std` and a fake controller with three mailboxes.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use korri_can_sched::driver::{DefaultDriver, DriverConfig};
use korri_can_sched::protocol::transport::can_frame::CanFrame;
use korri_can_sched::protocol::transport::can_id::CanId;
use korri_can_sched::protocol::transport::traits::bus_adapter::{BusAdapter, IrqSource};

/// Controller stand-in: prints every mailbox write and mask change.
struct PrintController {
    in_flight: usize,
}

impl BusAdapter for PrintController {
    type Error = ();

    fn open(&mut self) -> Result<(), Self::Error> {
        println!("   [hw] controller started");
        Ok(())
    }

    fn mailboxes_free(&self) -> bool {
        self.in_flight < 3
    }

    fn write_mailbox(&mut self, frame: &CanFrame) -> bool {
        if !self.mailboxes_free() {
            return false;
        }
        self.in_flight += 1;
        println!(
            "   [hw] mailbox <- prio {} pgn {} data {:02X?}",
            frame.priority(),
            frame.id.pgn(),
            frame.payload()
        );
        true
    }

    fn mask_interrupt(&mut self, source: IrqSource) {
        println!("   [hw] mask   {:?}", source);
    }

    fn unmask_interrupt(&mut self, source: IrqSource) {
        println!("   [hw] unmask {:?}", source);
    }
}

fn frame(priority: u8, pgn: u32, tag: u8) -> CanFrame {
    CanFrame::new_extended(CanId::from_parts(priority, pgn, 0x23), &[tag; 8])
}

fn main() {
    println!("=== korri-can-sched Quickstart ===\n");

    let mut driver: DefaultDriver<PrintController> =
        DefaultDriver::new(PrintController { in_flight: 0 }, DriverConfig::default());

    // ======================================================================
    // 1. Frames sent before open wait in the buffer
    // ======================================================================
    println!("1. Queueing before open");
    driver.send_frame(&frame(6, 127250, 0x01)); // Heading, low priority
    driver.send_frame(&frame(2, 129025, 0x02)); // Position rapid update
    println!("   pending: {}\n", driver.tx().pending());

    // ======================================================================
    // 2. Opening flushes them in priority order
    // ======================================================================
    println!("2. Opening the bus");
    if let Err(e) = driver.open() {
        eprintln!("   open failed: {}", e);
        return;
    }
    println!();

    // ======================================================================
    // 3. Saturate the mailboxes, then let completions drain the buffer
    // ======================================================================
    println!("3. Saturating the mailboxes");
    driver.send_frame(&frame(3, 130306, 0x03)); // Wind data
    driver.send_frame(&frame(7, 126996, 0x04)); // Product info, lowest class
    driver.send_frame(&frame(0, 129026, 0x05)); // COG/SOG
    println!("   pending: {}", driver.tx().pending());

    while driver.tx().pending() > 0 {
        println!("   [irq] mailbox free");
        driver.adapter_mut().in_flight -= 1;
        driver.on_mailbox_free();
    }
    println!();

    // ======================================================================
    // 4. Receive interrupts fill the rx buffer, polled by priority
    // ======================================================================
    println!("4. Receiving");
    driver.on_frame_received(&frame(5, 130312, 0x10)); // Temperature
    driver.on_frame_received(&frame(2, 127245, 0x11)); // Rudder
    while let Some(frame) = driver.get_frame() {
        println!("   got prio {} pgn {}", frame.priority(), frame.id.pgn());
    }
    println!();

    let stats = driver.stats();
    println!("Stats: {:?}", stats);
    println!("\nQuickstart complete.");
}
