//! Boundary between the scheduling core and a vendor CAN peripheral.
//!
//! Everything register-level (bit timing, filter banks, NVIC numbers) lives
//! behind this trait so the core can run against a simulated controller.
use crate::protocol::transport::can_frame::CanFrame;

/// The two interrupt sources the core needs to mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqSource {
    /// A transmit mailbox finished and became free again.
    TxMailboxFree,
    /// A received frame is pending in the controller FIFO.
    RxFramePending,
}

/// Synchronous, non-blocking access to a CAN controller with a few transmit
/// mailboxes and an interrupt-fed receive FIFO.
///
/// Implementations deliver their interrupts into the core by calling
/// `on_frame_received` / `on_mailbox_free` on the owning driver (directly or
/// through a [`BusRegistry`](crate::driver::registry::BusRegistry)).
pub trait BusAdapter {
    type Error: core::fmt::Debug;

    /// Start the controller: bit timing, receive notifications and an
    /// accept-all extended-identifier filter. Interrupt sources stay masked.
    fn open(&mut self) -> Result<(), Self::Error>;

    /// `true` while at least one transmit mailbox can take a frame.
    fn mailboxes_free(&self) -> bool;

    /// Hand a frame to a free mailbox. `false` means the hardware refused it;
    /// callers never retry on their own.
    fn write_mailbox(&mut self, frame: &CanFrame) -> bool;

    /// Disable one interrupt source.
    fn mask_interrupt(&mut self, source: IrqSource);

    /// Re-enable one interrupt source.
    fn unmask_interrupt(&mut self, source: IrqSource);
}

/// Run `f` with `source` masked, so the matching interrupt handler cannot
/// preempt the sequence.
pub fn with_masked<A, R>(bus: &mut A, source: IrqSource, f: impl FnOnce(&mut A) -> R) -> R
where
    A: BusAdapter + ?Sized,
{
    bus.mask_interrupt(source);
    let result = f(bus);
    bus.unmask_interrupt(source);
    result
}
