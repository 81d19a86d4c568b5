//! Transmit admission and drain policy.
//!
//! The controller only has a handful of mailboxes. Frames that cannot go out
//! right away wait in a [`PriorityRingBuffer`]; every mailbox-free interrupt
//! drains the highest-priority waiting frame. Frames never overtake a
//! buffered frame of the same or a higher priority.
use crate::infra::ring::{OverflowPolicy, PriorityRingBuffer};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::bus_adapter::{with_masked, BusAdapter, IrqSource};

/// Transmit-side counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxStats {
    /// Frames written straight to a mailbox by `submit`.
    pub direct: u32,
    /// Frames that went through the buffer.
    pub buffered: u32,
    /// Buffered frames later handed to a mailbox.
    pub drained: u32,
    /// Mailbox writes refused by the hardware.
    pub rejected: u32,
    /// Buffered frames overwritten before they could be sent.
    pub overruns: u32,
}

/// Owns the transmit buffer and decides buffer-vs-send for each frame.
#[derive(Debug)]
pub struct TxScheduler<const N: usize, const P: usize> {
    ring: PriorityRingBuffer<N, P>,
    direct: u32,
    buffered: u32,
    drained: u32,
    rejected: u32,
}

impl<const N: usize, const P: usize> Default for TxScheduler<N, P> {
    fn default() -> Self {
        Self::new(OverflowPolicy::Overwrite)
    }
}

impl<const N: usize, const P: usize> TxScheduler<N, P> {
    pub const fn new(policy: OverflowPolicy) -> Self {
        Self {
            ring: PriorityRingBuffer::new(policy),
            direct: 0,
            buffered: 0,
            drained: 0,
            rejected: 0,
        }
    }

    /// Read-only view of the transmit buffer.
    pub fn buffer(&self) -> &PriorityRingBuffer<N, P> {
        &self.ring
    }

    /// Frames waiting for a mailbox.
    pub fn pending(&self) -> usize {
        self.ring.len()
    }

    pub fn stats(&self) -> TxStats {
        TxStats {
            direct: self.direct,
            buffered: self.buffered,
            drained: self.drained,
            rejected: self.rejected,
            overruns: self.ring.overruns(),
        }
    }

    //==================================================================================TASK_CONTEXT
    /// Send `frame` now or buffer it. Task context only: the mailbox-free
    /// interrupt is masked for the whole check-buffer-or-send sequence.
    ///
    /// Returns `true` when the frame was written or buffered. `false` means
    /// either the hardware refused a direct write or the buffer rejected the
    /// frame (only possible with [`OverflowPolicy::Reject`]).
    pub fn submit<A: BusAdapter + ?Sized>(&mut self, bus: &mut A, frame: &CanFrame) -> bool {
        with_masked(bus, IrqSource::TxMailboxFree, |bus| self.admit(bus, frame))
    }

    /// Buffer `frame` without touching the hardware. No mask bracket, so only
    /// valid while the mailbox-free interrupt cannot reach this scheduler
    /// (controller not open yet).
    pub(crate) fn enqueue(&mut self, frame: &CanFrame) -> bool {
        let accepted = self.ring.push(frame.priority(), frame);
        if accepted {
            self.buffered = self.buffered.wrapping_add(1);
        }
        accepted
    }

    /// Drain buffered frames while mailboxes are free. Used once the
    /// controller comes up with frames already waiting.
    pub fn flush<A: BusAdapter + ?Sized>(&mut self, bus: &mut A) -> usize {
        with_masked(bus, IrqSource::TxMailboxFree, |bus| self.drain_while_free(bus))
    }

    fn admit<A: BusAdapter + ?Sized>(&mut self, bus: &mut A, frame: &CanFrame) -> bool {
        let full = !bus.mailboxes_free();

        // Anything already waiting goes first, whatever its lane: buffer this
        // frame behind it and let the priority scan pick.
        if full || !self.ring.is_empty() {
            if !self.enqueue(frame) {
                return false;
            }
            if !full {
                self.drain_while_free(bus);
            }
            return true;
        }

        let written = bus.write_mailbox(&frame.normalized());
        if written {
            self.direct = self.direct.wrapping_add(1);
        } else {
            self.rejected = self.rejected.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("mailbox write rejected for id {=u32:#x}", frame.id.0);
        }
        written
    }

    //==================================================================================INTERRUPT_CONTEXT
    /// Mailbox completion event: hand the highest-priority buffered frame to
    /// the hardware. Nothing pending means idle capacity, nothing to do.
    ///
    /// Returns `true` when a frame was written.
    pub fn on_mailbox_free<A: BusAdapter + ?Sized>(&mut self, bus: &mut A) -> bool {
        self.drain_one(bus)
    }

    /// The head frame leaves the buffer only once a mailbox accepted it.
    fn drain_one<A: BusAdapter + ?Sized>(&mut self, bus: &mut A) -> bool {
        let Some(head) = self.ring.front() else {
            return false;
        };
        if bus.write_mailbox(&head.normalized()) {
            self.ring.read_highest();
            self.drained = self.drained.wrapping_add(1);
            true
        } else {
            self.rejected = self.rejected.wrapping_add(1);
            false
        }
    }

    fn drain_while_free<A: BusAdapter + ?Sized>(&mut self, bus: &mut A) -> usize {
        let mut sent = 0;
        while bus.mailboxes_free() && self.drain_one(bus) {
            sent += 1;
        }
        sent
    }
}
