//! Receive path: the interrupt handler pushes, the application polls.
use crate::infra::ring::{OverflowPolicy, PriorityRingBuffer};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::bus_adapter::{with_masked, BusAdapter, IrqSource};

/// Receive-side counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxStats {
    /// Frames accepted from the controller.
    pub received: u32,
    /// Frames dropped because the lane was full under `Reject`.
    pub dropped: u32,
    /// Unread frames overwritten by newer ones.
    pub overruns: u32,
}

/// Decouples the receive interrupt from the application consumer.
#[derive(Debug)]
pub struct RxBuffer<const N: usize, const P: usize> {
    ring: PriorityRingBuffer<N, P>,
    received: u32,
    dropped: u32,
}

impl<const N: usize, const P: usize> Default for RxBuffer<N, P> {
    fn default() -> Self {
        Self::new(OverflowPolicy::Overwrite)
    }
}

impl<const N: usize, const P: usize> RxBuffer<N, P> {
    pub const fn new(policy: OverflowPolicy) -> Self {
        Self {
            ring: PriorityRingBuffer::new(policy),
            received: 0,
            dropped: 0,
        }
    }

    pub fn buffer(&self) -> &PriorityRingBuffer<N, P> {
        &self.ring
    }

    /// Frames waiting for the application.
    pub fn pending(&self) -> usize {
        self.ring.len()
    }

    pub fn stats(&self) -> RxStats {
        RxStats {
            received: self.received,
            dropped: self.dropped,
            overruns: self.ring.overruns(),
        }
    }

    /// Receive interrupt: store the frame in its priority lane.
    pub fn on_frame_received(&mut self, frame: &CanFrame) {
        if self.ring.push(frame.priority(), frame) {
            self.received = self.received.wrapping_add(1);
        } else {
            self.dropped = self.dropped.wrapping_add(1);
        }
    }

    /// Application side: next frame in priority order, `None` when idle.
    /// Task context only, the receive interrupt is masked around the read.
    pub fn poll<A: BusAdapter + ?Sized>(&mut self, bus: &mut A) -> Option<CanFrame> {
        with_masked(bus, IrqSource::RxFramePending, |_| {
            self.ring.read_highest().copied()
        })
    }

    /// Same as [`RxBuffer::poll`] for callers that already own exclusive
    /// access (no interrupt can reach this buffer).
    pub fn pop(&mut self) -> Option<CanFrame> {
        self.ring.read_highest().copied()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
