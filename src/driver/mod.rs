//! Interrupt-driven CAN driver core.
//!
//! [`N2kCanDriver`] composes a [`BusAdapter`] with a transmit scheduler and a
//! receive buffer. Task-context calls (`send_frame`, `get_frame`) mask the
//! matching interrupt source; interrupt-context calls (`on_frame_received`,
//! `on_mailbox_free`) never mask anything and never allocate.
//!
//! Sizing is fixed by the const parameters: `TX` / `RX` frame slots split
//! over `P` priority lanes. Pass counts through
//! [`tx_frames`](crate::protocol::transport::tx_frames) /
//! [`rx_frames`](crate::protocol::transport::rx_frames) to keep them at or
//! above the recommended floors.
use crate::error::DriverError;
use crate::infra::ring::OverflowPolicy;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::bus_adapter::{BusAdapter, IrqSource};
use crate::protocol::transport::traits::can_transport::CanTransport;
use crate::protocol::transport::{
    rx_frames, tx_frames, DEFAULT_PRIORITY_LANES, DEFAULT_RX_FRAMES, DEFAULT_TX_FRAMES,
};

pub mod registry;
pub mod rx_buffer;
pub mod shared;
pub mod tx_scheduler;

#[cfg(test)]
pub(crate) mod mock;

use rx_buffer::{RxBuffer, RxStats};
use tx_scheduler::{TxScheduler, TxStats};

/// Driver sized with the stock buffer lengths.
pub type DefaultDriver<A> =
    N2kCanDriver<A, { tx_frames(DEFAULT_TX_FRAMES) }, { rx_frames(DEFAULT_RX_FRAMES) }>;

/// Choices fixed at construction time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverConfig {
    pub tx_overflow: OverflowPolicy,
    pub rx_overflow: OverflowPolicy,
}

/// Snapshot of both directions' counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverStats {
    pub tx: TxStats,
    pub rx: RxStats,
    /// Mailbox-free events that arrived before `open`.
    pub ignored_events: u32,
}

/// One CAN controller with its transmit scheduler and receive buffer.
pub struct N2kCanDriver<
    A: BusAdapter,
    const TX: usize,
    const RX: usize,
    const P: usize = DEFAULT_PRIORITY_LANES,
> {
    adapter: A,
    tx: TxScheduler<TX, P>,
    rx: RxBuffer<RX, P>,
    opened: bool,
    ignored_events: u32,
}

impl<A: BusAdapter, const TX: usize, const RX: usize, const P: usize> N2kCanDriver<A, TX, RX, P> {
    /// Build a driver around `adapter`. Buffers are allocated inline here and
    /// never resized; interrupt sources stay masked until [`Self::open`].
    pub const fn new(adapter: A, config: DriverConfig) -> Self {
        Self {
            adapter,
            tx: TxScheduler::new(config.tx_overflow),
            rx: RxBuffer::new(config.rx_overflow),
            opened: false,
            ignored_events: 0,
        }
    }

    /// Start the controller, then unmask both interrupt sources for the first
    /// time and push out anything submitted before.
    pub fn open(&mut self) -> Result<(), DriverError<A::Error>> {
        if self.opened {
            return Ok(());
        }
        self.adapter.open().map_err(DriverError::Open)?;
        self.opened = true;

        self.adapter.unmask_interrupt(IrqSource::RxFramePending);
        self.adapter.unmask_interrupt(IrqSource::TxMailboxFree);

        let _flushed = self.tx.flush(&mut self.adapter);
        #[cfg(feature = "defmt")]
        defmt::info!("CAN open, {} buffered frame(s) flushed", _flushed);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// Transmit or buffer `frame` (task context).
    pub fn send_frame(&mut self, frame: &CanFrame) -> bool {
        if self.opened {
            self.tx.submit(&mut self.adapter, frame)
        } else {
            self.tx.enqueue(frame)
        }
    }

    /// Next received frame in priority order (task context).
    pub fn get_frame(&mut self) -> Option<CanFrame> {
        if self.opened {
            self.rx.poll(&mut self.adapter)
        } else {
            self.rx.pop()
        }
    }

    //==================================================================================INTERRUPT_ENTRY
    /// Receive interrupt entry point.
    pub fn on_frame_received(&mut self, frame: &CanFrame) {
        self.rx.on_frame_received(frame);
    }

    /// Mailbox completion interrupt entry point, once per freed mailbox.
    pub fn on_mailbox_free(&mut self) {
        if !self.opened {
            self.ignored_events = self.ignored_events.wrapping_add(1);
            return;
        }
        self.tx.on_mailbox_free(&mut self.adapter);
    }

    //==================================================================================ACCESSORS
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn tx(&self) -> &TxScheduler<TX, P> {
        &self.tx
    }

    pub fn rx(&self) -> &RxBuffer<RX, P> {
        &self.rx
    }

    pub fn stats(&self) -> DriverStats {
        DriverStats {
            tx: self.tx.stats(),
            rx: self.rx.stats(),
            ignored_events: self.ignored_events,
        }
    }
}

impl<A: BusAdapter, const TX: usize, const RX: usize, const P: usize> CanTransport
    for N2kCanDriver<A, TX, RX, P>
{
    type Error = DriverError<A::Error>;

    fn open(&mut self) -> Result<(), Self::Error> {
        N2kCanDriver::open(self)
    }

    fn send_frame(&mut self, frame: &CanFrame) -> bool {
        N2kCanDriver::send_frame(self, frame)
    }

    fn get_frame(&mut self) -> Option<CanFrame> {
        N2kCanDriver::get_frame(self)
    }
}
