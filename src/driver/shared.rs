//! Driver instance reachable from both task and interrupt context.
//!
//! The composed driver sits behind an [`embassy_sync::blocking_mutex::Mutex`]
//! so interrupt handlers (through a [`BusRegistry`](super::registry::BusRegistry)
//! or directly) and application code can share one `'static` instance.
//! The receive path raises a [`Signal`] so async consumers can sleep between
//! frames instead of polling.
use core::cell::RefCell;

use embassy_sync::{
    blocking_mutex::{
        raw::{CriticalSectionRawMutex, RawMutex},
        Mutex,
    },
    signal::Signal,
};

use crate::driver::registry::CanInterrupts;
use crate::driver::{DriverConfig, DriverStats, N2kCanDriver};
use crate::error::{BusError, DriverError};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::bus_adapter::BusAdapter;
use crate::protocol::transport::traits::can_bus::CanBus;
use crate::protocol::transport::DEFAULT_PRIORITY_LANES;

/// [`N2kCanDriver`] guarded by a blocking mutex of kind `M`.
pub struct SharedDriver<
    A: BusAdapter,
    const TX: usize,
    const RX: usize,
    const P: usize = DEFAULT_PRIORITY_LANES,
    M: RawMutex = CriticalSectionRawMutex,
> {
    driver: Mutex<M, RefCell<N2kCanDriver<A, TX, RX, P>>>,
    rx_ready: Signal<M, ()>,
}

impl<A, const TX: usize, const RX: usize, const P: usize, M> SharedDriver<A, TX, RX, P, M>
where
    A: BusAdapter,
    M: RawMutex,
{
    pub const fn new(adapter: A, config: DriverConfig) -> Self {
        Self::from_driver(N2kCanDriver::new(adapter, config))
    }

    pub const fn from_driver(driver: N2kCanDriver<A, TX, RX, P>) -> Self {
        Self {
            driver: Mutex::new(RefCell::new(driver)),
            rx_ready: Signal::new(),
        }
    }

    /// Run `f` with exclusive access to the driver.
    ///
    /// # Panics
    /// When called re-entrantly from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut N2kCanDriver<A, TX, RX, P>) -> R) -> R {
        self.driver.lock(|cell| f(&mut *cell.borrow_mut()))
    }

    /// Like [`Self::with`] but gives up instead of panicking when the driver
    /// is already borrowed.
    fn try_with<R>(&self, f: impl FnOnce(&mut N2kCanDriver<A, TX, RX, P>) -> R) -> Option<R> {
        self.driver
            .lock(|cell| cell.try_borrow_mut().ok().map(|mut driver| f(&mut *driver)))
    }

    pub fn open(&self) -> Result<(), DriverError<A::Error>> {
        self.with(|driver| driver.open())
    }

    /// Transmit or buffer `frame` (task context).
    pub fn send_frame(&self, frame: &CanFrame) -> bool {
        self.with(|driver| driver.send_frame(frame))
    }

    /// Next received frame in priority order (task context).
    pub fn get_frame(&self) -> Option<CanFrame> {
        self.with(|driver| driver.get_frame())
    }

    pub fn stats(&self) -> DriverStats {
        self.with(|driver| driver.stats())
    }

    /// Async [`CanBus`] view of this driver.
    pub fn bus(&self) -> SharedBus<'_, A, TX, RX, P, M> {
        SharedBus { shared: self }
    }
}

impl<A, const TX: usize, const RX: usize, const P: usize, M> CanInterrupts
    for SharedDriver<A, TX, RX, P, M>
where
    A: BusAdapter,
    M: RawMutex,
{
    fn on_frame_received(&self, frame: &CanFrame) {
        if self
            .try_with(|driver| driver.on_frame_received(frame))
            .is_some()
        {
            self.rx_ready.signal(());
        }
    }

    fn on_mailbox_free(&self) {
        let _ = self.try_with(|driver| driver.on_mailbox_free());
    }
}

/// Async bus handle borrowed from a [`SharedDriver`].
pub struct SharedBus<'a, A, const TX: usize, const RX: usize, const P: usize, M>
where
    A: BusAdapter,
    M: RawMutex,
{
    shared: &'a SharedDriver<A, TX, RX, P, M>,
}

impl<'a, A, const TX: usize, const RX: usize, const P: usize, M> CanBus
    for SharedBus<'a, A, TX, RX, P, M>
where
    A: BusAdapter,
    M: RawMutex,
{
    type Error = BusError;

    async fn send<'b>(&'b mut self, frame: &'b CanFrame) -> Result<(), Self::Error> {
        if self.shared.send_frame(frame) {
            Ok(())
        } else {
            Err(BusError::TransmitRejected)
        }
    }

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        loop {
            if let Some(frame) = self.shared.get_frame() {
                return Ok(frame);
            }
            // A frame landing between the poll and this wait leaves the
            // signal set, so the wait returns at once.
            self.shared.rx_ready.wait().await;
        }
    }
}
