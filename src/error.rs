//! Error definitions shared across library modules.
//!
//! The frame paths themselves never fail: buffering, overruns, oversized
//! payloads and unknown bus handles all degrade gracefully. Errors only exist
//! at the edges (opening the controller, wiring the registry, async sends).
use thiserror_no_std::Error;

use crate::driver::registry::BusHandle;

#[derive(Error, Debug)]
/// Failures while bringing a driver up.
pub enum DriverError<E: core::fmt::Debug> {
    /// The bus adapter could not start the controller.
    #[error("CAN controller open failed: {0:?}")]
    Open(E),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while wiring drivers into a [`BusRegistry`](crate::driver::registry::BusRegistry).
pub enum RegistryError {
    /// Every registry entry is taken.
    #[error("Bus registry full")]
    Full,
    /// Another driver already owns this hardware handle.
    #[error("Bus handle {handle:?} already registered")]
    AlreadyRegistered { handle: BusHandle },
}

#[derive(Error, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors surfaced by the async [`CanBus`](crate::protocol::transport::traits::can_bus::CanBus) wrapper.
pub enum BusError {
    /// The frame was neither written to a mailbox nor buffered.
    #[error("Frame rejected by the CAN controller")]
    TransmitRejected,
}
