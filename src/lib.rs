//! `korri-can-sched` library: the priority-aware buffering layer between an
//! interrupt-driven CAN controller (a few transmit mailboxes, one receive
//! FIFO) and NMEA 2000 protocol code, in a `no_std` environment. The crate
//! exposes the buffering primitives, the CAN transport types and traits, and
//! the driver core built from them.
#![no_std]
//==================================================================================
/// Domain and edge errors (controller open, registry wiring, async sends).
pub mod error;
/// Fixed-capacity, priority-partitioned frame buffers.
pub mod infra;
/// CAN transport: frames, identifiers, and the adapter / bus traits.
pub mod protocol;
/// Transmit scheduler, receive buffer, composed and shared drivers, and the
/// interrupt registry.
pub mod driver;
//==================================================================================
