//! Allocation-free building blocks shared by the transmit and receive paths.
pub mod ring;
