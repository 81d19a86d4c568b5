//! Protocol-facing side of the driver: CAN frame and identifier types, and
//! the traits protocol code uses to reach the bus.
pub mod transport;
