//! Capability interface a protocol layer needs from its CAN transport.
//!
//! Protocol objects hold a transport by composition instead of inheriting
//! from a driver class.
use crate::protocol::transport::can_frame::CanFrame;

/// Synchronous frame transport: open once, then push and poll frames.
pub trait CanTransport {
    type Error: core::fmt::Debug;

    /// Bring the bus up. Calling it again is a no-op.
    fn open(&mut self) -> Result<(), Self::Error>;

    /// Queue or transmit a frame. `false` when the frame was dropped.
    fn send_frame(&mut self, frame: &CanFrame) -> bool;

    /// Next received frame in priority order, `None` when nothing is pending.
    fn get_frame(&mut self) -> Option<CanFrame>;
}
