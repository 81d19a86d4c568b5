//! NMEA 2000 transport layer: CAN frame representation, 29-bit identifier
//! decoding, and the traits that connect the driver core to hardware and to
//! protocol code.
//!
//! ## Buffer sizing
//!
//! The constants below are the defaults used by
//! [`DefaultDriver`](crate::driver::DefaultDriver). They match common NMEA 2000
//! controller setups where only three transmit mailboxes exist.

pub mod can_frame;
pub mod can_id;
pub mod traits;

/// Number of priority lanes per buffer. Classes 6 and 7 share the last lane.
pub const DEFAULT_PRIORITY_LANES: usize = 7;

/// Default receive buffer size (frames).
pub const DEFAULT_RX_FRAMES: usize = 32;

/// Smallest receive buffer worth configuring. Below this a burst of
/// fast-packet traffic overruns lanes before the application polls.
pub const MIN_RX_FRAMES: usize = 10;

/// Default transmit buffer size (frames).
///
/// Fast-packet PGNs of up to 223 bytes need 32 frames; the margin leaves room
/// for single-frame traffic queued in between.
pub const DEFAULT_TX_FRAMES: usize = 50;

/// Smallest transmit buffer worth configuring.
pub const MIN_TX_FRAMES: usize = 30;

/// Receive buffer size for a requested frame count, raised to
/// [`MIN_RX_FRAMES`]. Usable in const generic position:
/// `N2kCanDriver<A, { tx_frames(20) }, { rx_frames(4) }>`.
pub const fn rx_frames(requested: usize) -> usize {
    if requested < MIN_RX_FRAMES {
        MIN_RX_FRAMES
    } else {
        requested
    }
}

/// Transmit buffer size for a requested frame count, raised to
/// [`MIN_TX_FRAMES`].
pub const fn tx_frames(requested: usize) -> usize {
    if requested < MIN_TX_FRAMES {
        MIN_TX_FRAMES
    } else {
        requested
    }
}
