//! In-memory representation of a classic CAN 2.0B frame as it travels between
//! the application, the software buffers, and the controller mailboxes.
use embedded_can::{ExtendedId, Id, StandardId};

use crate::protocol::transport::can_id::{CanId, EXTENDED_ID_MASK, STANDARD_ID_MASK};

/// Largest payload a classic CAN frame can carry.
pub const MAX_FRAME_DATA: usize = 8;

/// Frame type flags and buffer diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameFlags {
    /// Identifier is extended (29-bit). NMEA 2000 traffic always sets it.
    pub extended: bool,
    /// Remote transmission request.
    pub remote: bool,
    /// Set by the buffer when this slot replaced a frame nobody consumed.
    /// Diagnostic only, the frame is still delivered.
    pub overrun: bool,
}

impl FrameFlags {
    /// Extended data frame, no diagnostics.
    pub const EXTENDED: Self = Self {
        extended: true,
        remote: false,
        overrun: false,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw NMEA 2000 frame as read from or written to the CAN controller.
pub struct CanFrame {
    /// CAN identifier (29 bits when `flags.extended`, 11 bits otherwise).
    pub id: CanId,
    /// Payload buffer. Bytes past `len` are ignored.
    pub data: [u8; MAX_FRAME_DATA],
    /// Number of valid payload bytes (Data Length Code). Anything above 8 is
    /// treated as 8.
    pub len: usize,
    pub flags: FrameFlags,
}

impl Default for CanFrame {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl CanFrame {
    /// Zeroed extended frame used to pre-fill buffer slots.
    pub const EMPTY: Self = Self {
        id: CanId(0),
        data: [0; MAX_FRAME_DATA],
        len: 0,
        flags: FrameFlags::EXTENDED,
    };

    /// Build an extended data frame. Payloads longer than eight bytes are
    /// truncated to the first eight.
    pub fn new_extended(id: CanId, payload: &[u8]) -> Self {
        let len = payload.len().min(MAX_FRAME_DATA);
        let mut data = [0; MAX_FRAME_DATA];
        data[..len].copy_from_slice(&payload[..len]);
        Self {
            id: CanId::new(id.0),
            data,
            len,
            flags: FrameFlags::EXTENDED,
        }
    }

    /// Priority class used to select the buffer lane.
    #[inline]
    pub fn priority(&self) -> u8 {
        self.id.priority()
    }

    /// Effective data length, clamped to the hardware limit.
    #[inline]
    pub fn dlc(&self) -> usize {
        self.len.min(MAX_FRAME_DATA)
    }

    /// Valid payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.dlc()]
    }

    /// Identifier reduced to the bits its frame format carries: 29 for
    /// extended frames, 11 for standard ones.
    #[inline]
    pub fn wire_id(&self) -> u32 {
        if self.flags.extended {
            self.id.0 & EXTENDED_ID_MASK
        } else {
            self.id.0 & STANDARD_ID_MASK
        }
    }

    /// Copy with the identifier masked to its format, `len` clamped to 8 and
    /// the overrun marker cleared, i.e. the form in which a frame enters a
    /// buffer or a mailbox.
    #[inline]
    pub fn normalized(&self) -> Self {
        Self {
            id: CanId(self.wire_id()),
            len: self.dlc(),
            flags: FrameFlags {
                overrun: false,
                ..self.flags
            },
            ..*self
        }
    }
}

//==================================================================================EMBEDDED_CAN
impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > MAX_FRAME_DATA {
            return None;
        }
        let (raw, extended) = split_id(id.into());
        let mut frame = Self::new_extended(CanId(raw), data);
        frame.flags.extended = extended;
        Some(frame)
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_FRAME_DATA {
            return None;
        }
        let (raw, extended) = split_id(id.into());
        Some(Self {
            id: CanId(raw),
            data: [0; MAX_FRAME_DATA],
            len: dlc,
            flags: FrameFlags {
                extended,
                remote: true,
                overrun: false,
            },
        })
    }

    fn is_extended(&self) -> bool {
        self.flags.extended
    }

    fn is_remote_frame(&self) -> bool {
        self.flags.remote
    }

    fn id(&self) -> Id {
        // Masked ids always fit, the fallbacks only keep the
        // lowest-priority identifier as a floor.
        let raw = self.wire_id();
        if self.flags.extended {
            Id::Extended(ExtendedId::new(raw).unwrap_or(ExtendedId::MAX))
        } else {
            Id::Standard(StandardId::new(raw as u16).unwrap_or(StandardId::MAX))
        }
    }

    fn dlc(&self) -> usize {
        CanFrame::dlc(self)
    }

    fn data(&self) -> &[u8] {
        if self.flags.remote {
            &[]
        } else {
            self.payload()
        }
    }
}

fn split_id(id: Id) -> (u32, bool) {
    match id {
        Id::Standard(id) => (id.as_raw() as u32, false),
        Id::Extended(id) => (id.as_raw(), true),
    }
}
