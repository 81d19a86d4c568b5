//! 29-bit CAN identifiers as used by NMEA 2000 (SAE J1939 layout).
//!
//! Only the fields the scheduler needs are decoded here: the 3-bit priority
//! class that selects a buffer lane, plus PGN and source address for
//! diagnostics. Full PGN routing belongs to the protocol layer.

/// Mask covering the 29 identifier bits of an extended CAN frame.
pub const EXTENDED_ID_MASK: u32 = 0x1FFF_FFFF;
/// Mask covering the 11 identifier bits of a standard CAN frame.
pub const STANDARD_ID_MASK: u32 = 0x7FF;
/// Bit position of the priority class inside an extended identifier.
const PRIORITY_SHIFT: u32 = 26;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw CAN identifier stored inside a `u32`.
///
/// Ordering follows bus arbitration: a numerically lower identifier wins.
pub struct CanId(pub u32);

impl CanId {
    /// Build an extended identifier, dropping anything above bit 28.
    pub const fn new(raw: u32) -> Self {
        Self(raw & EXTENDED_ID_MASK)
    }

    /// Assemble an identifier from its J1939 parts.
    ///
    /// `priority` is capped to 3 bits and `pgn` to 18 bits so stray bits can
    /// never leak into neighbouring fields.
    pub const fn from_parts(priority: u8, pgn: u32, source_address: u8) -> Self {
        Self(
            (((priority & 0x07) as u32) << PRIORITY_SHIFT)
                | ((pgn & 0x3_FFFF) << 8)
                | source_address as u32,
        )
    }

    /// Raw 29-bit value.
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Priority class (0 = highest, 7 = lowest).
    pub const fn priority(&self) -> u8 {
        ((self.0 >> PRIORITY_SHIFT) & 0x07) as u8
    }

    /// Copy of this identifier with the priority class replaced.
    pub const fn with_priority(self, priority: u8) -> Self {
        Self((self.0 & !(0x07 << PRIORITY_SHIFT)) | (((priority & 0x07) as u32) << PRIORITY_SHIFT))
    }

    /// Extracts the 18-bit PGN, handling the PDU1/PDU2 distinction.
    pub const fn pgn(&self) -> u32 {
        let pf = (self.0 >> 16) & 0xFF;
        let upper = (self.0 >> 8) & 0x3_FF00;
        if pf >= 240 {
            // PDU2: PS is a group extension and part of the PGN.
            upper | ((self.0 >> 8) & 0xFF)
        } else {
            upper
        }
    }

    /// Eight-bit source address.
    pub const fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl From<u32> for CanId {
    fn from(raw: u32) -> Self {
        Self::new(raw)
    }
}
