/// Test doubles simulating a mailbox-based CAN controller.
use korri_can_sched::protocol::transport::{
    can_frame::CanFrame,
    can_id::CanId,
    traits::bus_adapter::{BusAdapter, IrqSource},
};

#[derive(Debug, Default)]
#[allow(dead_code)]
/// Controller with a fixed number of transmit mailboxes. Frames written to a
/// mailbox stay in flight until [`SimController::finish_one`] is called.
pub struct SimController {
    pub mailboxes: usize,
    pub in_flight: usize,
    pub wire: Vec<CanFrame>,
    pub masked: Vec<IrqSource>,
    pub opened: bool,
}

#[allow(dead_code)]
impl SimController {
    pub fn new(mailboxes: usize) -> Self {
        Self {
            mailboxes,
            // Sources start masked until the driver opens the bus.
            masked: vec![IrqSource::RxFramePending, IrqSource::TxMailboxFree],
            ..Self::default()
        }
    }

    /// Complete the oldest transmission. Returns `false` when idle.
    pub fn finish_one(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        self.in_flight -= 1;
        true
    }

    pub fn is_masked(&self, source: IrqSource) -> bool {
        self.masked.contains(&source)
    }

    /// First payload byte of every frame put on the wire.
    pub fn wire_tags(&self) -> Vec<u8> {
        self.wire.iter().map(|frame| frame.data[0]).collect()
    }
}

impl BusAdapter for SimController {
    type Error = ();

    fn open(&mut self) -> Result<(), Self::Error> {
        self.opened = true;
        Ok(())
    }

    fn mailboxes_free(&self) -> bool {
        self.in_flight < self.mailboxes
    }

    fn write_mailbox(&mut self, frame: &CanFrame) -> bool {
        if !self.mailboxes_free() {
            return false;
        }
        self.in_flight += 1;
        self.wire.push(*frame);
        true
    }

    fn mask_interrupt(&mut self, source: IrqSource) {
        if !self.masked.contains(&source) {
            self.masked.push(source);
        }
    }

    fn unmask_interrupt(&mut self, source: IrqSource) {
        self.masked.retain(|masked| *masked != source);
    }
}

#[allow(dead_code)]
/// Single-frame test message tagged through its first payload byte.
pub fn tagged(priority: u8, tag: u8) -> CanFrame {
    CanFrame::new_extended(CanId::from_parts(priority, 130310, 0x20), &[tag, 0xFF])
}
