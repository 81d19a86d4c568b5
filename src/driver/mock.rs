//! Simulated controller used by the unit tests.
extern crate std;

use std::vec::Vec;

use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::bus_adapter::{BusAdapter, IrqSource};

/// Controller with `mailboxes` transmit slots. Written frames stay "in
/// flight" until the test calls [`MockAdapter::complete`].
#[derive(Debug, Default)]
pub struct MockAdapter {
    pub mailboxes: usize,
    pub in_flight: usize,
    pub written: Vec<CanFrame>,
    pub refuse_writes: bool,
    pub fail_open: bool,
    pub opened: bool,
    /// Currently masked sources.
    pub masked: Vec<IrqSource>,
    /// Every mask (`true`) / unmask (`false`) call, in order.
    pub mask_log: Vec<(IrqSource, bool)>,
    /// Sources masked at the moment of each mailbox write.
    pub masked_during_write: Vec<Vec<IrqSource>>,
}

impl MockAdapter {
    pub fn with_mailboxes(mailboxes: usize) -> Self {
        Self {
            mailboxes,
            ..Self::default()
        }
    }

    /// Occupy every mailbox.
    pub fn fill(&mut self) {
        self.in_flight = self.mailboxes;
    }

    /// One transmission finished.
    pub fn complete(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn written_tags(&self) -> Vec<u8> {
        self.written.iter().map(|frame| frame.data[0]).collect()
    }
}

impl BusAdapter for MockAdapter {
    type Error = &'static str;

    fn open(&mut self) -> Result<(), Self::Error> {
        if self.fail_open {
            return Err("controller did not leave init mode");
        }
        self.opened = true;
        Ok(())
    }

    fn mailboxes_free(&self) -> bool {
        self.in_flight < self.mailboxes
    }

    fn write_mailbox(&mut self, frame: &CanFrame) -> bool {
        if self.refuse_writes || !self.mailboxes_free() {
            return false;
        }
        self.in_flight += 1;
        self.written.push(*frame);
        self.masked_during_write.push(self.masked.clone());
        true
    }

    fn mask_interrupt(&mut self, source: IrqSource) {
        self.masked.push(source);
        self.mask_log.push((source, true));
    }

    fn unmask_interrupt(&mut self, source: IrqSource) {
        self.masked.retain(|s| *s != source);
        self.mask_log.push((source, false));
    }
}
