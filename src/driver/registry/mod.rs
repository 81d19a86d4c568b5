//! Routes controller interrupts to the driver that owns the controller.
//!
//! Vendor HALs usually hand every CAN interrupt to one global callback with a
//! peripheral handle. The registry maps that handle to a driver so several
//! buses can run side by side without a global driver pointer. It is filled
//! before interrupts are unmasked and only read afterwards.
use crate::error::RegistryError;
use crate::protocol::transport::can_frame::CanFrame;

/// Identity of a hardware bus, typically the peripheral base address or the
/// address of the vendor handle struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusHandle(pub usize);

impl BusHandle {
    /// Use the address of a vendor handle as identity.
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }
}

/// Interrupt entry points of a driver reachable through a shared reference.
pub trait CanInterrupts {
    /// One frame was read out of the controller receive FIFO.
    fn on_frame_received(&self, frame: &CanFrame);
    /// One transmit mailbox completed.
    fn on_mailbox_free(&self);
}

type Entry<'a> = Option<(BusHandle, &'a (dyn CanInterrupts + Sync))>;

/// Fixed-size handle → driver table.
pub struct BusRegistry<'a, const MAX: usize> {
    entries: [Entry<'a>; MAX],
}

impl<'a, const MAX: usize> Default for BusRegistry<'a, MAX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const MAX: usize> BusRegistry<'a, MAX> {
    pub const fn new() -> Self {
        Self {
            entries: [None; MAX],
        }
    }

    /// Attach `driver` to `handle`. Each handle can be registered once.
    pub fn register(
        &mut self,
        handle: BusHandle,
        driver: &'a (dyn CanInterrupts + Sync),
    ) -> Result<(), RegistryError> {
        if self.lookup(handle).is_some() {
            return Err(RegistryError::AlreadyRegistered { handle });
        }
        let free = self
            .entries
            .iter_mut()
            .find(|entry| entry.is_none())
            .ok_or(RegistryError::Full)?;
        *free = Some((handle, driver));
        Ok(())
    }

    /// Driver owning `handle`, if any.
    pub fn lookup(&self, handle: BusHandle) -> Option<&'a (dyn CanInterrupts + Sync)> {
        self.entries
            .iter()
            .flatten()
            .find(|(owner, _)| *owner == handle)
            .map(|(_, driver)| *driver)
    }

    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forward a received frame. Unknown handles drop the event and return
    /// `false`.
    pub fn on_frame_received(&self, handle: BusHandle, frame: &CanFrame) -> bool {
        match self.lookup(handle) {
            Some(driver) => {
                driver.on_frame_received(frame);
                true
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::trace!("rx event for unknown bus {}", handle);
                false
            }
        }
    }

    /// Forward a mailbox-free event. Unknown handles drop the event and
    /// return `false`.
    pub fn on_mailbox_free(&self, handle: BusHandle) -> bool {
        match self.lookup(handle) {
            Some(driver) => {
                driver.on_mailbox_free();
                true
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::trace!("tx event for unknown bus {}", handle);
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
