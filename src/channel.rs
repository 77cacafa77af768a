//! Command dispatch and the byte-level control-channel surface.

use std::cell::RefCell;
use std::rc::Rc;

use crate::binding::DeviceBinding;
use crate::buffer::{CommandBufferHandle, BUFFER_SIZE};
use crate::command::{CtlCommand, ResponseSlot};
use crate::error::{CtlError, Result};
use crate::transfer::TransferLayer;

/// The control channel: accepts raw command bytes from a front end, hands
/// them to the bound device's transfer layer as lifecycle-managed commands,
/// and holds the most recent completed response for retrieval.
///
/// The channel is an explicitly owned context object; it holds the single
/// staging slot, the response slot, the device binding, and the single-client
/// open gate. Front ends call [`write`]/[`read`]; the surrounding module
/// lifecycle calls [`on_module_load`]/[`on_module_unload`].
///
/// [`write`]: CtlChannel::write
/// [`read`]: CtlChannel::read
/// [`on_module_load`]: CtlChannel::on_module_load
/// [`on_module_unload`]: CtlChannel::on_module_unload
#[derive(Debug)]
pub struct CtlChannel<D> {
    buffer: CommandBufferHandle,
    response: ResponseSlot,
    binding: DeviceBinding<D>,
    open: bool,
}

impl<D: TransferLayer> CtlChannel<D> {
    pub fn new() -> Self {
        Self {
            buffer: CommandBufferHandle::new(),
            response: ResponseSlot::new(),
            binding: DeviceBinding::new(),
            open: false,
        }
    }

    /// Claims the channel for a single client.
    pub fn open(&mut self) -> Result<()> {
        if self.open {
            return Err(CtlError::Busy);
        }
        self.open = true;
        Ok(())
    }

    pub fn release(&mut self) {
        self.open = false;
    }

    /// Submits `raw` as a command to the bound device and returns how many
    /// bytes were accepted (payloads longer than [`BUFFER_SIZE`] are
    /// truncated, not rejected).
    ///
    /// The staging slot is overwritten before the binding check, so a write
    /// that fails with [`CtlError::NoDeviceBound`] still clobbers the slot.
    ///
    /// Submission never waits on a prior in-flight command. The staging slot
    /// is a single shared buffer read at send time, so writing again before
    /// the previous command has been polled replaces the payload that command
    /// will put on the wire. Callers that need back-to-back commands must
    /// wait for each response (or interrupt) before the next write.
    pub fn write(&mut self, raw: &[u8]) -> Result<usize> {
        let accepted = self.buffer.load(raw);

        let Some(device) = self.binding.bound() else {
            tracing::warn!("no device bound, ignoring write");
            return Err(CtlError::NoDeviceBound);
        };

        let command = CtlCommand::new(accepted, self.buffer.clone(), self.response.clone());
        tracing::debug!(len = raw.len(), accepted, "submitting control command");
        device.borrow_mut().add_command(Box::new(command))?;
        Ok(accepted)
    }

    /// Takes the most recent completed response, if one arrived since the
    /// last take. Never blocks; interrupted commands leave nothing to read.
    pub fn read(&mut self) -> Option<Vec<u8>> {
        self.response.take()
    }

    /// Diagnostic view of the staging slot's current contents.
    pub fn staged_command(&self) -> [u8; BUFFER_SIZE] {
        self.buffer.contents()
    }

    pub fn bind(&mut self, device: Rc<RefCell<D>>) -> bool {
        self.binding.bind(device)
    }

    pub fn unbind(&mut self, device: &Rc<RefCell<D>>) -> bool {
        self.binding.unbind(device)
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_bound()
    }

    /// Module-lifecycle entry point: binds `device` and publishes the channel
    /// for use. Loading while a device is already bound is a benign no-op
    /// that leaves the existing binding in place.
    pub fn on_module_load(&mut self, device: Rc<RefCell<D>>) -> Result<()> {
        self.binding.bind(device);
        Ok(())
    }

    /// Tears the channel down. `device` must be the handle passed at load
    /// time; a mismatch is a rejected no-op (with a diagnostic from the
    /// binding manager) that leaves the channel untouched.
    pub fn on_module_unload(&mut self, device: &Rc<RefCell<D>>) {
        if !self.binding.unbind(device) {
            return;
        }
        self.open = false;
        // Drop any response the front end never picked up.
        self.response.take();
        tracing::debug!("control channel unregistered");
    }
}

impl<D: TransferLayer> Default for CtlChannel<D> {
    fn default() -> Self {
        Self::new()
    }
}
