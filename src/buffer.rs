use std::cell::RefCell;
use std::rc::Rc;

/// Fixed HID report size of the bridge. Every command and every response
/// occupies exactly one report on the wire.
pub const BUFFER_SIZE: usize = 64;

/// Single staging slot for the most recently submitted command.
///
/// At most one submission's bytes are resident at a time: [`load`] overwrites
/// whatever a prior submission left behind, consumed or not. This slot is the
/// serialization point behind the one-outstanding-command design.
///
/// [`load`]: CommandBuffer::load
#[derive(Debug)]
pub struct CommandBuffer {
    bytes: [u8; BUFFER_SIZE],
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self {
            bytes: [0; BUFFER_SIZE],
        }
    }

    /// Stages `raw` as the next command payload and returns how many bytes
    /// were accepted. Payloads longer than [`BUFFER_SIZE`] are truncated, not
    /// rejected; shorter payloads are zero-padded to the full report.
    pub fn load(&mut self, raw: &[u8]) -> usize {
        let accepted = raw.len().min(BUFFER_SIZE);
        self.bytes = [0; BUFFER_SIZE];
        self.bytes[..accepted].copy_from_slice(&raw[..accepted]);
        accepted
    }

    pub fn contents(&self) -> &[u8; BUFFER_SIZE] {
        &self.bytes
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Shareable handle to the staging slot.
///
/// The dispatcher writes through one clone while the in-flight command reads
/// through another at poll time. That read-at-poll-time sharing is what makes
/// a rapid resubmission visible to a command that has not been sent yet; see
/// [`CtlChannel::write`](crate::CtlChannel::write).
#[derive(Clone, Debug)]
pub struct CommandBufferHandle(Rc<RefCell<CommandBuffer>>);

impl CommandBufferHandle {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(CommandBuffer::new())))
    }

    /// See [`CommandBuffer::load`].
    pub fn load(&self, raw: &[u8]) -> usize {
        self.0.borrow_mut().load(raw)
    }

    pub fn copy_into(&self, out: &mut [u8; BUFFER_SIZE]) {
        out.copy_from_slice(self.0.borrow().contents());
    }

    pub fn contents(&self) -> [u8; BUFFER_SIZE] {
        *self.0.borrow().contents()
    }
}

impl Default for CommandBufferHandle {
    fn default() -> Self {
        Self::new()
    }
}
