//! Per-command record and its lifecycle state machine.
//!
//! A [`CtlCommand`] is created at submission time, moved into the transfer
//! layer, and from then on mutated only by the layer's callback invocations.
//! The machine is `Pending → Sent → Completed | Interrupted`, with a final
//! `Released` marker set by the poll that reaps the record.
//!
//! Known structural risk, kept on purpose: a `Sent` record whose transfer
//! layer never delivers a response or interrupt stays in flight forever;
//! there is no timeout and no caller-side cancellation. Tearing the layer
//! down does reclaim the record (it owns the box), but a silently stalled
//! layer does not.

use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::{CommandBufferHandle, BUFFER_SIZE};
use crate::transfer::{PollAction, TransferClient};

/// Correlation tag stamped on every control command. Only one command is ever
/// outstanding, so the tag is for log correlation, not response routing.
const CTL_COMMAND_ID: u32 = 1;

/// Lifecycle states of a [`CtlCommand`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandState {
    /// Created; payload not yet handed to the transfer layer.
    Pending,
    /// Payload handed over (exactly once); awaiting a response.
    Sent,
    /// Response received. Reaped by the next poll.
    Completed,
    /// Exchange aborted by the transfer layer. Reaped by the next poll.
    Interrupted,
    /// Reaped; the release signal has fired and must not fire again.
    Released,
}

/// Landing slot for the most recent completed response.
///
/// The channel keeps one slot and clones the handle into every submitted
/// command; the last completion wins, consistent with the single-outstanding
/// command design.
#[derive(Clone, Debug, Default)]
pub struct ResponseSlot(Rc<RefCell<Option<Vec<u8>>>>);

impl ResponseSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the response left by the most recent completion, if any.
    pub fn take(&self) -> Option<Vec<u8>> {
        self.0.borrow_mut().take()
    }

    fn publish(&self, response: &[u8]) {
        *self.0.borrow_mut() = Some(response.to_vec());
    }
}

/// One submitted command and its progress through the lifecycle.
#[derive(Debug)]
pub struct CtlCommand {
    id: u32,
    count: usize,
    sent: usize,
    response_count: usize,
    state: CommandState,
    buffer: CommandBufferHandle,
    response: ResponseSlot,
}

impl CtlCommand {
    /// `count` is the accepted payload length; `buffer` is the shared staging
    /// slot the payload is read from at poll time.
    pub fn new(count: usize, buffer: CommandBufferHandle, response: ResponseSlot) -> Self {
        Self {
            id: CTL_COMMAND_ID,
            count,
            sent: 0,
            response_count: 0,
            state: CommandState::Pending,
            buffer,
            response,
        }
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn payload_len(&self) -> usize {
        self.count
    }

    /// Bytes handed to the transfer layer so far: `0` until the payload goes
    /// out, [`BUFFER_SIZE`] after (the full report transfers as one unit).
    pub fn bytes_sent(&self) -> usize {
        self.sent
    }

    pub fn response_len(&self) -> usize {
        self.response_count
    }
}

impl TransferClient for CtlCommand {
    fn next_request(&mut self, request: &mut [u8; BUFFER_SIZE]) -> PollAction {
        tracing::debug!(
            id = self.id,
            state = ?self.state,
            sent = self.sent,
            count = self.count,
            "control command polled"
        );

        match self.state {
            CommandState::Completed | CommandState::Interrupted => {
                self.state = CommandState::Released;
                PollAction::Release
            }
            CommandState::Released => PollAction::Idle,
            CommandState::Pending | CommandState::Sent => {
                if self.sent < BUFFER_SIZE {
                    // The payload comes from the shared slot *now*, not from
                    // submission time: a submission landing between dispatch
                    // and this poll replaces what goes on the wire.
                    self.buffer.copy_into(request);
                    self.sent = BUFFER_SIZE;
                    self.state = CommandState::Sent;
                    PollAction::Send
                } else {
                    PollAction::Idle
                }
            }
        }
    }

    fn data_received(&mut self, response: &[u8]) {
        if self.state == CommandState::Released {
            // Already reaped; re-arming release here would make the transfer
            // layer drop the record twice.
            tracing::warn!(id = self.id, "response after release, dropping");
            return;
        }
        if self.state != CommandState::Sent {
            tracing::warn!(
                id = self.id,
                state = ?self.state,
                "response arrived without a sent request outstanding"
            );
        }

        self.response_count = response.len();
        self.response.publish(response);
        self.state = CommandState::Completed;
        tracing::debug!(id = self.id, len = response.len(), "control response received");
    }

    fn interrupted(&mut self) {
        tracing::warn!(id = self.id, state = ?self.state, "control command interrupted");
        if self.state != CommandState::Released {
            self.state = CommandState::Interrupted;
        }
    }
}
