//! Contracts between the control channel and the device transfer layer.
//!
//! The transfer layer owns all scheduling. It polls a registered command for
//! its next outgoing report whenever the device is ready to send, and pushes
//! a response report back when one arrives. If the exchange is aborted
//! (device unplugged, layer shutdown) it signals an interrupt instead. A
//! command never blocks or spins; it only answers "do I have something to
//! send" and "may I be reclaimed now". That keeps the protocol non-blocking
//! from the transfer layer's perspective, at the cost of requiring the layer
//! to poll at least once after a command finishes so the record can be
//! reclaimed.

use thiserror::Error;

use crate::buffer::BUFFER_SIZE;

/// What a [`TransferClient`] wants the transfer layer to do after a poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollAction {
    /// The poll buffer was filled with an outgoing report; send it.
    Send,
    /// Nothing to send right now. Poll again later.
    Idle,
    /// The command reached a terminal state and was reaped by this poll.
    /// The transfer layer must drop the record; it will not signal `Release`
    /// again.
    Release,
}

/// The three-callback contract a registered command implements against the
/// transfer layer.
///
/// Invocation order is driven entirely by the layer's own (interrupt/polling
/// driven) schedule, out-of-band relative to the submission call. Within one
/// record, [`next_request`] reports [`PollAction::Send`] at most once; there
/// is no guarantee that [`data_received`] follows a send, and a record whose
/// layer never calls back after the send stays in flight indefinitely.
///
/// [`next_request`]: TransferClient::next_request
/// [`data_received`]: TransferClient::data_received
pub trait TransferClient {
    /// Called whenever the transfer layer is ready to send. Fills `request`
    /// and returns [`PollAction::Send`] when an outgoing report is due;
    /// `request` must be ignored for any other return.
    fn next_request(&mut self, request: &mut [u8; BUFFER_SIZE]) -> PollAction;

    /// Called when a response report for the outstanding command arrives.
    fn data_received(&mut self, response: &[u8]);

    /// Called when the exchange was aborted. The record becomes reapable by
    /// the next [`next_request`] poll.
    ///
    /// [`next_request`]: TransferClient::next_request
    fn interrupted(&mut self);
}

/// Registration contract presented by the device transfer layer.
pub trait TransferLayer {
    /// Hands a command record over to the layer. On success the layer owns
    /// the record and will drive its [`TransferClient`] callbacks until a
    /// poll returns [`PollAction::Release`] or the layer is torn down.
    fn add_command(&mut self, command: Box<dyn TransferClient>) -> Result<(), TransferError>;
}

/// Registration failures reported by a [`TransferLayer`]. The command never
/// reached the layer; the caller keeps ownership of (and drops) the record.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    #[error("transfer layer out of resources")]
    ResourceExhausted,

    #[error("device unreachable")]
    DeviceUnreachable,
}
