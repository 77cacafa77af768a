use thiserror::Error;

use crate::transfer::TransferError;

/// Errors surfaced by the control channel.
///
/// Every failure is immediate and reported to the direct caller; the channel
/// never queues or retries on the caller's behalf.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CtlError {
    /// A command was submitted with no device bound. The command is dropped,
    /// not queued, and zero bytes were accepted.
    #[error("no device bound, command dropped")]
    NoDeviceBound,

    /// The channel is a single-client interface and is already open.
    #[error("control channel already open")]
    Busy,

    /// The transfer layer refused the command registration.
    #[error("transfer layer rejected command: {0}")]
    Transfer(#[from] TransferError),
}

pub type Result<T> = std::result::Result<T, CtlError>;
