//! Control channel for an MCP2210-class USB-to-SPI bridge.
//!
//! A front end hands the channel an opaque command report and later retrieves
//! a single correlated response. The device side, however, is not
//! synchronous: a transfer layer moves reports to and from the hardware on
//! its own interrupt/polling schedule and drives per-command callbacks. This
//! crate is the glue between those two worlds:
//!
//! - [`CtlChannel`]: dispatcher and byte-level surface (`write`/`read`,
//!   open gate, module load/unload entry points)
//! - [`CtlCommand`]: per-command record and its lifecycle state machine
//! - [`TransferClient`]/[`TransferLayer`]: the callback and registration
//!   contracts at the transfer-layer seam
//! - [`CommandBuffer`]: the single fixed staging slot that serializes
//!   commands (one outstanding at a time)
//!
//! Scheduling is owned entirely by the transfer layer; commands never block.
//! A finished command is reclaimed by the next poll ([`PollAction::Release`]),
//! so the layer must poll at least once after completion. The staging slot is
//! deliberately a single unlocked buffer: callers must finish one command
//! before writing the next, or the in-flight payload is replaced (see
//! [`CtlChannel::write`]).

#![forbid(unsafe_code)]

mod binding;
mod buffer;
mod channel;
mod command;
mod error;
mod transfer;

pub use binding::DeviceBinding;
pub use buffer::{CommandBuffer, CommandBufferHandle, BUFFER_SIZE};
pub use channel::CtlChannel;
pub use command::{CommandState, CtlCommand, ResponseSlot};
pub use error::{CtlError, Result};
pub use transfer::{PollAction, TransferClient, TransferError, TransferLayer};
