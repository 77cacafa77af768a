// Not every test binary exercises every helper.
#![allow(dead_code)]

use mcp2210_ctl::{PollAction, TransferClient, TransferError, TransferLayer, BUFFER_SIZE};

/// Scripted stand-in for the device transfer layer: registered commands queue
/// up and the test drives polls, completions, and interrupts explicitly.
pub struct SimTransferLayer {
    commands: Vec<Box<dyn TransferClient>>,
    capacity: usize,
    pub sent_requests: Vec<[u8; BUFFER_SIZE]>,
}

impl SimTransferLayer {
    pub fn new() -> Self {
        Self::with_capacity(8)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::new(),
            capacity,
            sent_requests: Vec::new(),
        }
    }

    /// Polls the oldest registered command once. Returns the outgoing report
    /// if the command had one; drops the command when it asks to be released.
    pub fn poll(&mut self) -> Option<[u8; BUFFER_SIZE]> {
        let command = self.commands.first_mut()?;
        let mut request = [0u8; BUFFER_SIZE];
        match command.next_request(&mut request) {
            PollAction::Send => {
                self.sent_requests.push(request);
                Some(request)
            }
            PollAction::Idle => None,
            PollAction::Release => {
                self.commands.remove(0);
                None
            }
        }
    }

    /// Delivers a response report to the oldest registered command.
    pub fn complete(&mut self, response: &[u8]) {
        self.commands
            .first_mut()
            .expect("no command to complete")
            .data_received(response);
    }

    /// Aborts the oldest registered command.
    pub fn interrupt(&mut self) {
        self.commands
            .first_mut()
            .expect("no command to interrupt")
            .interrupted();
    }

    pub fn pending(&self) -> usize {
        self.commands.len()
    }
}

impl TransferLayer for SimTransferLayer {
    fn add_command(&mut self, command: Box<dyn TransferClient>) -> Result<(), TransferError> {
        if self.commands.len() >= self.capacity {
            return Err(TransferError::ResourceExhausted);
        }
        self.commands.push(command);
        Ok(())
    }
}
