//! End-to-end lifecycle of a submitted command, driven through a scripted
//! transfer layer: submit, poll out the padded report, deliver a response or
//! interrupt, and reap the record on the following poll.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::SimTransferLayer;
use mcp2210_ctl::{CtlChannel, BUFFER_SIZE};
use proptest::prelude::*;

fn bound_channel() -> (CtlChannel<SimTransferLayer>, Rc<RefCell<SimTransferLayer>>) {
    let dev = Rc::new(RefCell::new(SimTransferLayer::new()));
    let mut chan = CtlChannel::new();
    chan.bind(dev.clone());
    (chan, dev)
}

fn padded(payload: &[u8]) -> [u8; BUFFER_SIZE] {
    let mut report = [0u8; BUFFER_SIZE];
    report[..payload.len()].copy_from_slice(payload);
    report
}

#[test]
fn submit_poll_complete_reap() {
    let (mut chan, dev) = bound_channel();

    assert_eq!(chan.write(&[0x01, 0x02]), Ok(2));
    assert_eq!(dev.borrow().pending(), 1);

    // First poll puts the zero-padded report on the wire.
    let report = dev.borrow_mut().poll().expect("expected outgoing report");
    assert_eq!(report, padded(&[0x01, 0x02]));

    // No response yet: polls are idle and emit no duplicate report.
    assert_eq!(dev.borrow_mut().poll(), None);
    assert_eq!(dev.borrow().sent_requests.len(), 1);

    dev.borrow_mut().complete(&[0xAA]);
    assert_eq!(chan.read(), Some(vec![0xAA]));

    // The poll after completion reaps the record.
    assert_eq!(dev.borrow_mut().poll(), None);
    assert_eq!(dev.borrow().pending(), 0);

    // Nothing left to poll, nothing left to read.
    assert_eq!(dev.borrow_mut().poll(), None);
    assert_eq!(chan.read(), None);
}

#[test]
fn response_is_taken_once() {
    let (mut chan, dev) = bound_channel();
    chan.write(&[0x10]).unwrap();
    dev.borrow_mut().poll();
    dev.borrow_mut().complete(&[0x0B, 0x0C]);

    assert_eq!(chan.read(), Some(vec![0x0B, 0x0C]));
    assert_eq!(chan.read(), None);
}

#[test]
fn interrupt_reaps_without_a_response() {
    let (mut chan, dev) = bound_channel();
    chan.write(&[0x01]).unwrap();
    dev.borrow_mut().poll();

    dev.borrow_mut().interrupt();
    assert_eq!(dev.borrow_mut().poll(), None);
    assert_eq!(dev.borrow().pending(), 0);
    assert_eq!(chan.read(), None);
}

#[test]
fn interrupt_before_send_never_sends() {
    let (mut chan, dev) = bound_channel();
    chan.write(&[0x01]).unwrap();

    dev.borrow_mut().interrupt();
    assert_eq!(dev.borrow_mut().poll(), None);
    assert_eq!(dev.borrow().pending(), 0);
    assert!(dev.borrow().sent_requests.is_empty());
}

#[test]
fn early_response_completes_an_unsent_command() {
    // The record accepts a completion from any prior state; a response that
    // arrives before the payload went out still finishes the command.
    let (mut chan, dev) = bound_channel();
    chan.write(&[0x01]).unwrap();

    dev.borrow_mut().complete(&[0xEE]);
    assert_eq!(chan.read(), Some(vec![0xEE]));

    // Reaped without ever sending.
    assert_eq!(dev.borrow_mut().poll(), None);
    assert_eq!(dev.borrow().pending(), 0);
    assert!(dev.borrow().sent_requests.is_empty());
}

#[test]
fn rapid_resubmission_replaces_the_inflight_payload() {
    // Documented hazard of the single staging slot: a second write before
    // the first command is polled replaces what the first command sends.
    let (mut chan, dev) = bound_channel();
    chan.write(&[0x11; 4]).unwrap();
    chan.write(&[0x22; 4]).unwrap();
    assert_eq!(dev.borrow().pending(), 2);

    let report = dev.borrow_mut().poll().expect("expected outgoing report");
    assert_eq!(report, padded(&[0x22; 4]));
}

proptest! {
    #[test]
    fn any_payload_goes_out_zero_padded(
        payload in proptest::collection::vec(any::<u8>(), 0..=BUFFER_SIZE)
    ) {
        let (mut chan, dev) = bound_channel();

        prop_assert_eq!(chan.write(&payload), Ok(payload.len()));
        let report = dev.borrow_mut().poll().expect("expected outgoing report");
        prop_assert_eq!(report, padded(&payload));

        // At-most-once delivery.
        prop_assert_eq!(dev.borrow_mut().poll(), None);
        prop_assert_eq!(dev.borrow().sent_requests.len(), 1);
    }
}
