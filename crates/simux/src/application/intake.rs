//! The intake channel: an ordered hand-off of [`Command`]s from the prompt
//! loop to the bridge.
//!
//! The channel moves owned values.  Once the prompt loop submits a command it
//! no longer holds it; the bridge receives the same allocation, writes it,
//! and drops it.
//!
//! The channel is single-producer/single-consumer: [`IntakeSender`] is not
//! `Clone`, and [`IntakeReceiver`] is owned by exactly one bridge.  Delivery
//! order equals submission order.  Dropping the sender closes the channel;
//! the receiver then yields every command still queued before reporting the
//! close.

use simux_core::Command;
use thiserror::Error;
use tokio::sync::mpsc;

/// The bridge is gone, so the command could not be queued.
///
/// The rejected command is handed back to the caller.
#[derive(Debug, Error)]
#[error("intake channel closed")]
pub struct IntakeClosed(pub Command);

/// Creates a connected sender/receiver pair.
///
/// The queue is unbounded: the prompt loop never waits on the bridge.
pub fn intake_channel() -> (IntakeSender, IntakeReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (IntakeSender { tx }, IntakeReceiver { rx })
}

/// Producer half, owned by the prompt loop.
///
/// `submit` is synchronous, so it can be called from a plain OS thread.
#[derive(Debug)]
pub struct IntakeSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl IntakeSender {
    /// Queues `command` for the bridge.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeClosed`] holding the command if the receiver was dropped.
    pub fn submit(&self, command: Command) -> Result<(), IntakeClosed> {
        self.tx.send(command).map_err(|e| IntakeClosed(e.0))
    }

    /// Returns `true` once the bridge has dropped its receiver.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half, owned by the bridge.
#[derive(Debug)]
pub struct IntakeReceiver {
    rx: mpsc::UnboundedReceiver<Command>,
}

impl IntakeReceiver {
    /// Waits for the next command.
    ///
    /// Returns `None` once the sender is dropped and the queue is empty.
    /// Cancel-safe: if the future is dropped before completing, no command
    /// is lost.
    pub async fn recv(&mut self) -> Option<Command> {
        self.rx.recv().await
    }
}
