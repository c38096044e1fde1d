//! In-process event pipeline.
//!
//! Signup and ticket-creation publish onto a channel drained by a background
//! worker. Publishing is fire-and-forget: the pipeline reacts to requests
//! but can never fail one.

use tokio::sync::mpsc::{Sender, channel};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// An application event worth reacting to.
#[derive(Debug, Clone)]
pub enum TkEvent {
    /// A new user signed up.
    UserSignedUp { user_id: Uuid, email: String },
    /// A new ticket was opened.
    TicketCreated { ticket_id: Uuid, created_by: Uuid },
}

/// Handle for publishing events to the background worker.
#[derive(Clone)]
pub struct EventBus {
    tx: Sender<TkEvent>,
}

impl EventBus {
    /// Creates the bus and spawns its worker task.
    pub fn create() -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = channel(EVENT_CHANNEL_CAPACITY);

        let handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match &event {
                    TkEvent::UserSignedUp { user_id, email } => {
                        info!(%user_id, %email, "Processing signup event");
                    }
                    TkEvent::TicketCreated {
                        ticket_id,
                        created_by,
                    } => {
                        info!(%ticket_id, %created_by, "Processing ticket-created event");
                    }
                }
            }
            info!("Event channel closed");
        });

        (Self { tx }, handle)
    }

    /// Publishes an event without waiting for the worker.
    ///
    /// A full channel drops the event; the request that produced it has
    /// already succeeded.
    pub fn publish(&self, event: TkEvent) {
        if let Err(err) = self.tx.try_send(event) {
            warn!("Dropping event: {err}");
        }
    }
}
