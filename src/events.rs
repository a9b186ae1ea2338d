//! Decoupled event bus between the workflow and whatever renders it.
//!
//! The [`Workflow`](crate::workflow::Workflow) emits via [`EventBus::emit`];
//! front ends subscribe via [`EventBus::subscribe`]. Built on
//! [`tokio::sync::broadcast`] so several listeners can watch independently.

use tokio::sync::broadcast;

use crate::workflow::Phase;

/// Events that flow out of the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The dashboard moved to a new phase.
    PhaseChanged { from: Phase, to: Phase },
    /// A user-visible error message was set.
    ErrorRaised { message: String },
}

/// A broadcast channel that any component can emit to or subscribe from.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all current subscribers.
    /// Returns the number of receivers that will see it.
    pub fn emit(&self, event: Event) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to events. Returns a receiver that yields all
    /// future events (does not replay past ones).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_reaches_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.emit(Event::PhaseChanged {
            from: Phase::Idle,
            to: Phase::Scanning,
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            Event::PhaseChanged {
                from: Phase::Idle,
                to: Phase::Scanning
            }
        );
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(Event::ErrorRaised {
            message: "boom".to_string(),
        });

        for event in [rx1.recv().await.unwrap(), rx2.recv().await.unwrap()] {
            match event {
                Event::ErrorRaised { message } => assert_eq!(message, "boom"),
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[test]
    fn emit_without_subscribers_returns_zero() {
        let bus = EventBus::default();
        let count = bus.emit(Event::ErrorRaised {
            message: "nobody listens".to_string(),
        });
        assert_eq!(count, 0);
    }
}
