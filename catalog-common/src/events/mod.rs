//! Event types for the catalog event system
//!
//! Provides shared event definitions and the EventBus used to fan events out to SSE
//! clients and in-process listeners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Catalog event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CatalogEvent {
    /// Review session created from a batch of folder names
    ReviewSessionStarted {
        session_id: Uuid,
        /// Number of review items in the session
        item_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Review session discarded (closed or committed)
    ReviewSessionClosed {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// Import run started
    ImportStarted {
        run_id: Uuid,
        /// Items submitted to the executor
        total: usize,
        timestamp: DateTime<Utc>,
    },

    /// One fixed-size batch finished
    ///
    /// Triggers:
    /// - SSE: Update import progress bar
    ImportBatchCompleted {
        run_id: Uuid,
        /// 1-based batch number
        batch_index: usize,
        /// Items finished so far (all batches)
        processed: usize,
        total: usize,
        imported: usize,
        failed: usize,
        timestamp: DateTime<Utc>,
    },

    /// Import run finished (every item has an outcome)
    ImportCompleted {
        run_id: Uuid,
        total: usize,
        imported: usize,
        skipped: usize,
        failed: usize,
        timestamp: DateTime<Utc>,
    },

    /// Import run aborted before any item was processed (e.g. listing failed)
    ImportAborted {
        run_id: Uuid,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

impl CatalogEvent {
    /// Event name used as the SSE `event:` field
    pub fn event_type(&self) -> &str {
        match self {
            CatalogEvent::ReviewSessionStarted { .. } => "ReviewSessionStarted",
            CatalogEvent::ReviewSessionClosed { .. } => "ReviewSessionClosed",
            CatalogEvent::ImportStarted { .. } => "ImportStarted",
            CatalogEvent::ImportBatchCompleted { .. } => "ImportBatchCompleted",
            CatalogEvent::ImportCompleted { .. } => "ImportCompleted",
            CatalogEvent::ImportAborted { .. } => "ImportAborted",
        }
    }

    /// Whether this event belongs to the import progress stream
    pub fn is_import_event(&self) -> bool {
        matches!(
            self,
            CatalogEvent::ImportStarted { .. }
                | CatalogEvent::ImportBatchCompleted { .. }
                | CatalogEvent::ImportCompleted { .. }
                | CatalogEvent::ImportAborted { .. }
        )
    }
}

/// Broadcast bus for CatalogEvent
///
/// Slow subscribers lose the oldest events once `capacity` is exceeded.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CatalogEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: CatalogEvent,
    ) -> Result<usize, broadcast::error::SendError<CatalogEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: CatalogEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_emitted_event() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();

        let run_id = Uuid::new_v4();
        bus.emit(CatalogEvent::ImportStarted {
            run_id,
            total: 3,
            timestamp: Utc::now(),
        })
        .unwrap();

        match rx.recv().await.unwrap() {
            CatalogEvent::ImportStarted { run_id: got, total, .. } => {
                assert_eq!(got, run_id);
                assert_eq!(total, 3);
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(10);
        let event = CatalogEvent::ReviewSessionClosed {
            session_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        };

        assert!(bus.emit(event.clone()).is_err());
        // Lossy emit never fails
        bus.emit_lossy(event);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.capacity(), 10);
    }

    #[test]
    fn test_serialized_event_is_tagged() {
        let event = CatalogEvent::ImportCompleted {
            run_id: Uuid::nil(),
            total: 2,
            imported: 1,
            skipped: 0,
            failed: 1,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ImportCompleted");
        assert_eq!(json["failed"], 1);
        assert_eq!(event.event_type(), "ImportCompleted");
        assert!(event.is_import_event());
    }

    #[test]
    fn test_review_events_are_not_import_events() {
        let event = CatalogEvent::ReviewSessionStarted {
            session_id: Uuid::new_v4(),
            item_count: 4,
            timestamp: Utc::now(),
        };
        assert!(!event.is_import_event());
    }
}
