//! Best-effort audit logging.
//!
//! The inventory core emits one audit event per committed mutation to an
//! external activity-log collaborator. Emission is fire-and-forget: events
//! travel through an unbounded channel to a worker task that forwards them
//! to an [`ActivitySink`], so sink latency or failure can never block or
//! fail the underlying inventory operation. Dropped events are reported at
//! `warn`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    StockAdded,
    StockTransferred,
    SaleCreated,
    SaleDeleted,
}

/// One audit event describing a committed inventory mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: Uuid,
    pub action: ActivityAction,
    /// Entity kind of the created/deleted record.
    pub entity: &'static str,
    pub entity_id: i32,
    pub reference_number: Option<String>,
    /// Units involved, when the action concerns a single quantity.
    pub quantity: Option<i32>,
    pub occurred_at: DateTime<Utc>,
}

impl ActivityEvent {
    /// Create an event stamped with a fresh ID and the current time.
    #[must_use]
    pub fn new(action: ActivityAction, entity: &'static str, entity_id: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            entity,
            entity_id,
            reference_number: None,
            quantity: None,
            occurred_at: Utc::now(),
        }
    }

    /// Attach the business reference number.
    #[must_use]
    pub fn with_reference(mut self, reference_number: &str) -> Self {
        self.reference_number = Some(reference_number.to_owned());
        self
    }

    /// Attach the unit count.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

/// Errors a sink can report. Never propagated to the inventory operation.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("activity sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for audit events (the external activity-log collaborator).
#[async_trait]
pub trait ActivitySink: Send + Sync {
    /// Record one event.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError`] when the event could not be recorded; the
    /// worker logs and drops it.
    async fn record(&self, event: &ActivityEvent) -> Result<(), ActivityError>;
}

/// Sink that writes audit events as structured `tracing` records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl ActivitySink for TracingSink {
    async fn record(&self, event: &ActivityEvent) -> Result<(), ActivityError> {
        tracing::info!(
            target: "stockroom::activity",
            event_id = %event.id,
            action = ?event.action,
            entity = event.entity,
            entity_id = event.entity_id,
            reference = event.reference_number.as_deref().unwrap_or(""),
            quantity = event.quantity.unwrap_or(0),
            "activity"
        );
        Ok(())
    }
}

/// Sink that stores events in memory. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ActivityEvent>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub async fn events(&self) -> Vec<ActivityEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl ActivitySink for MemorySink {
    async fn record(&self, event: &ActivityEvent) -> Result<(), ActivityError> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

/// Handle used by services to emit audit events.
///
/// Cloneable; all clones feed the same worker. The worker exits when every
/// handle has been dropped.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    tx: mpsc::UnboundedSender<ActivityEvent>,
}

impl ActivityLog {
    /// Spawn the forwarding worker and return the emission handle.
    #[must_use]
    pub fn spawn(sink: Arc<dyn ActivitySink>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ActivityEvent>();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(err) = sink.record(&event).await {
                    tracing::warn!(
                        error = %err,
                        action = ?event.action,
                        entity = event.entity,
                        entity_id = event.entity_id,
                        "activity event dropped"
                    );
                }
            }
        });

        Self { tx }
    }

    /// Emit one event. Never blocks and never fails the caller.
    pub fn record(&self, event: ActivityEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("activity worker stopped; audit event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let event = ActivityEvent::new(ActivityAction::StockAdded, "add_stock_adjustment", 7)
            .with_reference("GRN-1")
            .with_quantity(5);

        assert_eq!(event.action, ActivityAction::StockAdded);
        assert_eq!(event.entity_id, 7);
        assert_eq!(event.reference_number.as_deref(), Some("GRN-1"));
        assert_eq!(event.quantity, Some(5));
    }

    #[tokio::test]
    async fn test_events_reach_sink() {
        let sink = Arc::new(MemorySink::new());
        let log = ActivityLog::spawn(Arc::clone(&sink) as Arc<dyn ActivitySink>);

        log.record(ActivityEvent::new(ActivityAction::SaleCreated, "sale", 1));
        log.record(ActivityEvent::new(ActivityAction::SaleDeleted, "sale", 1));

        // Give the forwarding worker a chance to drain the channel.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        let events = sink.events().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, ActivityAction::SaleCreated);
        assert_eq!(events[1].action, ActivityAction::SaleDeleted);
    }
}
