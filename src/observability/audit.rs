use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use anyhow::Result;

#[derive(Clone, Debug, Serialize)]
pub struct AuditEvent {
    pub action: &'static str,
    pub user_id: Uuid,
    pub entity_id: Option<Uuid>,
    pub detail: String,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(action: &'static str, user_id: Uuid, entity_id: Option<Uuid>, detail: String) -> Self {
        Self {
            action,
            user_id,
            entity_id,
            detail,
            occurred_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn send(&self, event: &AuditEvent) -> Result<()>;
    fn sink_name(&self) -> &'static str;
}

/// Default sink: the audit trail lands in the structured log stream. The
/// persistent pipeline behind it is owned elsewhere.
pub struct LogAuditSink;

#[async_trait]
impl AuditSink for LogAuditSink {
    async fn send(&self, event: &AuditEvent) -> Result<()> {
        info!(
            action = event.action,
            user_id = %event.user_id,
            entity_id = ?event.entity_id,
            detail = %event.detail,
            occurred_at = %event.occurred_at,
            "audit event"
        );
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "log"
    }
}

/// Fire-and-forget audit channel. Events are queued with `try_send` and
/// drained by a background task; a full or closed queue drops the event with
/// a warning. Recording can never fail or block a core operation.
#[derive(Clone)]
pub struct AuditTrail {
    tx: Option<mpsc::Sender<AuditEvent>>,
}

impl AuditTrail {
    pub fn new(sinks: Vec<Arc<dyn AuditSink>>) -> Self {
        let (tx, mut rx) = mpsc::channel::<AuditEvent>(256);

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                for sink in &sinks {
                    if let Err(error) = sink.send(&event).await {
                        warn!(
                            sink = sink.sink_name(),
                            error = %error,
                            "Audit sink failed"
                        );
                    }
                }
            }
        });

        Self { tx: Some(tx) }
    }

    /// Trail with no consumer; every event is dropped. Used in tests.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn record(&self, event: AuditEvent) {
        let Some(tx) = &self.tx else {
            return;
        };

        match tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Audit queue full; dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Audit queue closed; dropping event");
            }
        }
    }
}
