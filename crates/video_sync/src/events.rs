use domain::SyncEvent;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("event listener failed: {0}")]
pub struct ListenerError(pub String);

/// Receives lifecycle notifications, synchronously and in-process.
///
/// A listener error is returned to whoever triggered the transition.
pub trait EventSink {
    fn emit(&self, event: &SyncEvent) -> Result<(), ListenerError>;
}

impl<F> EventSink for F
where
    F: Fn(&SyncEvent) -> Result<(), ListenerError>,
{
    fn emit(&self, event: &SyncEvent) -> Result<(), ListenerError> {
        self(event)
    }
}

impl EventSink for UnboundedSender<SyncEvent> {
    fn emit(&self, event: &SyncEvent) -> Result<(), ListenerError> {
        self.send(event.clone())
            .map_err(|_| ListenerError("event receiver dropped".to_string()))
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: &SyncEvent) -> Result<(), ListenerError> {
        Ok(())
    }
}
