//! Serialized access to a shared [`HistoryBuffer`] for the host and the input widget.
//!
//! Mutations travel over a channel and are applied one at a time, so a refresh
//! never overlaps the write of a previous commit. Recall goes straight to the
//! buffer through [`HistoryHandle`].

use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::{debug, warn};

use super::buffer::{HistoryBuffer, RecallMode};
use super::error::{HistoryError, HistoryResult};
use crate::config::{ConfigPatch, ConfigPersister};

pub type SharedHistory = Arc<Mutex<HistoryBuffer>>;

pub type Reply<T> = oneshot::Sender<HistoryResult<T>>;

#[derive(Debug)]
pub enum HistoryEvent {
    Commit(String),
    Trim(usize),
    SetMaximum(usize),
    Refresh { reply: Option<Reply<usize>> },
}

pub type HistoryEventSender = mpsc::UnboundedSender<HistoryEvent>;
pub type HistoryEventReceiver = mpsc::UnboundedReceiver<HistoryEvent>;

pub struct HistoryEventHandler {
    buffer: SharedHistory,
    persister: Option<Arc<ConfigPersister>>,
    event_rx: HistoryEventReceiver,
}

impl HistoryEventHandler {
    #[must_use]
    pub fn new(
        buffer: SharedHistory,
        persister: Option<Arc<ConfigPersister>>,
    ) -> (Self, HistoryEventSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                buffer,
                persister,
                event_rx: rx,
            },
            tx,
        )
    }

    pub async fn run(mut self) {
        while let Some(event) = self.event_rx.recv().await {
            if let Err(e) = self.handle_event(event).await {
                if e.is_io() {
                    warn!("Could not sync history to disk: {}. Change kept in-memory.", e);
                } else {
                    warn!("History operation rejected: {}", e);
                }
            }
        }
    }

    async fn handle_event(&self, event: HistoryEvent) -> HistoryResult<()> {
        let mut buffer = self.buffer.lock().await;
        match event {
            HistoryEvent::Commit(line) => {
                buffer.push_line(&line).await?;
                Ok(())
            }
            HistoryEvent::Trim(count) => {
                let removed = buffer.trim_to_count(count).await?;
                debug!(removed, kept = buffer.len(), "Trimmed history");
                Ok(())
            }
            HistoryEvent::SetMaximum(maximum) => {
                buffer.set_maximum_lines(maximum).await?;
                self.persist_maximum(maximum);
                Ok(())
            }
            HistoryEvent::Refresh { reply } => {
                let result = buffer.refresh().await;
                match reply {
                    Some(reply) => {
                        let _ = reply.send(result);
                        Ok(())
                    }
                    None => result.map(|_| ()),
                }
            }
        }
    }

    fn persist_maximum(&self, maximum: usize) {
        let Some(persister) = &self.persister else {
            return;
        };
        if let Err(e) = persister.apply_patch(&ConfigPatch::max_lines(maximum)) {
            warn!(
                "Failed to persist maximum number of lines: {}. Change succeeded in-memory.",
                e
            );
        }
    }
}

/// Capability handed to the UI layer.
#[derive(Clone)]
pub struct HistoryHandle {
    buffer: SharedHistory,
    events: HistoryEventSender,
}

impl HistoryHandle {
    #[must_use]
    pub const fn new(buffer: SharedHistory, events: HistoryEventSender) -> Self {
        Self { buffer, events }
    }

    /// Queues a submitted line. Returns false once the event handler has stopped.
    pub fn commit(&self, line: impl Into<String>) -> bool {
        self.events.send(HistoryEvent::Commit(line.into())).is_ok()
    }

    pub fn trim(&self, count: usize) -> bool {
        self.events.send(HistoryEvent::Trim(count)).is_ok()
    }

    /// Queues a new maximum. Out-of-range values are refused up front.
    pub async fn set_maximum_lines(&self, maximum: usize) -> bool {
        if !self.buffer.lock().await.limits().contains(maximum) {
            warn!(maximum, "Refusing out-of-range maximum number of lines");
            return false;
        }
        self.events.send(HistoryEvent::SetMaximum(maximum)).is_ok()
    }

    pub async fn maximum_lines(&self) -> usize {
        self.buffer.lock().await.maximum_lines()
    }

    /// Re-reads the history file after every queued change has been applied.
    pub async fn refresh(&self) -> HistoryResult<usize> {
        let (tx, rx) = oneshot::channel();
        self.events
            .send(HistoryEvent::Refresh { reply: Some(tx) })
            .map_err(|_| HistoryError::NotInitialized)?;
        rx.await.map_err(|_| HistoryError::NotInitialized)?
    }

    pub async fn scroll_back(&self, current_input: &str, mode: RecallMode) -> Option<String> {
        self.buffer.lock().await.scroll_back(current_input, mode)
    }

    pub async fn scroll_forward(&self, current_input: &str, mode: RecallMode) -> Option<String> {
        self.buffer.lock().await.scroll_forward(current_input, mode)
    }

    pub async fn reset_scroll(&self) {
        self.buffer.lock().await.reset_scroll();
    }
}
