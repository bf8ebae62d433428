//! Per-consumer subscription state machine
//!
//! ```text
//!   ┌──────────────┐  emit Reset   ┌───────────┐
//!   │ ResetPending │──────────────►│ Streaming │◄──┐ read_from → Data
//!   └──────────────┘               └─────┬─────┘───┘
//!                                        │ read_from → Reset
//!                                        ▼
//!                                   emit Reset
//! ```
//!
//! The stream never ends on its own. It goes away when the consumer drops
//! it, which also abandons any pending wait on the log.

use std::sync::Arc;

use futures_util::stream::{self, Stream};

use crate::broadcast::{BroadcastLog, Cursor, ReadResult};
use crate::stats::RelayStats;

use super::event::StreamEvent;

/// Subscription state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Must announce an epoch boundary before reading
    ResetPending,
    /// Reading records from the current epoch
    Streaming,
}

/// One consumer's view of the broadcast log
pub struct SubscriptionStream {
    id: u64,
    log: Arc<BroadcastLog>,
    cursor: Cursor,
    state: SubscriptionState,
    stats: Option<Arc<RelayStats>>,
}

impl SubscriptionStream {
    /// Create a subscription positioned at the start of the current epoch
    pub fn new(id: u64, log: Arc<BroadcastLog>) -> Self {
        let cursor = log.cursor();
        Self {
            id,
            log,
            cursor,
            state: SubscriptionState::ResetPending,
            stats: None,
        }
    }

    /// Count this subscription in `stats` for as long as it lives
    pub fn with_stats(mut self, stats: Arc<RelayStats>) -> Self {
        stats.subscriber_attached();
        self.stats = Some(stats);
        self
    }

    /// Subscription ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current state
    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// Wait for the next event
    ///
    /// The first call always returns [`StreamEvent::Reset`] without waiting.
    pub async fn next_event(&mut self) -> StreamEvent {
        match self.state {
            SubscriptionState::ResetPending => {
                // Align to whatever epoch is current when the reset goes out
                self.cursor = self.log.cursor();
                self.state = SubscriptionState::Streaming;
                StreamEvent::Reset
            }
            SubscriptionState::Streaming => match self.log.read_from(&mut self.cursor).await {
                ReadResult::Data(batch) => StreamEvent::Data(batch),
                ReadResult::Reset { version } => {
                    tracing::debug!(
                        subscription_id = self.id,
                        version,
                        "Log reset observed"
                    );
                    StreamEvent::Reset
                }
            },
        }
    }

    /// Turn the subscription into an endless event stream
    pub fn into_stream(self) -> impl Stream<Item = StreamEvent> + Send + 'static {
        stream::unfold(self, |mut sub| async move {
            let event = sub.next_event().await;
            Some((event, sub))
        })
    }
}

impl Drop for SubscriptionStream {
    fn drop(&mut self) {
        if let Some(stats) = self.stats.take() {
            stats.subscriber_detached();
        }
        tracing::debug!(subscription_id = self.id, "Subscription closed");
    }
}
