//! HTTP routes for consumers and administration
//!
//! - `GET /events` streams a subscription as Server-Sent Events. Each event
//!   is a single `data:` line, `reset` or a JSON array of records.
//! - `GET /stats` returns relay counters as JSON.
//! - `POST /shutdown` stops the server.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::{Stream, StreamExt};

use crate::stats::StatsSnapshot;
use crate::subscription::{StreamEvent, SubscriptionStream};

use super::state::RelayState;

/// Build the HTTP router
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/events", get(events))
        .route("/stats", get(stats))
        .route("/shutdown", post(shutdown))
        .with_state(state)
}

async fn events(
    State(state): State<RelayState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription_id = state.next_connection_id();
    tracing::info!(subscription_id, "Consumer attached");

    let events = SubscriptionStream::new(subscription_id, Arc::clone(&state.log))
        .with_stats(Arc::clone(&state.stats))
        .into_stream()
        .filter_map(move |event| async move {
            match to_sse(&event) {
                Ok(sse) => Some(Ok::<_, Infallible>(sse)),
                Err(e) => {
                    tracing::warn!(subscription_id, error = %e, "Failed to encode event");
                    None
                }
            }
        })
        .take_until(state.shutdown.clone().cancelled_owned());

    Sse::new(events).keep_alive(KeepAlive::new().interval(state.config.keep_alive_interval))
}

/// Encode an event as one SSE frame
pub fn to_sse(event: &StreamEvent) -> serde_json::Result<Event> {
    Ok(Event::default().data(event.payload()?))
}

async fn stats(State(state): State<RelayState>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot(state.log.snapshot()))
}

async fn shutdown(State(state): State<RelayState>) -> &'static str {
    tracing::info!("Shutdown requested over HTTP");
    state.shutdown.cancel();
    "Server shutting down..."
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::Record;
    use crate::server::config::ServerConfig;

    #[tokio::test]
    async fn test_shutdown_cancels_token() {
        let state = RelayState::new(ServerConfig::default());
        let body = shutdown(State(state.clone())).await;

        assert_eq!(body, "Server shutting down...");
        assert!(state.shutdown.is_cancelled());
    }

    #[tokio::test]
    async fn test_stats_include_log_position() {
        let state = RelayState::new(ServerConfig::default());
        state.log.clear();
        state.log.append(vec![Record::from("1"), Record::from("2")]);

        let Json(snapshot) = stats(State(state)).await;
        assert_eq!(snapshot.log_version, 1);
        assert_eq!(snapshot.log_len, 2);
    }

    #[test]
    fn test_to_sse_encodes_both_kinds() {
        assert!(to_sse(&StreamEvent::Reset).is_ok());
        assert!(to_sse(&StreamEvent::Data(vec![Record::from("a")])).is_ok());
    }
}
