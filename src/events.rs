//! External event sink, per SPEC_FULL.md §6. `optimize()` fires a
//! `route.optimization.completed` notification on completion; emission
//! is fire-and-forget and must never delay returning the result to the
//! caller, so [`ChannelEventSink`] drains a bounded channel on a
//! separate `tokio` task and drops events rather than block when full.

use serde_json::json;
use tracing::warn;

/// A single fire-and-forget operation: `emit(topic, payload)`. Failure
/// to deliver is logged, never surfaced as a solve error.
pub trait EventSink: Send + Sync {
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Discards every event. Used by tests and callers that don't care about
/// completion notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}

/// Drains a bounded `tokio::sync::mpsc` channel (capacity 256) on a
/// background task; a slow or absent consumer cannot delay `optimize()`
/// since sends that would block are dropped instead.
pub struct ChannelEventSink {
    sender: tokio::sync::mpsc::Sender<(String, serde_json::Value)>,
}

impl ChannelEventSink {
    const CAPACITY: usize = 256;

    /// Spawns the draining task and returns the sink half. `deliver` is
    /// called with each `(topic, payload)` pair as it's drained; pass a
    /// closure that forwards to whatever real transport the caller owns.
    pub fn spawn<F>(mut deliver: F) -> Self
    where
        F: FnMut(String, serde_json::Value) + Send + 'static,
    {
        let (sender, mut receiver) = tokio::sync::mpsc::channel(Self::CAPACITY);
        tokio::spawn(async move {
            while let Some((topic, payload)) = receiver.recv().await {
                deliver(topic, payload);
            }
        });
        Self { sender }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        if self.sender.try_send((topic.to_string(), payload)).is_err() {
            warn!(topic, "event sink full or closed, dropping event");
        }
    }
}

/// Builds the `route.optimization.completed` payload from spec.md §6.
pub fn completion_payload(
    algorithm: &str,
    locations_count: usize,
    vehicles_used: usize,
    total_distance_km: f64,
    computation_time_seconds: f64,
) -> serde_json::Value {
    json!({
        "algorithm": algorithm,
        "locationsCount": locations_count,
        "vehiclesUsed": vehicles_used,
        "totalDistance": total_distance_km,
        "computationTime": computation_time_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sink_accepts_anything_without_panicking() {
        let sink = NullEventSink;
        sink.emit("route.optimization.completed", json!({"ok": true}));
    }

    #[tokio::test]
    async fn channel_sink_delivers_emitted_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = ChannelEventSink::spawn(move |topic, payload| {
            let _ = tx.send((topic, payload));
        });

        sink.emit("route.optimization.completed", json!({"algorithm": "tabu"}));

        let (topic, payload) = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .expect("event delivered before timeout")
            .expect("channel open");
        assert_eq!(topic, "route.optimization.completed");
        assert_eq!(payload["algorithm"], "tabu");
    }
}
