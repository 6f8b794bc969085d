//! Periodic eviction for the in-memory caches.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::interval;

use crate::state::AppState;

/// Prune expired and excess cache entries every `period`.
pub async fn run_cache_prune_loop(
    state: Arc<AppState>,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = interval(period.max(Duration::from_secs(1)));
    // First tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Cache prune loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let removed = state.prune_caches();
                if removed > 0 {
                    tracing::debug!("Pruned {} cache entries", removed);
                }
            }
        }
    }
}
