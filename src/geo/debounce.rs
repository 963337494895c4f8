//! Latest-wins gating for the location search: every incoming query takes a
//! ticket, which supersedes all earlier ones. A ticket waits out a quiet
//! interval before its lookup is issued, and a result is only applied while
//! its ticket is still the latest. Superseded lookups never update state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct SearchGate {
    latest: Arc<AtomicU64>,
}

#[derive(Debug)]
pub struct SearchTicket {
    latest: Arc<AtomicU64>,
    generation: u64,
}

impl SearchGate {
    pub fn new() -> SearchGate {
        SearchGate::default()
    }

    /// Take a ticket for a new query, superseding any outstanding ones.
    pub fn begin(&self) -> SearchTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        SearchTicket {
            latest: Arc::clone(&self.latest),
            generation,
        }
    }
}

impl SearchTicket {
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }

    /// Debounce: sleep the quiet interval, then report whether this ticket
    /// survived it. A ticket superseded during the wait must not issue its
    /// lookup at all.
    pub async fn wait_quiet(&self, interval: Duration) -> bool {
        tokio::time::sleep(interval).await;
        self.is_current()
    }
}
