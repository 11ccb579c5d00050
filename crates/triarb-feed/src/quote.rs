//! Shared per-symbol price state.
//!
//! One `SharedQuote` per subscribed symbol, written by the stream binding
//! and read by the evaluation loop. A watch channel flips to `true` the
//! first time the quote becomes operational so waiters can block without
//! polling.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;
use triarb_core::{MarketKind, PairQuote, Price};

/// Thread-safe quote handle with a readiness signal.
#[derive(Debug, Clone)]
pub struct SharedQuote {
    inner: Arc<RwLock<PairQuote>>,
    ready_tx: Arc<watch::Sender<bool>>,
    ready_rx: watch::Receiver<bool>,
}

impl SharedQuote {
    /// Create a quote in the not-yet-operational state.
    pub fn new(symbol: impl Into<String>) -> Self {
        let (ready_tx, ready_rx) = watch::channel(false);
        Self {
            inner: Arc::new(RwLock::new(PairQuote::new(symbol))),
            ready_tx: Arc::new(ready_tx),
            ready_rx,
        }
    }

    pub fn symbol(&self) -> String {
        self.inner.read().symbol.clone()
    }

    pub fn kind(&self) -> MarketKind {
        self.inner.read().kind
    }

    /// Overwrite both sides from a ticker event.
    ///
    /// The readiness signal fires once, on the first update that makes the
    /// quote operational. Later updates keep it set even if an exchange
    /// quirk reports a zero side again.
    pub fn update(&self, best_ask: Price, best_bid: Price) {
        let operational = {
            let mut quote = self.inner.write();
            quote.update(best_ask, best_bid);
            quote.is_operational()
        };
        if operational && !*self.ready_rx.borrow() {
            let _ = self.ready_tx.send(true);
        }
    }

    /// Copy of the current quote. Both sides are taken under one lock so
    /// readers never observe a torn ask/bid pair.
    pub fn snapshot(&self) -> PairQuote {
        self.inner.read().clone()
    }

    pub fn is_operational(&self) -> bool {
        self.inner.read().is_operational()
    }

    /// Receiver for the readiness signal; resolves when the quote has had
    /// at least one operational update.
    pub fn ready(&self) -> watch::Receiver<bool> {
        self.ready_rx.clone()
    }
}
