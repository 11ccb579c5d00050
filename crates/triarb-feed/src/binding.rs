//! Stream bindings: ticker pushes applied to shared quotes.

use crate::error::{FeedError, FeedResult};
use crate::event::parse_ticker;
use crate::quote::SharedQuote;
use std::collections::HashMap;
use tracing::{debug, warn};
use triarb_ws::{topic_symbol, TickerPush};

/// Binds one symbol's ticker stream to its shared quote.
#[derive(Debug, Clone)]
pub struct StreamBinding {
    quote: SharedQuote,
}

impl StreamBinding {
    pub fn new(quote: SharedQuote) -> Self {
        Self { quote }
    }

    pub fn quote(&self) -> &SharedQuote {
        &self.quote
    }

    /// Apply one ticker payload to the quote.
    pub fn apply(&self, data: &serde_json::Value) -> FeedResult<()> {
        let (best_ask, best_bid) = parse_ticker(self.quote.kind(), data)?;
        self.quote.update(best_ask, best_bid);
        debug!(
            symbol = %self.quote.symbol(),
            best_ask = %best_ask,
            best_bid = %best_bid,
            "Quote updated"
        );
        Ok(())
    }
}

/// Routes ticker pushes to the binding for their symbol.
#[derive(Debug, Default)]
pub struct BindingSet {
    bindings: HashMap<String, StreamBinding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding for a quote's symbol.
    pub fn register(&mut self, quote: SharedQuote) {
        let symbol = quote.symbol();
        self.bindings.insert(symbol, StreamBinding::new(quote));
    }

    pub fn get(&self, symbol: &str) -> Option<&StreamBinding> {
        self.bindings.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Route one push to its binding.
    ///
    /// A malformed payload only affects that event: it is logged and
    /// skipped, and the quote keeps its previous values.
    pub fn dispatch(&self, push: &TickerPush) {
        let Some(symbol) = topic_symbol(&push.topic) else {
            warn!(topic = %push.topic, "Push on unrecognized topic");
            return;
        };
        let Some(binding) = self.bindings.get(symbol) else {
            warn!(symbol, "Push for unbound symbol");
            return;
        };
        if let Err(e) = binding.apply(&push.data) {
            warn!(symbol, error = %e, "Ticker event skipped");
        }
    }

    /// Look up a binding, failing loudly for callers that require one.
    pub fn require(&self, symbol: &str) -> FeedResult<&StreamBinding> {
        self.bindings
            .get(symbol)
            .ok_or_else(|| FeedError::UnknownSymbol(symbol.to_string()))
    }
}
