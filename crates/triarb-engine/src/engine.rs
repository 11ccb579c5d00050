//! Arbitrage evaluation engine.
//!
//! Holds the three quotes of one triangle and walks a two-phase
//! lifecycle: wait until every quote is operational, then sample the
//! implied-vs-real edge on a fixed cadence until cancelled.

use crate::config::{EngineConfig, InitWaitMode};
use crate::error::{EngineError, EngineResult};
use parking_lot::RwLock;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use triarb_core::{ArbitrageSample, Direction, Triangle};
use triarb_feed::SharedQuote;

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    WaitingForInit,
    Evaluating,
    Terminated,
}

pub struct ArbitrageEngine {
    triangle: Triangle,
    first: SharedQuote,
    intermediary: SharedQuote,
    last: SharedQuote,
    config: EngineConfig,
    state: RwLock<EngineState>,
}

impl ArbitrageEngine {
    /// Build an engine over three live quotes.
    ///
    /// The quotes must be the same handles the stream bindings write to;
    /// the engine never updates them itself.
    pub fn new(
        triangle: Triangle,
        first: SharedQuote,
        intermediary: SharedQuote,
        last: SharedQuote,
        config: EngineConfig,
    ) -> Self {
        Self {
            triangle,
            first,
            intermediary,
            last,
            config,
            state: RwLock::new(EngineState::WaitingForInit),
        }
    }

    pub fn state(&self) -> EngineState {
        *self.state.read()
    }

    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    /// Compute one ask-direction sample from the current quotes.
    ///
    /// Returns `None` when a divisor side is still zero; the tick is
    /// skipped and the next one re-reads fresh state.
    pub fn evaluate_once(&self) -> Option<ArbitrageSample> {
        let first = self.first.snapshot();
        let intermediary = self.intermediary.snapshot();
        let last = self.last.snapshot();

        let sample = ArbitrageSample::compute(Direction::Ask, &first, &intermediary, &last);
        if sample.is_none() {
            warn!(
                first = %first.symbol,
                intermediary = %intermediary.symbol,
                last = %last.symbol,
                "Evaluation skipped: divisor side not yet quoted"
            );
        }
        sample
    }

    /// Run until cancelled. Cancellation during either phase is a clean
    /// exit; the state ends at `Terminated` in all cases.
    pub async fn run(&self, cancel: CancellationToken) -> EngineResult<()> {
        info!(
            first = %self.triangle.first,
            intermediary = %self.triangle.intermediary,
            last = %self.triangle.last,
            kind = %self.triangle.kind,
            "Engine waiting for initial quotes"
        );

        let initialized = tokio::select! {
            () = cancel.cancelled() => false,
            result = self.wait_for_init() => {
                result?;
                true
            }
        };
        if !initialized {
            info!("Engine cancelled during initialization");
            *self.state.write() = EngineState::Terminated;
            return Ok(());
        }

        *self.state.write() = EngineState::Evaluating;
        info!(
            interval_ms = self.config.eval_interval_ms,
            "All quotes operational, evaluating"
        );

        let mut ticker = tokio::time::interval(Duration::from_millis(
            self.config.eval_interval_ms.max(1),
        ));
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Some(sample) = self.evaluate_once() {
                        info!(
                            symbol = %self.triangle.first,
                            direction = %sample.direction,
                            implied = %sample.implied_price,
                            real = %sample.real_price,
                            absolute = %sample.absolute_difference,
                            pct = %sample.percentage_difference,
                            "Arbitrage sample"
                        );
                    }
                }
            }
        }

        *self.state.write() = EngineState::Terminated;
        info!("Engine terminated");
        Ok(())
    }

    async fn wait_for_init(&self) -> EngineResult<()> {
        match self.config.init_wait {
            InitWaitMode::Signal => {
                for quote in [&self.first, &self.intermediary, &self.last] {
                    let mut ready = quote.ready();
                    ready
                        .wait_for(|operational| *operational)
                        .await
                        .map_err(|_| EngineError::InitInterrupted)?;
                    debug!(symbol = %quote.symbol(), "Quote operational");
                }
            }
            InitWaitMode::Poll => {
                let mut ticker = tokio::time::interval(Duration::from_millis(
                    self.config.init_poll_interval_ms.max(1),
                ));
                loop {
                    ticker.tick().await;
                    if self.first.is_operational()
                        && self.intermediary.is_operational()
                        && self.last.is_operational()
                    {
                        break;
                    }
                    debug!("Waiting for initial quotes");
                }
            }
        }
        Ok(())
    }
}
