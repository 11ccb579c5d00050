//! REST market-data client.

use crate::error::{RestError, RestResult};
use crate::kline::{Kline, KlineInterval};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};
use triarb_core::Price;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SUCCESS_CODE: &str = "200000";
/// Maximum candles per klines request, imposed by the API.
const KLINE_BATCH_LIMIT: i64 = 1_500;
const FETCH_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Standard response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: String,
    #[serde(default)]
    msg: Option<String>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> RestResult<T> {
        if self.code != SUCCESS_CODE {
            return Err(RestError::Api {
                code: self.code,
                message: self.msg.unwrap_or_default(),
            });
        }
        self.data.ok_or_else(|| RestError::Api {
            code: self.code,
            message: "missing data field".to_string(),
        })
    }
}

/// Level-1 order book snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct Level1 {
    pub price: Price,
    #[serde(rename = "bestAsk")]
    pub best_ask: Price,
    #[serde(rename = "bestBid")]
    pub best_bid: Price,
}

pub struct MarketClient {
    http: reqwest::Client,
    base_url: String,
}

impl MarketClient {
    pub fn new(base_url: impl Into<String>) -> RestResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the last traded price and best bid/ask for one symbol.
    pub async fn fetch_ticker(&self, symbol: &str) -> RestResult<Level1> {
        let url = format!("{}/api/v1/market/orderbook/level1", self.base_url);
        let envelope: Envelope<Level1> = self
            .http
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_data()
    }

    /// Fetch one batch of candles in `[start_at, end_at)`, newest first,
    /// at most [`KLINE_BATCH_LIMIT`] rows. The endpoint treats `endAt` as
    /// exclusive.
    pub async fn fetch_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        start_at: i64,
        end_at: i64,
    ) -> RestResult<Vec<Kline>> {
        let url = format!("{}/api/v1/market/candles", self.base_url);
        let envelope: Envelope<Vec<Vec<String>>> = self
            .http
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("type", interval.as_str()),
                ("startAt", &start_at.to_string()),
                ("endAt", &end_at.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        envelope
            .into_data()?
            .iter()
            .map(|row| Kline::from_row(row))
            .collect()
    }

    /// Fetch every candle in `[start_at, end_at)`, oldest first.
    ///
    /// The API caps each response at [`KLINE_BATCH_LIMIT`] rows, so the
    /// range is walked backwards one batch at a time. A failed batch is
    /// retried up to [`FETCH_ATTEMPTS`] times and then aborts the whole
    /// fetch; a partial result is never returned as if it were complete.
    pub async fn fetch_all_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        start_at: i64,
        end_at: i64,
    ) -> RestResult<Vec<Kline>> {
        let window = KLINE_BATCH_LIMIT * interval.seconds();
        collect_klines(start_at, end_at, window, |batch_start, batch_end| {
            fetch_with_retry(move || self.fetch_klines(symbol, interval, batch_start, batch_end))
        })
        .await
    }
}

/// Walk `[start_at, end_at)` backwards one batch at a time, stitching the
/// responses into one oldest-first series.
///
/// Each follow-up window ends at the oldest candle the previous response
/// actually contained (the exclusive `endAt` of the next request), never
/// at a boundary computed from the window width. That keeps the series
/// gap-free even when a response covers less of the window than
/// requested. An empty batch means history ends above `start_at`.
async fn collect_klines<F, Fut>(
    start_at: i64,
    end_at: i64,
    window: i64,
    mut fetch: F,
) -> RestResult<Vec<Kline>>
where
    F: FnMut(i64, i64) -> Fut,
    Fut: Future<Output = RestResult<Vec<Kline>>>,
{
    let mut collected: Vec<Kline> = Vec::new();
    let mut batch_end = end_at;

    while batch_end > start_at {
        // The window keeps each request within the row cap.
        let batch_start = start_at.max(batch_end - window);
        let batch = fetch(batch_start, batch_end).await?;
        debug!(
            batch_start,
            batch_end,
            rows = batch.len(),
            "Fetched kline batch"
        );
        let Some(oldest) = batch.last().map(|k| k.time) else {
            break;
        };
        collected.extend(batch);
        batch_end = oldest;
    }

    // Batches arrive newest first; flip to chronological order.
    collected.reverse();
    Ok(collected)
}

/// Run one batch fetch with a bounded retry budget.
async fn fetch_with_retry<F, Fut>(mut fetch: F) -> RestResult<Vec<Kline>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RestResult<Vec<Kline>>>,
{
    let mut last_error = String::new();
    for attempt in 1..=FETCH_ATTEMPTS {
        match fetch().await {
            Ok(batch) => return Ok(batch),
            Err(e) => {
                warn!(attempt, error = %e, "Kline batch failed");
                last_error = e.to_string();
                if attempt < FETCH_ATTEMPTS {
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
            }
        }
    }
    Err(RestError::RetriesExhausted {
        attempts: FETCH_ATTEMPTS,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::cell::RefCell;

    #[test]
    fn test_envelope_success() {
        let envelope: Envelope<Level1> = serde_json::from_str(
            r#"{"code":"200000","data":{"price":"50005","bestAsk":"50010","bestBid":"50000"}}"#,
        )
        .unwrap();
        let level1 = envelope.into_data().unwrap();
        assert_eq!(level1.price.inner(), dec!(50005));
        assert_eq!(level1.best_ask.inner(), dec!(50010));
    }

    #[test]
    fn test_envelope_error_code() {
        let envelope: Envelope<Level1> =
            serde_json::from_str(r#"{"code":"400100","msg":"symbol not exists"}"#).unwrap();
        let result = envelope.into_data();
        assert!(matches!(
            result,
            Err(RestError::Api { code, .. }) if code == "400100"
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = MarketClient::new("https://api.example.com/").unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
    }

    fn candle(time: i64) -> Kline {
        Kline {
            time,
            open: Price::new(dec!(1)),
            close: Price::new(dec!(2)),
            high: Price::new(dec!(3)),
            low: Price::new(dec!(0.5)),
            volume: dec!(1),
            turnover: dec!(2),
        }
    }

    /// Candles on a fixed grid inside `[start, end)`, newest first,
    /// capped at `cap` rows like the real endpoint.
    fn grid_batch(spacing: i64, last_time: i64, start: i64, end: i64, cap: usize) -> Vec<Kline> {
        let mut rows: Vec<Kline> = (0..=last_time)
            .step_by(spacing as usize)
            .filter(|t| *t >= start && *t < end)
            .map(candle)
            .collect();
        rows.reverse();
        rows.truncate(cap);
        rows
    }

    fn busy() -> RestError {
        RestError::Api {
            code: "500000".to_string(),
            message: "busy".to_string(),
        }
    }

    #[tokio::test]
    async fn test_multi_batch_stitch_is_complete_and_ordered() {
        // 21 one-minute candles at 0, 60, ..., 1200; five fit per window.
        let klines = collect_klines(0, 1260, 300, |start, end| {
            let rows = grid_batch(60, 1200, start, end, 1_500);
            async move { Ok(rows) }
        })
        .await
        .unwrap();

        assert_eq!(klines.len(), 21);
        let times: Vec<i64> = klines.iter().map(|k| k.time).collect();
        let expected: Vec<i64> = (0..=1200).step_by(60).collect();
        assert_eq!(times, expected);
    }

    #[tokio::test]
    async fn test_short_batches_leave_no_gap() {
        // The endpoint returns only two rows per call, far less than the
        // requested window. Pagination must follow the oldest returned
        // candle, not the window boundary, or candles vanish.
        let klines = collect_klines(0, 1260, 300, |start, end| {
            let rows = grid_batch(60, 1200, start, end, 2);
            async move { Ok(rows) }
        })
        .await
        .unwrap();

        assert_eq!(klines.len(), 21);
        for pair in klines.windows(2) {
            assert_eq!(pair[1].time - pair[0].time, 60);
        }
    }

    #[tokio::test]
    async fn test_empty_batch_stops_before_start() {
        // History only reaches back to t=600.
        let klines = collect_klines(0, 1260, 300, |start, end| {
            let rows: Vec<Kline> = grid_batch(60, 1200, start, end, 1_500)
                .into_iter()
                .filter(|k| k.time >= 600)
                .collect();
            async move { Ok(rows) }
        })
        .await
        .unwrap();

        assert_eq!(klines.first().map(|k| k.time), Some(600));
        assert_eq!(klines.last().map(|k| k.time), Some(1200));
    }

    #[tokio::test]
    async fn test_batch_error_aborts_whole_fetch() {
        let calls = RefCell::new(0u32);
        let result = collect_klines(0, 1260, 300, |start, end| {
            *calls.borrow_mut() += 1;
            let fail = *calls.borrow() == 2;
            let rows = grid_batch(60, 1200, start, end, 1_500);
            async move {
                if fail {
                    Err(busy())
                } else {
                    Ok(rows)
                }
            }
        })
        .await;

        assert!(matches!(result, Err(RestError::Api { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_within_attempt_budget() {
        let calls = RefCell::new(0u32);
        let batch = fetch_with_retry(|| {
            *calls.borrow_mut() += 1;
            let fail = *calls.borrow() < 3;
            async move {
                if fail {
                    Err(busy())
                } else {
                    Ok(vec![candle(0)])
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted_is_an_error() {
        let calls = RefCell::new(0u32);
        let result = fetch_with_retry(|| {
            *calls.borrow_mut() += 1;
            async {
                let failed: RestResult<Vec<Kline>> = Err(busy());
                failed
            }
        })
        .await;

        assert!(matches!(
            result,
            Err(RestError::RetriesExhausted { attempts: 3, .. })
        ));
        assert_eq!(*calls.borrow(), 3);
    }
}
