use futures::future::try_join_all;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;
use crate::fetch::FetchResult;

/// A single symbol's price/change snapshot at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteEnvelope {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuotePayload>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuotePayload {
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "09. change")]
    change: String,
    #[serde(rename = "10. change percent")]
    change_percent: String,
}

/// Fetches global quotes for a symbol list as one all-or-nothing batch.
pub struct QuoteFetcher {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl QuoteFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.quote_base_url.clone(),
            api_key: config.api_key.clone(),
            client: Client::new(),
        }
    }

    /// Issue one request per symbol, concurrently, and join them fail-fast.
    ///
    /// The returned set has exactly one quote per requested symbol, in request
    /// order. Any single-symbol failure rejects the whole batch; partial
    /// results are never returned.
    pub async fn fetch_quotes(&self, symbols: &[String]) -> FetchResult<Vec<Quote>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AppError::ApiKeyMissing);
        };

        log::debug!("fetching quotes for {} symbols", symbols.len());

        let requests = symbols
            .iter()
            .map(|symbol| self.fetch_quote(symbol, api_key));

        try_join_all(requests).await
    }

    async fn fetch_quote(&self, symbol: &str, api_key: &str) -> FetchResult<Quote> {
        let url = format!(
            "{}/query?function=GLOBAL_QUOTE&symbol={}&apikey={}",
            self.base_url, symbol, api_key
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpError {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_quote(symbol, &body)
    }
}

fn parse_quote(symbol: &str, body: &str) -> FetchResult<Quote> {
    let envelope: GlobalQuoteEnvelope = serde_json::from_str(body)?;

    if let Some(message) = envelope.error_message {
        return Err(AppError::ProviderError(message));
    }

    let Some(payload) = envelope.global_quote else {
        return Err(AppError::NoData(symbol.to_string()));
    };

    Ok(Quote {
        symbol: symbol.to_string(),
        price: parse_numeric(symbol, &payload.price)?,
        change: parse_numeric(symbol, &payload.change)?,
        change_percent: parse_percent(symbol, &payload.change_percent)?,
    })
}

fn parse_numeric(symbol: &str, raw: &str) -> FetchResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| AppError::NoData(symbol.to_string()))
}

/// The provider delivers change-percent as a `%`-suffixed string. A payload
/// without the suffix is treated as missing data rather than parsed loosely.
fn parse_percent(symbol: &str, raw: &str) -> FetchResult<f64> {
    let trimmed = raw.trim();
    let Some(stripped) = trimmed.strip_suffix('%') else {
        return Err(AppError::NoData(symbol.to_string()));
    };
    parse_numeric(symbol, stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AAPL_PAYLOAD: &str = r#"{
        "Global Quote": {
            "01. symbol": "AAPL",
            "05. price": "175.0400",
            "09. change": "1.2300",
            "10. change percent": "0.71%"
        }
    }"#;

    #[test]
    fn parses_global_quote_payload() {
        let quote = parse_quote("AAPL", AAPL_PAYLOAD).unwrap();

        assert_eq!(quote.symbol, "AAPL");
        assert!((quote.price - 175.04).abs() < 1e-9);
        assert!((quote.change - 1.23).abs() < 1e-9);
        assert!((quote.change_percent - 0.71).abs() < 1e-9);
    }

    #[test]
    fn provider_error_payload_rejects() {
        let body = r#"{"Error Message": "Invalid API call"}"#;

        match parse_quote("AAPL", body) {
            Err(AppError::ProviderError(message)) => {
                assert_eq!(message, "Invalid API call");
            }
            other => panic!("expected ProviderError, got {:?}", other),
        }
    }

    #[test]
    fn missing_quote_object_is_no_data() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage!"}"#;

        assert!(matches!(
            parse_quote("TSLA", body),
            Err(AppError::NoData(symbol)) if symbol == "TSLA"
        ));
    }

    #[test]
    fn percent_without_suffix_is_no_data() {
        let body = r#"{
            "Global Quote": {
                "05. price": "175.04",
                "09. change": "1.23",
                "10. change percent": "0.71"
            }
        }"#;

        assert!(matches!(
            parse_quote("AAPL", body),
            Err(AppError::NoData(_))
        ));
    }

    #[test]
    fn negative_percent_keeps_sign() {
        let body = r#"{
            "Global Quote": {
                "05. price": "242.84",
                "09. change": "-1.37",
                "10. change percent": "-0.5610%"
            }
        }"#;

        let quote = parse_quote("TSLA", body).unwrap();
        assert!(quote.change_percent < 0.0);
    }

    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn test_config(base_url: String, api_key: Option<&str>) -> Config {
        Config {
            quote_base_url: base_url,
            api_key: api_key.map(String::from),
            backend_base_url: String::new(),
            refresh_interval: std::time::Duration::from_secs(60),
            symbols: Vec::new(),
        }
    }

    fn good_payload(price: f64) -> String {
        format!(
            r#"{{"Global Quote": {{"05. price": "{:.2}", "09. change": "1.00", "10. change percent": "0.50%"}}}}"#,
            price
        )
    }

    /// Minimal one-shot HTTP responder keyed by the `symbol` query parameter.
    async fn spawn_quote_server(bodies: HashMap<String, String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let bodies = bodies.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    let symbol = request
                        .split("symbol=")
                        .nth(1)
                        .and_then(|rest| rest.split('&').next())
                        .unwrap_or_default();
                    let body = bodies.get(symbol).cloned().unwrap_or_else(|| "{}".to_string());
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn batch_preserves_request_order() {
        let symbols: Vec<String> = ["MSFT", "AAPL", "GOOG", "TSLA", "NVDA"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let bodies: HashMap<String, String> = symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (symbol.clone(), good_payload(100.0 + i as f64)))
            .collect();

        let base_url = spawn_quote_server(bodies).await;
        let fetcher = QuoteFetcher::new(&test_config(base_url, Some("test-key")));

        let quotes = fetcher.fetch_quotes(&symbols).await.unwrap();

        assert_eq!(quotes.len(), symbols.len());
        let returned: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(returned, ["MSFT", "AAPL", "GOOG", "TSLA", "NVDA"]);
        assert!((quotes[2].price - 102.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn one_bad_symbol_rejects_whole_batch() {
        let symbols: Vec<String> = ["MSFT", "AAPL", "GOOG", "TSLA", "NVDA"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut bodies: HashMap<String, String> = symbols
            .iter()
            .map(|symbol| (symbol.clone(), good_payload(100.0)))
            .collect();
        bodies.insert(
            "GOOG".to_string(),
            r#"{"Error Message": "Invalid API call"}"#.to_string(),
        );

        let base_url = spawn_quote_server(bodies).await;
        let fetcher = QuoteFetcher::new(&test_config(base_url, Some("test-key")));

        let result = fetcher.fetch_quotes(&symbols).await;
        assert!(matches!(result, Err(AppError::ProviderError(_))));
    }

    #[tokio::test]
    async fn missing_api_key_rejects_before_any_request() {
        let fetcher = QuoteFetcher::new(&test_config("http://127.0.0.1:0".to_string(), None));

        let result = fetcher.fetch_quotes(&["AAPL".to_string()]).await;
        assert!(matches!(result, Err(AppError::ApiKeyMissing)));
    }
}
