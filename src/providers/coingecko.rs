use crate::core::price::{FetchError, PriceFetcher, PriceQuote};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("coinconv/", env!("CARGO_PKG_VERSION"));

// {"bitcoin": {"usd": 50000.0, "usd_market_cap": 1e12, ...}}
type SimplePriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

/// Fetches quotes from the CoinGecko `simple/price` endpoint.
pub struct CoinGeckoFetcher {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl CoinGeckoFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Transport)?;
        Ok(CoinGeckoFetcher {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    fn request_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(err)
        }
    }
}

#[async_trait]
impl PriceFetcher for CoinGeckoFetcher {
    #[instrument(
        name = "CoinGeckoPriceFetch",
        skip(self),
        fields(crypto_id = %crypto_id, fiat_code = %fiat_code)
    )]
    async fn fetch(&self, crypto_id: &str, fiat_code: &str) -> Result<PriceQuote, FetchError> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies={}&include_market_cap=true&include_24hr_vol=true&include_24hr_change=true",
            self.base_url, crypto_id, fiat_code
        );
        debug!("Requesting price data from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        debug!(response = ?response, "Received CoinGecko response");

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                crypto_id: crypto_id.to_string(),
                fiat_code: fiat_code.to_string(),
            });
        }

        let text = response.text().await.map_err(|e| self.request_error(e))?;
        let mut data: SimplePriceResponse =
            serde_json::from_str(&text).map_err(FetchError::Malformed)?;

        let missing = || FetchError::MissingPair {
            crypto_id: crypto_id.to_string(),
            fiat_code: fiat_code.to_string(),
        };
        let fields = data.remove(crypto_id).ok_or_else(missing)?;
        let unit_price = fields.get(fiat_code).copied().flatten().ok_or_else(missing)?;
        let field = |suffix: &str| {
            fields
                .get(&format!("{fiat_code}_{suffix}"))
                .copied()
                .flatten()
                .unwrap_or(0.0)
        };

        Ok(PriceQuote {
            crypto_id: crypto_id.to_string(),
            fiat_code: fiat_code.to_string(),
            unit_price,
            market_cap: field("market_cap"),
            volume_24h: field("24h_vol"),
            change_24h: field("24h_change"),
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .and(query_param("ids", "bitcoin"))
            .and(query_param("vs_currencies", "usd"))
            .and(query_param("include_market_cap", "true"))
            .and(query_param("include_24hr_vol", "true"))
            .and(query_param("include_24hr_change", "true"))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn fetcher(mock_server: &MockServer) -> CoinGeckoFetcher {
        CoinGeckoFetcher::new(&mock_server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_price_fetch() {
        let mock_response = r#"{
            "bitcoin": {
                "usd": 50000.0,
                "usd_market_cap": 1000000000000.0,
                "usd_24h_vol": 50000000000.0,
                "usd_24h_change": 2.5
            }
        }"#;
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;

        let quote = fetcher(&mock_server).fetch("bitcoin", "usd").await.unwrap();
        assert_eq!(quote.crypto_id, "bitcoin");
        assert_eq!(quote.fiat_code, "usd");
        assert_eq!(quote.unit_price, 50000.0);
        assert_eq!(quote.market_cap, 1e12);
        assert_eq!(quote.volume_24h, 5e10);
        assert_eq!(quote.change_24h, 2.5);
    }

    #[tokio::test]
    async fn test_sends_user_agent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"bitcoin":{"usd":1.0}}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        fetcher(&mock_server).fetch("bitcoin", "usd").await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_optional_fields_default_to_zero() {
        let mock_response = r#"{"bitcoin": {"usd": 42000.5, "usd_24h_change": null}}"#;
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;

        let quote = fetcher(&mock_server).fetch("bitcoin", "usd").await.unwrap();
        assert_eq!(quote.unit_price, 42000.5);
        assert_eq!(quote.market_cap, 0.0);
        assert_eq!(quote.volume_24h, 0.0);
        assert_eq!(quote.change_24h, 0.0);
    }

    #[tokio::test]
    async fn test_negative_change() {
        let mock_response = r#"{"bitcoin": {"usd": 100, "usd_24h_change": -3.75}}"#;
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;

        let quote = fetcher(&mock_server).fetch("bitcoin", "usd").await.unwrap();
        assert_eq!(quote.unit_price, 100.0);
        assert_eq!(quote.change_24h, -3.75);
    }

    #[tokio::test]
    async fn test_missing_crypto_key() {
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string("{}")).await;

        let result = fetcher(&mock_server).fetch("bitcoin", "usd").await;
        let err = result.unwrap_err();
        assert!(matches!(err, FetchError::MissingPair { .. }));
        assert_eq!(err.to_string(), "no price data for bitcoin/usd");
    }

    #[tokio::test]
    async fn test_missing_fiat_price() {
        let mock_response = r#"{"bitcoin": {"eur": 45000.0}}"#;
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;

        let result = fetcher(&mock_server).fetch("bitcoin", "usd").await;
        assert!(matches!(result, Err(FetchError::MissingPair { .. })));
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let mock_server = create_mock_server(ResponseTemplate::new(429)).await;

        let err = fetcher(&mock_server)
            .fetch("bitcoin", "usd")
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(
            err.to_string(),
            "HTTP error: 429 Too Many Requests for bitcoin/usd"
        );
    }

    #[tokio::test]
    async fn test_server_error_response() {
        let mock_server = create_mock_server(ResponseTemplate::new(500)).await;

        let err = fetcher(&mock_server)
            .fetch("bitcoin", "usd")
            .await
            .unwrap_err();
        assert!(!err.is_rate_limited());
        assert_eq!(
            err.to_string(),
            "HTTP error: 500 Internal Server Error for bitcoin/usd"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server(
            ResponseTemplate::new(200).set_body_string(r#"{"bitcoin": "not a map"}"#),
        )
        .await;

        let err = fetcher(&mock_server)
            .fetch("bitcoin", "usd")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
        assert!(
            err.to_string()
                .starts_with("failed to parse price response")
        );
    }

    #[tokio::test]
    async fn test_timeout() {
        let mock_server = create_mock_server(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"bitcoin": {"usd": 1.0}}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .await;

        let fetcher = CoinGeckoFetcher::new(&mock_server.uri(), Duration::from_millis(100)).unwrap();
        let err = fetcher.fetch("bitcoin", "usd").await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(t) if t == Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop a listener so the port is known to be closed.
        let uri = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };

        let fetcher = CoinGeckoFetcher::new(&uri, Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch("bitcoin", "usd").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
        assert!(err.to_string().starts_with("request failed"));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_server = create_mock_server(
            ResponseTemplate::new(200).set_body_string(r#"{"bitcoin": {"usd": 1.0}}"#),
        )
        .await;

        let fetcher =
            CoinGeckoFetcher::new(&format!("{}/", mock_server.uri()), Duration::from_secs(5))
                .unwrap();
        assert!(fetcher.fetch("bitcoin", "usd").await.is_ok());
    }
}
