//! HTTP client for the trading backend.
//!
//! Endpoints:
//!   POST /buy-suggestions     {amount}                          → [{symbol, price}] | {error}
//!   POST /buy-stock           {user_id, symbol, price, quantity} → {message}
//!   GET  /portfolio/{user_id}                                   → {stocks: [...]} | [...]
//!   POST /sell-stock          {user_id, symbol, quantity}        → {message}

pub mod types;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use types::{
    BareHolding, BuyRequest, MessageResponse, PortfolioPayload, PortfolioStock, SellRequest,
    SuggestionItem, SuggestionsPayload, SuggestionsRequest,
};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid backend url: {0}")]
    Url(String),
}

/// The four backend calls the pages make.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn buy_suggestions(&self, amount: f64) -> Result<SuggestionsPayload, ClientError>;
    async fn buy_stock(&self, req: &BuyRequest) -> Result<MessageResponse, ClientError>;
    async fn portfolio(&self, user_id: &str) -> Result<PortfolioPayload, ClientError>;
    async fn sell_stock(&self, req: &SellRequest) -> Result<MessageResponse, ClientError>;
}

/// reqwest-backed [`Backend`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build an endpoint URL, percent-encoding each path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, ClientError> {
        let mut url =
            reqwest::Url::parse(&self.base_url).map_err(|e| ClientError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "GET");
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        if status >= 400 {
            return Err(ClientError::Api { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let (status, text) = self.post_raw(segments, body).await?;
        if status >= 400 {
            return Err(ClientError::Api { status, body: text });
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// POST whose reply is a `{message}`.
    async fn post_message<B: Serialize>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<MessageResponse, ClientError> {
        let (status, text) = self.post_raw(segments, body).await?;
        decode_message(status, &text)
    }

    async fn post_raw<B: Serialize>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(u16, String), ClientError> {
        let url = self.endpoint(segments)?;
        let body_str = serde_json::to_string(body)?;
        debug!(%url, body = %body_str, "POST");

        let resp = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body_str)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let text = resp.text().await?;
        Ok((status, text))
    }
}

/// Decode a `{message}` reply. The backend reports rejections such as
/// "Invalid data" with a 4xx status and the same body shape, so a non-empty
/// message is returned whatever the status. An error status without one is
/// an API error.
pub fn decode_message(status: u16, body: &str) -> Result<MessageResponse, ClientError> {
    match serde_json::from_str::<MessageResponse>(body) {
        Ok(msg) if status < 400 || !msg.message.is_empty() => Ok(msg),
        Ok(_) => Err(ClientError::Api {
            status,
            body: body.to_string(),
        }),
        Err(_) if status >= 400 => Err(ClientError::Api {
            status,
            body: body.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

impl Backend for HttpBackend {
    async fn buy_suggestions(&self, amount: f64) -> Result<SuggestionsPayload, ClientError> {
        self.post_json(&["buy-suggestions"], &SuggestionsRequest { amount })
            .await
    }

    async fn buy_stock(&self, req: &BuyRequest) -> Result<MessageResponse, ClientError> {
        self.post_message(&["buy-stock"], req).await
    }

    async fn portfolio(&self, user_id: &str) -> Result<PortfolioPayload, ClientError> {
        self.get_json(&["portfolio", user_id]).await
    }

    async fn sell_stock(&self, req: &SellRequest) -> Result<MessageResponse, ClientError> {
        self.post_message(&["sell-stock"], req).await
    }
}
