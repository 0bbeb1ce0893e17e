//! reqwest-backed ledger client.

use crate::api::{BalanceResponse, ChainResponse, LedgerApi};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use blockvision_core::{Block, Transaction};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

/// HTTP client for the ledger service.
///
/// Wraps a `reqwest::Client` (reusable connection pool) with the service's
/// base URL. Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpLedgerClient {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(config.base_url.clone()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Request(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding each path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, segments: &[&str]) -> Result<Response> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "GET");
        self.http
            .get(url)
            .send()
            .await
            .map_err(ClientError::from_send)
    }

    /// Decode a JSON body from a successful response.
    async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("failed to parse body: {e}")))
    }

    /// Read a text body from a successful response.
    async fn text(response: Response) -> Result<String> {
        let response = Self::check_status(response).await?;
        response
            .text()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("failed to read body: {e}")))
    }

    /// Turn a non-2xx response into [`ClientError::Rejected`], keeping its body.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .ok()
            .map(|body| body.trim().to_string())
            .filter(|body| !body.is_empty());
        tracing::debug!(status = status.as_u16(), ?message, "request rejected");

        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl LedgerApi for HttpLedgerClient {
    async fn fetch_chain(&self) -> Result<Vec<Block>> {
        let response = self.get(&["chain"]).await?;
        let body: ChainResponse = Self::json(response).await?;
        Ok(body.chain)
    }

    async fn fetch_balance(&self, address: &str) -> Result<f64> {
        let response = self.get(&["balance", address]).await?;
        let body: BalanceResponse = Self::json(response).await?;
        Ok(body.balance)
    }

    async fn submit_transaction(&self, tx: &Transaction) -> Result<String> {
        let url = self.endpoint(&["transactions", "new"])?;
        tracing::debug!(%url, sender = %tx.sender, receiver = %tx.receiver, amount = tx.amount, "POST");
        let response = self
            .http
            .post(url)
            .json(tx)
            .send()
            .await
            .map_err(ClientError::from_send)?;
        Self::text(response).await
    }

    async fn mine(&self) -> Result<String> {
        let response = self.get(&["mine"]).await?;
        Self::text(response).await
    }
}
