//! Thin JSON client over reqwest.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client for catalog lookups. Makes exactly one attempt per call.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client with the kjspkg user agent.
    pub fn with_defaults() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("kjspkg-cli/", env!("KJSPKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and deserializes the JSON response.
    ///
    /// Returns `Ok(None)` when the server answers 404. Every other
    /// unsuccessful status, transport failure or malformed body is an error.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("{} not found", url);
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .context("Request was not successful")?;

        let result = response
            .json::<T>()
            .await
            .context("Failed to parse JSON response")?;

        Ok(Some(result))
    }
}
