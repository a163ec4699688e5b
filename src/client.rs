use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqwest::Url;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::Endpoint;
use crate::error::GenerateError;
use crate::protocol::{parse_response, GeneratedImage, GeneratorEvent};

/// HTTP client for the generate-image endpoint.
#[derive(Debug, Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ImageClient {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid generate endpoint url: {endpoint}"))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, endpoint })
    }

    pub fn from_config(endpoint: &Endpoint) -> anyhow::Result<Self> {
        Self::new(&endpoint.url, endpoint.request_timeout())
    }

    /// Endpoint with the prompt appended as a percent-encoded query pair.
    pub fn request_url(&self, prompt: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("prompt", prompt);
        url
    }

    /// Issue one GET and validate the JSON body.
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage, GenerateError> {
        let url = self.request_url(prompt);
        debug!(url = %url, "requesting image");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(bytes = body.len(), body = %body, "raw generate response");
        parse_response(&body)
    }
}

/// Run one generation in the background and report back through `tx`.
pub fn spawn_generate(
    client: Arc<ImageClient>,
    request_id: u64,
    prompt: String,
    tx: mpsc::UnboundedSender<GeneratorEvent>,
) {
    tokio::spawn(async move {
        let outcome = client.generate(&prompt).await;
        match &outcome {
            Ok(image) => info!(
                request_id,
                echo = ?image.prompt,
                payload_len = image.img_base64.len(),
                "image generated"
            ),
            Err(e) => debug!(request_id, error = %e, "image request failed"),
        }
        if tx.send(GeneratorEvent::Finished { request_id, outcome }).is_err() {
            debug!(request_id, "app loop gone, dropping generate result");
        }
    });
}
