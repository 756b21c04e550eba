//! Shopee provider: remote short-link generation via the affiliate GraphQL
//! API.
//!
//! Authentication is a SHA-256 payload signature carried in a fixed-format
//! authorization header ([`crate::signing::sha256_auth_header`]). The exact
//! payload bytes are signed, so the same string is used for the signature
//! and the request body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::AffiliateProvider;
use crate::config::ShopeeConfig;
use crate::error::{RewriteError, RewriteResult};
use crate::signing::sha256_auth_header;

/// Production endpoint of the Shopee affiliate open API.
pub const SHOPEE_API_URL: &str = "https://open-api.affiliate.shopee.com.br/graphql";

const API_TIMEOUT: Duration = Duration::from_secs(10);

/// Mints short tracked Shopee links through the partner API.
pub struct ShopeeProvider {
    config: Option<ShopeeConfig>,
    client: Client,
    endpoint: String,
}

impl ShopeeProvider {
    #[must_use]
    pub fn new(config: Option<ShopeeConfig>, client: Client) -> Self {
        Self::with_endpoint(config, client, SHOPEE_API_URL)
    }

    /// Constructor with an explicit endpoint, for contract tests against a
    /// mock server.
    #[must_use]
    pub fn with_endpoint(
        config: Option<ShopeeConfig>,
        client: Client,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            config,
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn generate_short_link(&self, config: &ShopeeConfig, url: &str) -> RewriteResult<String> {
        let timestamp = chrono::Utc::now().timestamp();
        let payload = json!({
            "query": format!(
                "mutation {{ generateShortLink(input: {{ originUrl: \"{url}\" }}) {{ shortLink }} }}"
            ),
        })
        .to_string();

        let auth_header = sha256_auth_header(&config.app_id, timestamp, &payload, &config.secret);

        log::debug!("calling Shopee short-link API for {url}");
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(API_TIMEOUT)
            .header(AUTHORIZATION, auth_header)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let envelope: GraphQlEnvelope = response.json().await?;

        if let Some(errors) = envelope.errors.as_deref()
            && let Some(first) = errors.first()
        {
            return Err(RewriteError::PartnerContract(first.message.clone()));
        }

        envelope
            .data
            .and_then(|data| data.generate_short_link)
            .and_then(|link| link.short_link)
            .ok_or_else(|| RewriteError::PartnerContract("no short link in response".to_string()))
    }
}

#[async_trait]
impl AffiliateProvider for ShopeeProvider {
    fn name(&self) -> &'static str {
        "shopee"
    }

    fn can_handle(&self, url: &str) -> bool {
        url.to_ascii_lowercase().contains("shopee.com.br")
    }

    async fn rewrite(&self, url: &str) -> Option<String> {
        let config = self.config.as_ref().filter(|c| c.is_configured());
        let Some(config) = config else {
            log::debug!("Shopee API not configured, skipping affiliate rewrite");
            return None;
        };

        match self.generate_short_link(config, url).await {
            Ok(link) => {
                log::debug!("Shopee affiliate link generated: {link}");
                Some(link)
            }
            Err(e) => {
                log::warn!("Shopee link generation failed for {url}: {e}");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    data: Option<GraphQlData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    #[serde(rename = "generateShortLink")]
    generate_short_link: Option<ShortLink>,
}

#[derive(Debug, Deserialize)]
struct ShortLink {
    #[serde(rename = "shortLink")]
    short_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}
