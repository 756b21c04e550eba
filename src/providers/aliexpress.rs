//! AliExpress provider: remote link generation via the open platform API.
//!
//! AliExpress affiliate links cannot be minted locally; the partner API
//! signs and tracks them. The request is a GET with an MD5-signed query
//! string ([`crate::signing::md5_param_sign`]) and the tracked link comes
//! back in a deeply nested response envelope.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::AffiliateProvider;
use crate::config::AliExpressConfig;
use crate::error::{RewriteError, RewriteResult};
use crate::signing::md5_param_sign;
use crate::utils::BROWSER_USER_AGENT;

/// Production endpoint of the AliExpress open platform.
pub const ALIEXPRESS_API_URL: &str = "https://api-sg.aliexpress.com/sync";

const API_TIMEOUT: Duration = Duration::from_secs(10);

/// Mints tracked AliExpress links through the partner API.
pub struct AliExpressProvider {
    config: Option<AliExpressConfig>,
    client: Client,
    endpoint: String,
}

impl AliExpressProvider {
    #[must_use]
    pub fn new(config: Option<AliExpressConfig>, client: Client) -> Self {
        Self::with_endpoint(config, client, ALIEXPRESS_API_URL)
    }

    /// Constructor with an explicit endpoint, for contract tests against a
    /// mock server.
    #[must_use]
    pub fn with_endpoint(
        config: Option<AliExpressConfig>,
        client: Client,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            config,
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn generate_link(&self, config: &AliExpressConfig, url: &str) -> RewriteResult<String> {
        // Stale tracking params on the source URL would be baked into the
        // minted link.
        let mut source = url::Url::parse(url)?;
        source.set_query(None);
        source.set_fragment(None);
        let cleaned = source.to_string();

        let mut params = BTreeMap::new();
        params.insert("app_key".to_string(), config.app_key.clone());
        params.insert("format".to_string(), "json".to_string());
        params.insert(
            "method".to_string(),
            "aliexpress.affiliate.link.generate".to_string(),
        );
        params.insert("promotion_link_type".to_string(), "0".to_string());
        params.insert("ship_to_country".to_string(), "BR".to_string());
        params.insert("sign_method".to_string(), "md5".to_string());
        params.insert("source_values".to_string(), cleaned.clone());
        params.insert(
            "timestamp".to_string(),
            chrono::Utc::now().timestamp_millis().to_string(),
        );
        params.insert("tracking_id".to_string(), config.tracking_id.clone());
        params.insert("v".to_string(), "1".to_string());

        let sign = md5_param_sign(&params, &config.app_secret);
        params.insert("sign".to_string(), sign);

        log::debug!("calling AliExpress link-generate API for {cleaned}");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .timeout(API_TIMEOUT)
            .header("User-Agent", BROWSER_USER_AGENT)
            .send()
            .await?;

        let envelope: GenerateEnvelope = response.json().await?;
        envelope.into_promotion_link().ok_or_else(|| {
            RewriteError::PartnerContract("no promotion link in response".to_string())
        })
    }
}

#[async_trait]
impl AffiliateProvider for AliExpressProvider {
    fn name(&self) -> &'static str {
        "aliexpress"
    }

    fn can_handle(&self, url: &str) -> bool {
        url.to_ascii_lowercase().contains("aliexpress.com")
    }

    async fn rewrite(&self, url: &str) -> Option<String> {
        let config = self.config.as_ref().filter(|c| c.is_configured());
        let Some(config) = config else {
            log::debug!("AliExpress API not configured, skipping affiliate rewrite");
            return None;
        };

        match self.generate_link(config, url).await {
            Ok(link) => {
                log::debug!("AliExpress affiliate link generated for {url}");
                Some(link)
            }
            Err(e) => {
                log::warn!("AliExpress link generation failed for {url}: {e}");
                None
            }
        }
    }
}

// Response envelope of `aliexpress.affiliate.link.generate`. Every level is
// optional: the API reports errors by omitting the result subtree.

#[derive(Debug, Deserialize)]
struct GenerateEnvelope {
    aliexpress_affiliate_link_generate_response: Option<GenerateResponse>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    resp_result: Option<RespResult>,
}

#[derive(Debug, Deserialize)]
struct RespResult {
    result: Option<LinkResult>,
}

#[derive(Debug, Deserialize)]
struct LinkResult {
    promotion_links: Option<PromotionLinks>,
}

#[derive(Debug, Deserialize)]
struct PromotionLinks {
    promotion_link: Option<Vec<PromotionLink>>,
}

#[derive(Debug, Deserialize)]
struct PromotionLink {
    promotion_link: Option<String>,
}

impl GenerateEnvelope {
    fn into_promotion_link(self) -> Option<String> {
        self.aliexpress_affiliate_link_generate_response?
            .resp_result?
            .result?
            .promotion_links?
            .promotion_link?
            .into_iter()
            .next()?
            .promotion_link
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_provider_declines_without_network() {
        let provider = AliExpressProvider::new(
            Some(AliExpressConfig {
                app_key: "12345".to_string(),
                app_secret: String::new(),
                tracking_id: "blog".to_string(),
            }),
            Client::new(),
        );
        assert_eq!(
            provider
                .rewrite("https://pt.aliexpress.com/item/1005001.html")
                .await,
            None
        );
    }

    #[test]
    fn envelope_extraction_tolerates_missing_levels() {
        let full: GenerateEnvelope = serde_json::from_str(
            r#"{"aliexpress_affiliate_link_generate_response":{"resp_result":{"result":
                {"promotion_links":{"promotion_link":[{"promotion_link":"https://s.click.aliexpress.com/e/_tracked"}]}}}}}"#,
        )
        .expect("deserialize");
        assert_eq!(
            full.into_promotion_link().as_deref(),
            Some("https://s.click.aliexpress.com/e/_tracked")
        );

        let empty: GenerateEnvelope = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(empty.into_promotion_link(), None);

        let truncated: GenerateEnvelope = serde_json::from_str(
            r#"{"aliexpress_affiliate_link_generate_response":{"resp_result":{}}}"#,
        )
        .expect("deserialize");
        assert_eq!(truncated.into_promotion_link(), None);
    }
}
