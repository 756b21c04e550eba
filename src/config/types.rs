//! Affiliate configuration types.
//!
//! One slot per provider. An absent or empty slot means "provider configured
//! as unavailable": the provider registers anyway and declines every
//! rewrite, which the pipeline turns into a clean fallback. The whole struct
//! is read once at startup and never mutated afterwards.

use serde::Deserialize;

/// Per-provider affiliate configuration, supplied by the composition root.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AffiliateConfig {
    /// Amazon associate tag, e.g. `mytag-20`.
    pub amazon: Option<String>,
    /// Mercado Livre source identifier appended as `pdp_source`.
    pub mercadolivre: Option<String>,
    /// Natura consultant identifier set as `consultoria`.
    pub natura: Option<String>,
    /// Magalu promoter identity (profile handle + wrapper campaign id).
    pub magalu: Option<MagaluConfig>,
    /// AliExpress open-platform credentials for the link-generate API.
    pub aliexpress: Option<AliExpressConfig>,
    /// Shopee affiliate open API credentials.
    pub shopee: Option<ShopeeConfig>,
    /// Awin publisher credentials for the link-builder API.
    pub awin: Option<AwinConfig>,
}

/// Magalu has two link shapes: `magazinevoce.com.br/<handle>/...` profile
/// URLs rewritten by path segment, and `magalu.divulgador.link` wrappers
/// carrying the destination URL-encoded in a query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MagaluConfig {
    /// Profile handle used as the first path segment on magazinevoce links.
    pub username: Option<String>,
    /// Campaign/promoter id rewritten inside divulgador.link wrappers.
    pub promoter_id: Option<String>,
}

/// Credentials for the AliExpress affiliate link-generate API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AliExpressConfig {
    pub app_key: String,
    pub app_secret: String,
    pub tracking_id: String,
}

impl AliExpressConfig {
    /// All three credentials are required by the partner API.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.app_key.is_empty() && !self.app_secret.is_empty() && !self.tracking_id.is_empty()
    }
}

/// Credentials for the Shopee affiliate GraphQL API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopeeConfig {
    pub app_id: String,
    pub secret: String,
}

impl ShopeeConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.app_id.is_empty() && !self.secret.is_empty()
    }
}

/// Credentials for the Awin publisher link-builder API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwinConfig {
    pub publisher_id: String,
    pub token: String,
}

impl AwinConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.publisher_id.is_empty() && !self.token.is_empty()
    }
}
