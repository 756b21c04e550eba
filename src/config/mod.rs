//! Configuration module.
//!
//! `AffiliateConfig` can be built directly by the caller or loaded from the
//! environment with [`AffiliateConfig::from_env`].

pub mod types;

pub use types::{AffiliateConfig, AliExpressConfig, AwinConfig, MagaluConfig, ShopeeConfig};

impl AffiliateConfig {
    /// Load the affiliate configuration from environment variables.
    ///
    /// Missing or empty variables leave the corresponding provider
    /// unconfigured; that is not an error.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            amazon: env_opt("AMAZON_AFFILIATE_TAG"),
            mercadolivre: env_opt("MERCADOLIVRE_AFFILIATE_ID"),
            natura: env_opt("NATURA_AFFILIATE_ID"),
            magalu: Some(MagaluConfig {
                username: env_opt("MAGALU_AFFILIATE_ID"),
                promoter_id: env_opt("MAGALU_PROMOTER_ID"),
            }),
            aliexpress: Some(AliExpressConfig {
                app_key: env_or_empty("ALIEXPRESS_APP_KEY"),
                app_secret: env_or_empty("ALIEXPRESS_APP_SECRET"),
                tracking_id: env_or_empty("ALIEXPRESS_TRACKING_ID"),
            }),
            shopee: Some(ShopeeConfig {
                app_id: env_or_empty("SHOPEE_APP_ID"),
                secret: env_or_empty("SHOPEE_SECRET"),
            }),
            awin: Some(AwinConfig {
                publisher_id: env_or_empty("AWIN_PUBLISHER_ID"),
                token: env_or_empty("AWIN_TOKEN"),
            }),
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn env_or_empty(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}
