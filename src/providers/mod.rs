//! Storefront-specific affiliate providers.
//!
//! Each provider is a capability with two operations:
//! - `can_handle`: pure, case-insensitive hostname/substring predicate;
//! - `rewrite`: produce the operator-tagged URL, or `None` when the provider
//!   is unconfigured or anything fails internally. `rewrite` never panics
//!   and never surfaces an error.
//!
//! Providers own their configuration slice, injected once at construction
//! by the composition root ([`crate::pipeline::LinkRewriter::new`]).

pub mod aliexpress;
pub mod amazon;
pub mod awin;
pub mod magalu;
pub mod mercadolivre;
pub mod natura;
pub mod registry;
pub mod shopee;

use async_trait::async_trait;

pub use aliexpress::AliExpressProvider;
pub use amazon::AmazonProvider;
pub use awin::AwinProvider;
pub use magalu::MagaluProvider;
pub use mercadolivre::MercadoLivreProvider;
pub use natura::NaturaProvider;
pub use registry::ProviderRegistry;
pub use shopee::ShopeeProvider;

/// A storefront-specific capability that detects applicability and rewrites
/// a URL for affiliate tracking.
#[async_trait]
pub trait AffiliateProvider: Send + Sync {
    /// Stable provider name, used for logging and diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this provider owns the given URL. Pure and synchronous.
    fn can_handle(&self, url: &str) -> bool;

    /// Rewrite the URL with the operator's affiliate identity.
    ///
    /// May call a partner API. Returns `None` when the provider is not
    /// configured, the URL cannot be processed, or the partner call fails;
    /// the pipeline falls back to the pre-rewrite URL.
    async fn rewrite(&self, url: &str) -> Option<String>;
}
