//! Affiliate link resolution and rewriting.
//!
//! Takes the links found in promotional messages (usually shortened,
//! wrapped in affiliate networks, or hiding behind interstitial pages),
//! resolves each to its real storefront destination, and rewrites it to
//! carry the operator's affiliate identity. Some storefronts are rewritten
//! locally by URL surgery (Amazon, Magalu, Natura), others require a signed
//! call to the storefront's partner API (Shopee, AliExpress, Awin).
//!
//! The entry point is [`LinkRewriter`]:
//!
//! ```no_run
//! use afflink::{AffiliateConfig, LinkRewriter};
//!
//! # async fn run() {
//! let rewriter = LinkRewriter::new(AffiliateConfig::from_env());
//! let links = vec!["https://amzn.to/3xYzAbC".to_string()];
//! let rewritten = rewriter.rewrite_links(&links).await;
//! # }
//! ```
//!
//! The batch call never fails: every input link produces exactly one output
//! link, in order, and the worst case for any link is coming back unchanged.

pub mod config;
pub mod error;
pub mod expander;
pub mod pipeline;
pub mod providers;
pub mod signing;
pub mod utils;

pub use config::{
    AffiliateConfig, AliExpressConfig, AwinConfig, MagaluConfig, ShopeeConfig,
};
pub use error::{RewriteError, RewriteResult};
pub use expander::UrlExpander;
pub use pipeline::LinkRewriter;
pub use providers::{AffiliateProvider, ProviderRegistry};
