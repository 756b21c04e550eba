//! Shared domain tables and request constants for afflink
//!
//! This module contains the domain knowledge the pipeline dispatches on:
//! which domains are shorteners, which are affiliate-network wrappers, and
//! which storefronts a resolved link is allowed to land on.

/// Shortener domains known to redirect (or render an interstitial page)
/// instead of hosting content directly.
///
/// Matching is case-insensitive substring matching on the whole URL, so
/// entries like `mercadolivre.com/sec` match a path prefix as well as a
/// hostname.
pub const SHORTENER_DOMAINS: &[&str] = &[
    "amzn.to",
    "amzn.divulgador.link",
    "s.shopee.com.br",
    "mercadolivre.com/sec",
    "s.click.aliexpress.com",
    "tidd.ly",
    "tiddly.xyz",
    "magalu.divulgador.link",
    "natura.divulgador.link",
    "tecno.click",
    "curt.link",
];

/// Intermediate affiliate-network domains that sit between a shortener and
/// the final merchant URL. When a redirect chain ends on one of these, the
/// expander performs one more resolution step.
pub const AFFILIATE_NETWORK_DOMAINS: &[&str] = &[
    "awin1.com",
    "awin.com",
    "go2cloud.org",
    "redirect.viglink.com",
];

/// Shorteners that render a click-through page instead of issuing an HTTP
/// redirect. Only these get the HTML extraction fallback.
pub const INTERSTITIAL_DOMAINS: &[&str] = &["tecno.click", "tidd.ly"];

/// Storefront hostnames a link extracted from an interstitial page is
/// allowed to point at. Anything else is rejected as a non-product link.
pub const STOREFRONT_DOMAINS: &[&str] = &[
    "amazon.com.br",
    "shopee.com.br",
    "mercadolivre.com.br",
    "aliexpress.com",
    "magazineluiza.com.br",
    "natura.com.br",
];

/// Path fragments that identify authentication/login pages. A resolved URL
/// containing one of these is never a valid destination.
pub const AUTH_PATH_FRAGMENTS: &[&str] = &["/ap/signin", "/login", "/auth"];

/// Visible anchor text that marks the click-through link on interstitial
/// pages. The partner pages are Brazilian Portuguese; a redesign of those
/// pages only requires touching this table.
pub const CLICK_THROUGH_PHRASES: &[&str] = &["clique aqui"];

/// Chrome user agent sent with every expansion request to avoid naive
/// bot-blocking on shortener and storefront hosts.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Accept header mimicking a browser navigation request.
pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

/// Accept-Language for the Brazilian storefronts this pipeline targets.
pub const BROWSER_ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7";
