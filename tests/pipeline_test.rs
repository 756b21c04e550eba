//! End-to-end pipeline contract tests: same length and order, never raises,
//! fallback stripping, provider dispatch.

mod common;

use afflink::providers::{MercadoLivreProvider, ShopeeProvider};
use afflink::{AffiliateProvider, LinkRewriter, ProviderRegistry, UrlExpander};
use async_trait::async_trait;
use mockito::Server;
use reqwest::Client;

/// Provider stub that claims URLs containing a marker and rewrites them to
/// a fixed link.
struct MarkerProvider {
    name: &'static str,
    marker: &'static str,
    output: Option<&'static str>,
}

#[async_trait]
impl AffiliateProvider for MarkerProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains(self.marker)
    }

    async fn rewrite(&self, _url: &str) -> Option<String> {
        self.output.map(str::to_string)
    }
}

fn pipeline_with(providers: Vec<Box<dyn AffiliateProvider>>, shorteners: Vec<String>) -> LinkRewriter {
    let mut registry = ProviderRegistry::new();
    for provider in providers {
        registry.register(provider);
    }
    LinkRewriter::from_parts(
        registry,
        UrlExpander::with_domain_lists(vec![], vec![], vec![]),
        shorteners,
    )
}

#[tokio::test]
async fn empty_batch_yields_empty_batch() {
    let rewriter = pipeline_with(vec![], vec![]);
    assert!(rewriter.rewrite_links(&[]).await.is_empty());
}

#[tokio::test]
async fn output_preserves_length_and_order_even_for_garbage() {
    common::init_logging();
    let rewriter = pipeline_with(vec![], vec![]);

    let links = vec![
        String::new(),
        "not a url".to_string(),
        "https://example.com/p/1?utm_source=tg#frag".to_string(),
    ];
    let rewritten = rewriter.rewrite_links(&links).await;

    assert_eq!(
        rewritten,
        vec![
            String::new(),
            "not a url".to_string(),
            // Parseable but unhandled links come back cleaned.
            "https://example.com/p/1".to_string(),
        ]
    );
}

#[tokio::test]
async fn shortened_link_is_expanded_then_rewritten() {
    common::init_logging();
    let mut server = Server::new_async().await;

    let _short = server
        .mock("GET", "/s/abc")
        .with_status(302)
        .with_header("Location", "/produto/42")
        .create_async()
        .await;
    let _dest = server
        .mock("GET", "/produto/42")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let rewriter = pipeline_with(
        vec![Box::new(MarkerProvider {
            name: "store",
            marker: "/produto/",
            output: Some("https://store.example/produto/42?tag=minhaloja-20"),
        })],
        vec!["127.0.0.1".to_string()],
    );

    let links = vec![format!("{}/s/abc", server.url())];
    let rewritten = rewriter.rewrite_links(&links).await;
    assert_eq!(
        rewritten,
        vec!["https://store.example/produto/42?tag=minhaloja-20".to_string()]
    );
}

#[tokio::test]
async fn declined_rewrite_falls_back_to_cleaned_destination() {
    common::init_logging();

    // Real provider, real decline path: social showcase links are never
    // products, so the pipeline keeps a cleaned, untagged URL.
    let rewriter = pipeline_with(
        vec![Box::new(MercadoLivreProvider::new(
            Some("minhaloja".to_string()),
            Client::new(),
        ))],
        vec![],
    );

    let links = vec!["https://www.mercadolivre.com.br/social/lista?forceInApp=true".to_string()];
    assert_eq!(
        rewriter.rewrite_links(&links).await,
        vec!["https://www.mercadolivre.com.br/social/lista".to_string()]
    );
}

#[tokio::test]
async fn unconfigured_remote_provider_falls_back_to_cleaned_url() {
    common::init_logging();

    let rewriter = pipeline_with(
        vec![Box::new(ShopeeProvider::new(None, Client::new()))],
        vec![],
    );

    let links = vec!["https://shopee.com.br/product/123/456?utm_campaign=promo".to_string()];
    assert_eq!(
        rewriter.rewrite_links(&links).await,
        vec!["https://shopee.com.br/product/123/456".to_string()]
    );
}

#[tokio::test]
async fn first_registered_provider_wins_on_overlap() {
    let rewriter = pipeline_with(
        vec![
            Box::new(MarkerProvider {
                name: "first",
                marker: "store.example",
                output: Some("https://store.example/from-first"),
            }),
            Box::new(MarkerProvider {
                name: "second",
                marker: "store.example",
                output: Some("https://store.example/from-second"),
            }),
        ],
        vec![],
    );

    let links = vec!["https://store.example/p/1".to_string()];
    assert_eq!(
        rewriter.rewrite_links(&links).await,
        vec!["https://store.example/from-first".to_string()]
    );
}

#[tokio::test]
async fn unreachable_shortener_keeps_original_input() {
    common::init_logging();
    let rewriter = pipeline_with(vec![], vec!["127.0.0.1".to_string()]);

    let dead = "http://127.0.0.1:1/s/abc".to_string();
    // Expansion fails, no provider handles it, and the cleaned fallback is
    // the URL without query or fragment (there are none here).
    assert_eq!(
        rewriter.rewrite_links(&[dead.clone()]).await,
        vec![dead]
    );
}
