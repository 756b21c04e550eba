//! Ordered provider registry.

use super::AffiliateProvider;

/// Ordered collection of providers; registration order is lookup priority.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Box<dyn AffiliateProvider>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to the end of the sequence.
    ///
    /// Registration order is an intentional priority policy: when two
    /// providers' `can_handle` predicates overlap (e.g. a storefront and a
    /// network provider), the earlier registration wins. Re-registration is
    /// not deduplicated; callers register each provider exactly once.
    pub fn register(&mut self, provider: Box<dyn AffiliateProvider>) {
        log::debug!("registered affiliate provider: {}", provider.name());
        self.providers.push(provider);
    }

    /// First provider in registration order that can handle `url`.
    #[must_use]
    pub fn find_provider(&self, url: &str) -> Option<&dyn AffiliateProvider> {
        self.providers
            .iter()
            .find(|provider| provider.can_handle(url))
            .map(Box::as_ref)
    }

    /// Names of all registered providers, in priority order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedProvider {
        name: &'static str,
        needle: &'static str,
    }

    #[async_trait]
    impl AffiliateProvider for FixedProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn can_handle(&self, url: &str) -> bool {
            url.contains(self.needle)
        }

        async fn rewrite(&self, _url: &str) -> Option<String> {
            Some(format!("rewritten-by-{}", self.name))
        }
    }

    #[tokio::test]
    async fn first_registered_provider_wins_on_overlap() {
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(FixedProvider {
            name: "first",
            needle: "example.com",
        }));
        registry.register(Box::new(FixedProvider {
            name: "second",
            needle: "example",
        }));

        let provider = registry
            .find_provider("https://example.com/p")
            .expect("provider should match");
        assert_eq!(provider.name(), "first");
        assert_eq!(
            provider.rewrite("https://example.com/p").await.as_deref(),
            Some("rewritten-by-first")
        );
    }

    #[test]
    fn no_match_yields_none() {
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(FixedProvider {
            name: "only",
            needle: "shop",
        }));
        assert!(registry.find_provider("https://other.example/x").is_none());
        assert_eq!(registry.len(), 1);
    }
}
