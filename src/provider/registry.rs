use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use url::Url;

use super::{Provider, VmProvider};
use crate::broker::BrokerRegistry;
use crate::utils::error::{JmsError, Result};

pub const DEFAULT_SCHEME: &str = "vm";
pub const DEFAULT_URL: &str = "vm://default";

/// Scheme → provider table.
///
/// Connection factories hold one of these and resolve every URL through it.
/// Schemes are matched case-insensitively.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Arc<dyn Provider>>>,
}

impl ProviderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `vm` provider over a fresh set of brokers.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(VmProvider::new(Arc::new(BrokerRegistry::new()))));
        registry
    }

    /// Registers `provider` under its scheme, replacing any previous one.
    pub fn register(&self, provider: Arc<dyn Provider>) {
        let scheme = provider.scheme().to_ascii_lowercase();
        self.providers.write().insert(scheme, provider);
    }

    pub fn provider(&self, scheme: &str) -> Option<Arc<dyn Provider>> {
        self.providers
            .read()
            .get(&scheme.to_ascii_lowercase())
            .cloned()
    }

    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.providers.read().keys().cloned().collect();
        schemes.sort();
        schemes
    }

    /// Picks the provider for `url` and parses it.
    ///
    /// # Errors
    ///
    /// `InvalidUrl` when the URL has no scheme, names an unregistered one or
    /// does not parse.
    pub fn resolve(&self, url: &str) -> Result<(Arc<dyn Provider>, Url)> {
        let (scheme, _) = url
            .split_once(':')
            .ok_or_else(|| JmsError::InvalidUrl(format!("{url:?} has no scheme")))?;
        let provider = self
            .provider(scheme)
            .ok_or_else(|| JmsError::InvalidUrl(format!("no provider for scheme {scheme:?}")))?;
        let parsed = Url::parse(url).map_err(|e| JmsError::InvalidUrl(format!("{url:?}: {e}")))?;
        Ok((provider, parsed))
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}
