//! Runtime-mutable endpoint store shared across streaming components.
//!
//! The prober and publisher never cache the receiver URL; they ask this
//! store on every operation, so an operator change takes effect on the very
//! next probe/publish with no retroactive redirection of in-flight requests.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use super::settings::EndpointSettings;

/// Shared handle to the endpoint configuration.
///
/// Cheap to clone; all clones observe the same underlying values. The only
/// validation on mutation is non-empty-string - a malformed URL surfaces as
/// a request failure downstream, not as a store-level error.
#[derive(Debug, Clone)]
pub struct SharedEndpoints {
    inner: Arc<RwLock<EndpointSettings>>,
}

impl SharedEndpoints {
    /// Create a store seeded from the given settings.
    pub fn new(settings: EndpointSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Create a store with the built-in default addresses.
    pub fn with_defaults() -> Self {
        Self::new(EndpointSettings::default())
    }

    /// Current receiver base URL.
    pub fn receiver_url(&self) -> String {
        self.read().receiver_url.clone()
    }

    /// Replace the receiver base URL. Empty strings are ignored.
    pub fn set_receiver_url(&self, url: &str) {
        if url.is_empty() {
            warn!("Ignoring empty receiver URL");
            return;
        }
        self.write().receiver_url = url.to_string();
        info!(url, "Receiver URL updated");
    }

    /// Current backend base URL.
    pub fn backend_url(&self) -> String {
        self.read().backend_url.clone()
    }

    /// Replace the backend base URL. Empty strings are ignored.
    pub fn set_backend_url(&self, url: &str) {
        if url.is_empty() {
            warn!("Ignoring empty backend URL");
            return;
        }
        self.write().backend_url = url.to_string();
        info!(url, "Backend URL updated");
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, EndpointSettings> {
        // A poisoned lock means a writer panicked mid-assignment of a String,
        // which cannot leave the settings in a torn state.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, EndpointSettings> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SharedEndpoints {
    fn default() -> Self {
        Self::with_defaults()
    }
}
