//! Chat-completion provider implementations for sandeval.
//!
//! All providers implement the `sandeval_core::Provider` trait.
//! [`build_from_config`] picks the right one from the loaded configuration.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use sandeval_config::{ProviderConfig, ProviderKind};
use sandeval_core::Provider;
use sandeval_core::error::ProviderError;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured provider.
///
/// Fails with [`ProviderError::NotConfigured`] when the endpoint or key is missing.
pub fn build_from_config(config: &ProviderConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| ProviderError::NotConfigured("no API key set".into()))?;
    let timeout = Duration::from_secs(config.timeout_secs);

    let provider = match config.kind {
        ProviderKind::Azure => {
            let endpoint = config.api_url.clone().ok_or_else(|| {
                ProviderError::NotConfigured("Azure provider requires an endpoint URL".into())
            })?;
            OpenAiCompatProvider::azure(endpoint, api_key, config.api_version.clone(), timeout)?
        }
        ProviderKind::OpenAi => match &config.api_url {
            Some(url) => OpenAiCompatProvider::new("openai", url.clone(), api_key, timeout)?,
            None => OpenAiCompatProvider::openai(api_key, timeout)?,
        },
    };

    tracing::debug!(provider = provider.name(), "Provider ready");
    Ok(Arc::new(provider))
}
