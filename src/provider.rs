use std::sync::{Arc, LazyLock};

use crate::config::{ClientConfig, ConfigSource};
use crate::http::{ClientError, SharedClient};

static PROCESS_PROVIDER: LazyLock<ClientProvider> = LazyLock::new(|| {
    ClientProvider::new(&ClientConfig::load()).expect("failed to build shared HTTP client")
});

/// Force construction of the process-wide client.
///
/// Call once at startup so configuration is read before any request is
/// issued. Later calls are no-ops.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built, e.g. when the TLS backend
/// fails to initialise.
pub fn init() -> &'static SharedClient {
    LazyLock::force(&PROCESS_PROVIDER).client.as_ref()
}

/// The process-wide client. Every call returns the same instance.
///
/// # Panics
///
/// Panics on first access if the HTTP client cannot be built and [`init`]
/// has not already done so. Use [`ClientProvider::new`] to handle the
/// build error instead.
pub fn get_instance() -> &'static SharedClient {
    PROCESS_PROVIDER.client.as_ref()
}

/// Owns one [`SharedClient`] and hands out that same instance.
#[derive(Debug, Clone)]
pub struct ClientProvider {
    client: Arc<SharedClient>,
}

impl ClientProvider {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        match config.source {
            ConfigSource::Unset => {
                log::warn!("no base URL configured; requests will fail until one is set")
            }
            _ if config.base_url.trim().is_empty() => {
                log::warn!("configured base URL is empty; requests will fail")
            }
            source => log::debug!("using base URL {:?} from {source:?}", config.base_url),
        }

        let client = SharedClient::new(config.base_url.clone())?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: SharedClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn get_instance(&self) -> Arc<SharedClient> {
        Arc::clone(&self.client)
    }
}
