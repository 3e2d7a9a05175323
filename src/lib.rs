pub mod config;
pub mod http;
pub mod provider;

pub use config::{ClientConfig, ConfigSource};
pub use http::{ClientError, SharedClient};
pub use provider::{get_instance, ClientProvider};
