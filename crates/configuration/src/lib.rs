pub mod configuration;
pub mod connection_settings;
pub mod error;
pub mod options;
pub mod values;

pub use configuration::{Configuration, GenerationSettings, QueryLimits, ServerSettings};
pub use connection_settings::DatabaseConnectionSettings;
pub use error::ConfigurationError;
pub use options::ServerOptions;
pub use values::{ConnectionUri, PoolSettings, Secret};
