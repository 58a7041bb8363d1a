//! Infrastructure layer: extraction engine, upstream client, configuration and logging

pub mod config;
pub mod error;
pub mod http_client;
pub mod koreansool_client;
pub mod logging;
pub mod parsing;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, LoggingConfig, PaginationConfig, UpstreamConfig};
pub use error::{KoreansoolError, KoreansoolResult};
pub use http_client::{HttpClient, HttpClientConfig};
pub use koreansool_client::{KoreansoolClient, RecipeRequest, UpstreamSource};
pub use logging::{init_logging, init_logging_with_config};
pub use parsing::{BookListParser, ParsingConfig, RecipeParseContext, RecipeTableParser, ReferenceListParser};
