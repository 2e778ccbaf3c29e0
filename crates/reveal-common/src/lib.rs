//! # reveal-common
//!
//! Shared utilities: configuration, the application error taxonomy, the
//! dual-variant token codec, and telemetry setup.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{TokenClaims, TokenService, TOKEN_TTL_SECONDS};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, Environment, JwtConfig, RedisConfig,
    ServerConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
