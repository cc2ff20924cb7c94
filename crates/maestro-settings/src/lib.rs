//! Multi-provider model configuration for Maestro.
//!
//! This crate owns the `.claude/models.json` document that assigns language
//! model backends to agents:
//! - Loading the JSONC document from `{projectRoot}/.claude/models.json`
//! - `$ENV_VAR` indirection for API keys, resolved at call time
//! - Referential validation producing non-fatal warnings
//! - Per-path caching of the parsed document for the process lifetime
//!
//! # Architecture
//!
//! This is an infrastructure crate: it depends on external crates only
//! (serde, serde_json, thiserror, tracing) and is consumed by
//! `maestro-models`, which layers the resolution precedence on top.
//!
//! # Usage
//!
//! ```rust,ignore
//! use maestro_settings::{ModelsConfigCache, resolve_api_key};
//!
//! let cache = ModelsConfigCache::new();
//! if let Some(config) = cache.load(None)? {
//!     // config is Arc-shared and reference-stable until cache.clear()
//! }
//! ```

pub mod cache;
pub mod loader;
pub mod schema;

// Re-export commonly used items
pub use cache::ModelsConfigCache;
pub use loader::{
    agent_model_config, load_models_config_from_file, models_config_path, resolve_api_key,
    resolved_provider_config, validate_config, ConfigError, ResolvedProviderConfig,
};
pub use schema::{AgentModelConfig, ModelTier, ModelsConfig, ProviderConfig, CLAUDE_PROVIDER};
