//! Model resolution for Maestro agents.
//!
//! Given an agent name, decide which backend runs it: a native Claude tier,
//! or an external provider reached through an MCP delegation tool. Resolution
//! applies a strict precedence chain (agent entry → document defaults →
//! caller-supplied static tier → sonnet), checks whether an external backend
//! is currently usable, and substitutes its fallback tier when it is not.
//!
//! # Usage
//!
//! ```rust,ignore
//! use maestro_models::{ModelRouter, ResolvedModel};
//!
//! let router = ModelRouter::new();
//! match router.resolve_with_fallback("architect", None, None) {
//!     ResolvedModel::Claude { tier } => { /* native Task path */ }
//!     ResolvedModel::External { provider, .. } => {
//!         // delegate via mcp_tool_for_provider(&provider)
//!     }
//! }
//! ```
//!
//! This crate decides; it never executes. Dispatching to the native path or
//! invoking the delegation tool is the caller's job.

pub mod delegation;
pub mod resolver;

// Re-export commonly used items
pub use delegation::mcp_tool_for_provider;
pub use resolver::{fallback_model, is_provider_available, ModelRouter, ResolvedModel};
