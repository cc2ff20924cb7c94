//! Schema definitions for `.claude/models.json`.
//!
//! All document structs use `#[serde(default)]` so partial configuration
//! files load; missing sections are treated as empty. Field names follow the
//! document's camelCase spelling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The sentinel provider name for the native Claude execution path.
pub const CLAUDE_PROVIDER: &str = "claude";

/// Native Claude model tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Haiku,
    #[default]
    Sonnet,
    Opus,
}

impl ModelTier {
    /// All recognized tiers, in ascending capability order.
    pub const ALL: [ModelTier; 3] = [ModelTier::Haiku, ModelTier::Sonnet, ModelTier::Opus];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Haiku => "haiku",
            ModelTier::Sonnet => "sonnet",
            ModelTier::Opus => "opus",
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "haiku" => Ok(ModelTier::Haiku),
            "sonnet" => Ok(ModelTier::Sonnet),
            "opus" => Ok(ModelTier::Opus),
            _ => Err(format!("Invalid model tier: {}", s)),
        }
    }
}

/// Connection details for an external model provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// Base URL for the provider API. Empty means "missing" and draws a
    /// validation warning; the document still loads.
    pub base_url: String,

    /// API key, either a raw value or a `$ENV_VAR` reference. Stored
    /// unresolved; the environment is read when the provider is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model IDs this provider accepts. Empty = unrestricted.
    pub models: Vec<String>,
}

/// Per-agent model assignment.
///
/// `model` holds a tier name when `provider` is `"claude"` and a
/// provider-specific model ID otherwise. Tier-valued fields stay `String`
/// on the wire: an unrecognized tier degrades at resolution time instead of
/// failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentModelConfig {
    /// Provider key from the providers map, or `"claude"` for native Claude.
    pub provider: String,

    /// Model ID (external providers) or tier name (claude provider).
    pub model: String,

    /// Role hint passed through to the MCP delegation tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Tier to fall back to when the external provider is unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

/// Root configuration document from `.claude/models.json`.
///
/// Maps are `BTreeMap` so validation output is deterministically ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelsConfig {
    /// Provider definitions with connection details.
    pub providers: BTreeMap<String, ProviderConfig>,

    /// Per-agent model assignments.
    pub agents: BTreeMap<String, AgentModelConfig>,

    /// Fallback assignment for agents not listed in `agents`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<AgentModelConfig>,
}
