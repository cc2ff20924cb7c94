//! The resolution pipeline: agent name in, resolved backend out.
//!
//! Precedence, strictly in order:
//! 1. `.claude/models.json` agent-specific entry
//! 2. `.claude/models.json` `defaults`
//! 3. The caller's static tier
//! 4. `sonnet`
//!
//! An assignment that cannot be honored as written (unknown provider,
//! unrecognized tier) is not an error: it degrades to the next level. The
//! composed [`ModelRouter::resolve_with_fallback`] is total — worst case it
//! lands on native sonnet.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use maestro_settings::{
    agent_model_config, resolved_provider_config, AgentModelConfig, ModelTier, ModelsConfig,
    ModelsConfigCache, CLAUDE_PROVIDER,
};

/// A fully-resolved backend, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ResolvedModel {
    /// Native Claude execution at the given tier.
    Claude { tier: ModelTier },

    /// An external provider reached through an MCP delegation tool.
    External {
        provider: String,
        model: String,
        /// Role hint for the delegation tool, passed through verbatim.
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<String>,
        base_url: String,
        /// Secret resolved at resolution time; `None` when the configured
        /// `$ENV_VAR` was unset or no key was configured.
        #[serde(skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        /// Tier to use when this backend turns out to be unavailable.
        fallback_tier: ModelTier,
    },
}

/// Resolves agents to backends using an owned, injected config cache.
pub struct ModelRouter {
    cache: ModelsConfigCache,
}

impl ModelRouter {
    pub fn new() -> Self {
        Self {
            cache: ModelsConfigCache::new(),
        }
    }

    /// The underlying config cache, for explicit invalidation.
    pub fn cache(&self) -> &ModelsConfigCache {
        &self.cache
    }

    /// Resolution never fails: a config that cannot be loaded at resolution
    /// time is treated as absent. Callers that need the hard error load
    /// through the cache directly.
    fn load_config(&self, project_root: Option<&Path>) -> Option<Arc<ModelsConfig>> {
        match self.cache.load(project_root) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("models config unusable, resolving without it: {}", err);
                None
            }
        }
    }

    /// Resolve the backend for an agent.
    ///
    /// `static_tier` is the agent's legacy static assignment, computed
    /// elsewhere; it sits between the document and the sonnet last resort in
    /// the precedence chain.
    pub fn resolve_agent(
        &self,
        agent_name: &str,
        static_tier: Option<ModelTier>,
        project_root: Option<&Path>,
    ) -> ResolvedModel {
        let Some(config) = self.load_config(project_root) else {
            return ResolvedModel::Claude {
                tier: static_tier.unwrap_or_default(),
            };
        };

        let Some(agent) = agent_model_config(&config, agent_name) else {
            return ResolvedModel::Claude {
                tier: static_tier.unwrap_or_default(),
            };
        };

        resolve_from_assignment(&config, agent, static_tier)
    }

    /// Resolve, then substitute the fallback tier if the result is an
    /// external backend that is not currently usable. Total.
    pub fn resolve_with_fallback(
        &self,
        agent_name: &str,
        static_tier: Option<ModelTier>,
        project_root: Option<&Path>,
    ) -> ResolvedModel {
        let resolved = self.resolve_agent(agent_name, static_tier, project_root);

        if matches!(resolved, ResolvedModel::External { .. }) && !is_provider_available(&resolved) {
            return fallback_model(&resolved);
        }

        resolved
    }
}

impl Default for ModelRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_from_assignment(
    config: &ModelsConfig,
    agent: &AgentModelConfig,
    static_tier: Option<ModelTier>,
) -> ResolvedModel {
    // Native provider: the assignment's model names a tier. An unrecognized
    // tier silently degrades to the static tier, then sonnet.
    if agent.provider == CLAUDE_PROVIDER {
        let tier = ModelTier::from_str(&agent.model)
            .ok()
            .or(static_tier)
            .unwrap_or_default();
        return ResolvedModel::Claude { tier };
    }

    let fallback_tier = agent
        .fallback
        .as_deref()
        .and_then(|f| ModelTier::from_str(f).ok())
        .or(static_tier)
        .unwrap_or_default();

    match resolved_provider_config(config, &agent.provider) {
        // Assignment names a provider the document never declares: degrade
        // exactly as if nothing were configured for this agent.
        None => ResolvedModel::Claude {
            tier: fallback_tier,
        },
        Some(provider) => ResolvedModel::External {
            provider: agent.provider.clone(),
            model: agent.model.clone(),
            role: agent.role.clone(),
            base_url: provider.base_url,
            api_key: provider.api_key,
            fallback_tier,
        },
    }
}

/// Whether a resolved backend is currently usable.
///
/// Native backends always are. External backends on a loopback host
/// (`localhost` / `127.0.0.1`) need no credential; anything else needs a
/// resolved secret.
pub fn is_provider_available(resolved: &ResolvedModel) -> bool {
    match resolved {
        ResolvedModel::Claude { .. } => true,
        ResolvedModel::External {
            base_url, api_key, ..
        } => {
            if base_url.contains("localhost") || base_url.contains("127.0.0.1") {
                return true;
            }
            api_key.is_some()
        }
    }
}

/// The native substitute for a backend that proved unavailable. Identity-
/// equivalent for an already-native resolution.
pub fn fallback_model(resolved: &ResolvedModel) -> ResolvedModel {
    match resolved {
        ResolvedModel::Claude { tier } => ResolvedModel::Claude { tier: *tier },
        ResolvedModel::External { fallback_tier, .. } => ResolvedModel::Claude {
            tier: *fallback_tier,
        },
    }
}
