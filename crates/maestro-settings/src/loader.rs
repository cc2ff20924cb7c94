//! Loading and validation of `.claude/models.json`.
//!
//! The document is JSONC: `//` and `/* */` comments are stripped before
//! parsing. API keys may reference environment variables with `$VAR` syntax
//! and are resolved when a provider is used, not when the file is loaded.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::schema::{AgentModelConfig, ModelTier, ModelsConfig, CLAUDE_PROVIDER};

/// Errors that make a load attempt fail outright.
///
/// A missing file is not an error; see [`load_models_config_from_file`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Compute the path to `.claude/models.json` under the given project root.
///
/// Defaults to the current working directory. The root is canonicalized when
/// possible so different spellings of the same directory yield the same path
/// (the config cache keys on this).
pub fn models_config_path(project_root: Option<&Path>) -> PathBuf {
    let root = match project_root {
        Some(root) => root.to_path_buf(),
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let root = fs::canonicalize(&root).unwrap_or(root);
    root.join(".claude").join("models.json")
}

/// Resolve an API key value.
///
/// A value starting with `$` names an environment variable; resolution reads
/// it now and yields `None` when unset or empty. Any other value passes
/// through verbatim. `None` in, `None` out.
pub fn resolve_api_key(value: Option<&str>) -> Option<String> {
    let value = value?;
    if let Some(var) = value.strip_prefix('$') {
        return env::var(var).ok().filter(|v| !v.is_empty());
    }
    Some(value.to_string())
}

/// Strip `//` line comments and `/* */` block comments from JSONC input.
///
/// String-literal aware: `"http://localhost:11434"` survives intact.
/// Newlines inside block comments are kept so parser error positions stay
/// meaningful.
fn strip_json_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' => match chars.peek() {
                Some('/') => {
                    while let Some(&next) = chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        chars.next();
                    }
                }
                Some('*') => {
                    chars.next();
                    let mut prev = '\0';
                    for next in chars.by_ref() {
                        if prev == '*' && next == '/' {
                            break;
                        }
                        if next == '\n' {
                            out.push('\n');
                        }
                        prev = next;
                    }
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }

    out
}

/// Load and parse `.claude/models.json` under the given project root.
///
/// Returns `Ok(None)` when the file does not exist — callers treat this as
/// "use static defaults", not as an error. Read and parse failures are fatal
/// to the load call.
pub fn load_models_config_from_file(
    project_root: Option<&Path>,
) -> Result<Option<ModelsConfig>, ConfigError> {
    let path = models_config_path(project_root);

    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let stripped = strip_json_comments(&contents);
    let config = serde_json::from_str(&stripped).map_err(|source| ConfigError::Parse {
        path,
        source,
    })?;

    Ok(Some(config))
}

fn valid_tiers() -> String {
    ModelTier::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a loaded models config.
///
/// Pure and total: every check runs, nothing short-circuits, and the result
/// is an ordered list of warning messages (empty = no issues). Warnings are
/// advisory — the document still loads and resolves, degrading per the
/// resolver's precedence rules.
pub fn validate_config(config: &ModelsConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    for (agent_name, agent) in &config.agents {
        if agent.provider != CLAUDE_PROVIDER && !config.providers.contains_key(&agent.provider) {
            warnings.push(format!(
                "Agent \"{}\" references unknown provider \"{}\"",
                agent_name, agent.provider
            ));
        }

        if agent.provider == CLAUDE_PROVIDER && ModelTier::from_str(&agent.model).is_err() {
            warnings.push(format!(
                "Agent \"{}\" uses claude provider but model \"{}\" is not a valid tier ({})",
                agent_name,
                agent.model,
                valid_tiers()
            ));
        }

        if agent.provider != CLAUDE_PROVIDER {
            if let Some(provider) = config.providers.get(&agent.provider) {
                if !provider.models.is_empty() && !provider.models.contains(&agent.model) {
                    warnings.push(format!(
                        "Agent \"{}\" uses model \"{}\" not listed in provider \"{}\" models",
                        agent_name, agent.model, agent.provider
                    ));
                }
            }
        }

        if let Some(fallback) = agent.fallback.as_deref() {
            if !fallback.is_empty() && ModelTier::from_str(fallback).is_err() {
                warnings.push(format!(
                    "Agent \"{}\" has invalid fallback tier \"{}\"",
                    agent_name, fallback
                ));
            }
        }
    }

    if let Some(defaults) = &config.defaults {
        if defaults.provider != CLAUDE_PROVIDER
            && !config.providers.contains_key(&defaults.provider)
        {
            warnings.push(format!(
                "Default config references unknown provider \"{}\"",
                defaults.provider
            ));
        }
    }

    for (name, provider) in &config.providers {
        if provider.base_url.is_empty() {
            warnings.push(format!("Provider \"{}\" is missing baseUrl", name));
        }
    }

    warnings
}

/// Get the assignment for a specific agent: the agent's own entry, else the
/// document's `defaults`, else `None`.
pub fn agent_model_config<'a>(
    config: &'a ModelsConfig,
    agent_name: &str,
) -> Option<&'a AgentModelConfig> {
    config.agents.get(agent_name).or(config.defaults.as_ref())
}

/// Provider connection details with the API key pushed through
/// [`resolve_api_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub models: Vec<String>,
}

/// Look up a provider and resolve its API key.
///
/// The environment is read on every call — the cache stores raw, unresolved
/// key strings, so live environment changes take effect without a reload.
pub fn resolved_provider_config(
    config: &ModelsConfig,
    provider_name: &str,
) -> Option<ResolvedProviderConfig> {
    let provider = config.providers.get(provider_name)?;
    Some(ResolvedProviderConfig {
        base_url: provider.base_url.clone(),
        api_key: resolve_api_key(provider.api_key.as_deref()),
        models: provider.models.clone(),
    })
}
