//! Provider → MCP delegation tool mapping.
//!
//! External providers are reached through named MCP tools. The mapping is
//! static; providers without an entry (e.g. ollama) have no dedicated tool
//! and are driven through their base URL by the caller.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static PROVIDER_MCP_TOOLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("openai", "codex"),
        ("codex", "codex"),
        ("gemini", "gemini"),
        ("google", "gemini"),
    ])
});

/// Which MCP tool delegates to the given external provider, if any.
/// Lookup is case-insensitive.
pub fn mcp_tool_for_provider(provider: &str) -> Option<&'static str> {
    PROVIDER_MCP_TOOLS
        .get(provider.to_lowercase().as_str())
        .copied()
}
