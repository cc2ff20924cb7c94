//! Process-lifetime caching of the parsed models config.

use std::path::Path;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::loader::{load_models_config_from_file, models_config_path, validate_config, ConfigError};
use crate::schema::ModelsConfig;

struct CacheEntry {
    path: PathBuf,
    /// `None` = the file was absent. Caching this state is deliberate: it is
    /// distinct from "not yet attempted".
    config: Option<Arc<ModelsConfig>>,
}

/// Memoizes one parsed and validated document per resolved config path.
///
/// The whole check-miss-parse-store sequence runs under one lock, so a
/// multi-threaded host cannot tear a read or duplicate a load. Entries live
/// until [`clear`](Self::clear) or until a load for a different path replaces
/// them. Repeated loads of the same root hand back the same `Arc`.
pub struct ModelsConfigCache {
    state: Mutex<Option<CacheEntry>>,
}

impl ModelsConfigCache {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    /// Load the models config for the given project root, using the cached
    /// document when the resolved path matches the previous load.
    ///
    /// `Ok(None)` means no config file exists. Validation warnings are logged
    /// once per fresh load. A parse error propagates and leaves the cache
    /// untouched — no partial document is ever cached.
    pub fn load(&self, project_root: Option<&Path>) -> Result<Option<Arc<ModelsConfig>>, ConfigError> {
        let path = models_config_path(project_root);

        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(entry) = state.as_ref() {
            if entry.path == path {
                return Ok(entry.config.clone());
            }
        }

        let config = load_models_config_from_file(project_root)?;
        if let Some(config) = &config {
            for warning in validate_config(config) {
                tracing::warn!(path = %path.display(), "{}", warning);
            }
        } else {
            tracing::debug!(path = %path.display(), "no models config found");
        }

        let config = config.map(Arc::new);
        *state = Some(CacheEntry {
            path,
            config: config.clone(),
        });
        Ok(config)
    }

    /// Drop the cached document unconditionally. The next load re-reads and
    /// re-validates from disk.
    pub fn clear(&self) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state = None;
    }
}

impl Default for ModelsConfigCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) {
        let claude_dir = dir.path().join(".claude");
        fs::create_dir_all(&claude_dir).unwrap();
        fs::write(claude_dir.join("models.json"), contents).unwrap();
    }

    #[test]
    fn test_load_is_reference_stable() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"{"agents": {"coder": {"provider": "claude", "model": "opus"}}}"#,
        );

        let cache = ModelsConfigCache::new();
        let first = cache.load(Some(dir.path())).unwrap().unwrap();
        let second = cache.load(Some(dir.path())).unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_clear_forces_reload() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"{"agents": {"coder": {"provider": "claude", "model": "opus"}}}"#,
        );

        let cache = ModelsConfigCache::new();
        cache.load(Some(dir.path())).unwrap().unwrap();

        write_config(
            &dir,
            r#"{"agents": {"coder": {"provider": "claude", "model": "haiku"}}}"#,
        );

        // Still the stale document until an explicit clear.
        let cached = cache.load(Some(dir.path())).unwrap().unwrap();
        assert_eq!(cached.agents["coder"].model, "opus");

        cache.clear();
        let fresh = cache.load(Some(dir.path())).unwrap().unwrap();
        assert_eq!(fresh.agents["coder"].model, "haiku");
    }

    #[test]
    fn test_absence_is_cached() {
        let dir = TempDir::new().unwrap();
        let cache = ModelsConfigCache::new();

        assert!(cache.load(Some(dir.path())).unwrap().is_none());

        // The file appearing later is not seen until the cache is cleared.
        write_config(&dir, r#"{}"#);
        assert!(cache.load(Some(dir.path())).unwrap().is_none());

        cache.clear();
        assert!(cache.load(Some(dir.path())).unwrap().is_some());
    }

    #[test]
    fn test_equivalent_roots_share_entry() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        write_config(&dir, r#"{}"#);

        let cache = ModelsConfigCache::new();
        let direct = cache.load(Some(dir.path())).unwrap().unwrap();
        let roundabout = cache
            .load(Some(&dir.path().join("sub").join("..")))
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(&direct, &roundabout));
    }

    #[test]
    fn test_different_root_replaces_entry() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        write_config(
            &dir_a,
            r#"{"agents": {"x": {"provider": "claude", "model": "opus"}}}"#,
        );
        write_config(
            &dir_b,
            r#"{"agents": {"x": {"provider": "claude", "model": "haiku"}}}"#,
        );

        let cache = ModelsConfigCache::new();
        assert_eq!(
            cache.load(Some(dir_a.path())).unwrap().unwrap().agents["x"].model,
            "opus"
        );
        assert_eq!(
            cache.load(Some(dir_b.path())).unwrap().unwrap().agents["x"].model,
            "haiku"
        );
        // Back to the first root: the single-entry cache reloads it.
        assert_eq!(
            cache.load(Some(dir_a.path())).unwrap().unwrap().agents["x"].model,
            "opus"
        );
    }

    #[test]
    fn test_parse_error_propagates_and_is_not_cached() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "{ broken");

        let cache = ModelsConfigCache::new();
        assert!(cache.load(Some(dir.path())).is_err());

        // Fixing the file is enough; the failed attempt cached nothing.
        write_config(&dir, r#"{}"#);
        assert!(cache.load(Some(dir.path())).unwrap().is_some());
    }
}
