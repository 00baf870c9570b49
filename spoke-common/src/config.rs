//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Environment variable naming the root data folder
pub const ROOT_FOLDER_ENV: &str = "SPOKE_ROOT_FOLDER";

/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "SPOKE_PORT";

/// Default listen port for spoke-ui
pub const DEFAULT_PORT: u16 = 5750;

/// Root folder resolution priority order:
/// 1. Explicit argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(explicit: Option<&str>) -> PathBuf {
    // Priority 1: explicit argument
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Resolve the listen port: environment variable, then compiled default
pub fn resolve_port() -> u16 {
    std::env::var(PORT_ENV)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Database file path under the root folder
pub fn database_path(root_folder: &std::path::Path) -> PathBuf {
    root_folder.join("spoke.db")
}

/// Local-cache file path under the root folder (client-side draft backup)
pub fn cache_path(root_folder: &std::path::Path) -> PathBuf {
    root_folder.join("draft_cache.json")
}

/// Get configuration file path for the platform
fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir()
        .map(|d| d.join("spoke").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if user_config.exists() {
        return Ok(user_config);
    }

    #[cfg(target_os = "linux")]
    {
        let system_config = PathBuf::from("/etc/spoke/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("spoke"))
        .unwrap_or_else(|| PathBuf::from("./spoke_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_argument_wins() {
        let root = resolve_root_folder(Some("/tmp/spoke-test"));
        assert_eq!(root, PathBuf::from("/tmp/spoke-test"));
    }

    #[test]
    fn test_default_root_folder_nonempty() {
        let root = default_root_folder();
        assert!(!root.as_os_str().is_empty());
    }

    #[test]
    fn test_database_and_cache_paths() {
        let root = PathBuf::from("/data/spoke");
        assert_eq!(database_path(&root), PathBuf::from("/data/spoke/spoke.db"));
        assert_eq!(cache_path(&root), PathBuf::from("/data/spoke/draft_cache.json"));
    }
}
