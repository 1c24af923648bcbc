//! Path resolution for sync-auth config and the stored credential bundle.
//!
//! Resolution order for the config file:
//!   1. --config flag (handled by the caller)
//!   2. SYNC_AUTH_CONFIG environment variable
//!   3. {user_config_dir}/sync-auth/config.toml

use std::path::PathBuf;

pub const CONFIG_ENV: &str = "SYNC_AUTH_CONFIG";

/// Return the OS-native sync-auth config directory.
pub fn app_config_dir() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "sync-auth") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        home_dir().join(".config").join("sync-auth")
    }
}

/// Config path named by SYNC_AUTH_CONFIG. An empty value counts as unset.
pub fn config_env() -> Option<PathBuf> {
    match std::env::var(CONFIG_ENV) {
        Ok(env) if !env.is_empty() => Some(expand_tilde(&env)),
        _ => None,
    }
}

/// Return the config file path, honouring SYNC_AUTH_CONFIG.
pub fn config_file() -> PathBuf {
    config_env().unwrap_or_else(|| app_config_dir().join("config.toml"))
}

/// Where the bundle lands when the config does not say otherwise.
pub fn default_storage_file() -> PathBuf {
    app_config_dir().join("auth.json")
}

/// Get the user's home directory.
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand ~ to home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}
