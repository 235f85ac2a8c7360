mod settings;

pub use settings::{ApiSettings, Config, DisplaySettings, LoggingSettings};

use crate::error::{Result, TiendaError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG-style, falling back to ~/.tiendafix/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tiendafix") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        TiendaError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".tiendafix"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(TiendaError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| TiendaError::ConfigParse { path, source: e })
}

/// Load config.toml, or defaults when the directory has not been initialized
pub fn load_config_or_default(config_dir: &Path) -> Result<Config> {
    if config_dir.join("config.toml").exists() {
        load_config(config_dir)
    } else {
        Ok(Config::default())
    }
}

/// Create the config directory with a template config.toml
pub fn init_config_dir(config_dir: &Path) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(TiendaError::AlreadyInitialized(config_dir.to_path_buf()));
    }
    fs::create_dir_all(config_dir)?;
    let path = config_dir.join("config.toml");
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "http://localhost:3000"   # dashboard serving /api/customers/{id}/details
timeout_secs = 10
# token = "eyJhbGciOi..."            # optional bearer token

[display]
currency_symbol = "$"

[logging]
level = "warn"   # overridden by RUST_LOG when set
"#;
