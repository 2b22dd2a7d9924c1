mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./tubeforge.toml", "~/.config/tubeforge/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if let Some(problem) = config.decode.validate().into_iter().next() {
        anyhow::bail!("Invalid [decode] section: {}", problem);
    }

    if config.output.preferred_itags.len() > 1 {
        let mut seen = std::collections::BTreeSet::new();
        for itag in &config.output.preferred_itags {
            if !seen.insert(itag) {
                tracing::warn!("Itag {} listed more than once in preferred_itags", itag);
            }
        }
    }

    Ok(())
}
