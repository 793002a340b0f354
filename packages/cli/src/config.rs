use screenweave_workspace::SyncConfig;
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "screenweave.config.json";

/// Load `screenweave.config.json` from a directory, or the defaults if the
/// directory has none
pub fn load(cwd: &Path) -> anyhow::Result<SyncConfig> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        let config = SyncConfig::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", config_path.display(), e))?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(config)
    } else {
        Ok(SyncConfig::default())
    }
}
