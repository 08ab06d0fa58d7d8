//! CLI sub-commands.

pub mod batch;
pub mod config;
pub mod due_dates;
pub mod extract;

use std::path::Path;

use gstmeta_core::GstMetaConfig;

/// Load configuration from `path`, the default location, or defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<GstMetaConfig> {
    let config = match path {
        Some(path) => GstMetaConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                GstMetaConfig::from_file(&default_path)?
            } else {
                GstMetaConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}
