//! Session settings.
//!
//! Settings merge two optional TOML files: the user-global file under the
//! XDG config directory and the workspace file under the project root. The
//! workspace wins per key. Providers get free-form tables keyed by their
//! identity; the core does not interpret them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::logging::LoggingConfig;

/// Workspace config file, relative to the project root.
pub const WORKSPACE_CONFIG: &str = ".atelier/config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Free-form per-provider configuration tables, keyed by provider
    /// identity. Opaque to the core; handed to providers verbatim.
    #[serde(default)]
    pub providers: HashMap<String, toml::Value>,

    /// Override for the session state directory. Defaults to `.atelier`
    /// under the project root when unset.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings for the workspace at `project_root`.
    ///
    /// Missing files are fine; an unreadable or malformed file is a
    /// configuration error.
    pub fn load(project_root: &Path) -> Result<Self, HostError> {
        let mut builder = Config::builder();

        if let Some(global) = global_config_path() {
            builder = builder.add_source(File::from(global).required(false));
        }
        builder =
            builder.add_source(File::from(project_root.join(WORKSPACE_CONFIG)).required(false));

        let merged = builder.build()?;
        Ok(merged.try_deserialize()?)
    }

    /// The configuration table for one provider, if present.
    pub fn provider_table(&self, identity: &str) -> Option<&toml::Value> {
        self.providers.get(identity)
    }
}

fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "atelier")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
