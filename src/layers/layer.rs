use super::{read_toml, write_file, LayerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// When a layer is available to the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerFlags {
    #[serde(default)]
    pub build: bool,
    #[serde(default)]
    pub cache: bool,
    #[serde(default)]
    pub launch: bool,
}

impl LayerFlags {
    pub const BUILD_CACHE_LAUNCH: LayerFlags = LayerFlags {
        build: true,
        cache: true,
        launch: true,
    };

    pub const LAUNCH: LayerFlags = LayerFlags {
        build: false,
        cache: false,
        launch: true,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LayerToml {
    #[serde(default)]
    build: bool,
    #[serde(default)]
    cache: bool,
    #[serde(default)]
    launch: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<toml::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    name: String,
    path: PathBuf,
    metadata_path: PathBuf,
}

impl Layer {
    pub(super) fn new(layers_root: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: layers_root.join(name),
            metadata_path: layers_root.join(format!("{}.toml", name)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// Contributes the layer unless it already holds `metadata` with the same flags.
    ///
    /// On a fresh contribution the layer directory is recreated before `contributor`
    /// runs, and the `<name>.toml` file is written last so an aborted contribution
    /// never looks complete.
    pub fn contribute<M, F>(
        &self,
        metadata: &M,
        contributor: F,
        flags: LayerFlags,
    ) -> Result<(), LayerError>
    where
        M: Serialize,
        F: FnOnce(&Layer) -> Result<(), LayerError>,
    {
        let expected = LayerToml {
            build: flags.build,
            cache: flags.cache,
            launch: flags.launch,
            metadata: Some(toml::Value::try_from(metadata)?),
        };

        if self.read_layer_toml()?.as_ref() == Some(&expected) {
            info!(layer = %self.name, "Reusing cached layer");
            return Ok(());
        }

        info!(layer = %self.name, "Contributing layer");
        if self.path.exists() {
            fs::remove_dir_all(&self.path).map_err(|source| LayerError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::create_dir_all(&self.path).map_err(|source| LayerError::Write {
            path: self.path.clone(),
            source,
        })?;

        contributor(self)?;

        write_file(&self.metadata_path, &toml::to_string(&expected)?)
    }

    /// Reads the layer's flags back, `None` when the layer has not been contributed.
    pub fn flags(&self) -> Result<Option<LayerFlags>, LayerError> {
        Ok(self.read_layer_toml()?.map(|toml| LayerFlags {
            build: toml.build,
            cache: toml.cache,
            launch: toml.launch,
        }))
    }

    fn read_layer_toml(&self) -> Result<Option<LayerToml>, LayerError> {
        read_toml(&self.metadata_path)
    }

    /// Prepends `value` to the path-list variable `name` in every phase.
    pub fn prepend_path_shared_env(&self, name: &str, value: &str) -> Result<(), LayerError> {
        let env = self.path.join("env");
        write_file(&env.join(format!("{}.prepend", name)), value)?;
        write_file(&env.join(format!("{}.delim", name)), path_list_separator())?;
        debug!(layer = %self.name, variable = name, "Prepended shared environment variable");
        Ok(())
    }

    /// Appends `value` to `name` in the launch environment only.
    pub fn append_launch_env(&self, name: &str, value: &str) -> Result<(), LayerError> {
        let env = self.path.join("env.launch");
        write_file(&env.join(format!("{}.append", name)), value)?;
        debug!(layer = %self.name, variable = name, "Appended launch environment variable");
        Ok(())
    }
}

/// The separator the OS uses between entries of PATH-like variables.
pub fn path_list_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}
