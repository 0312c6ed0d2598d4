//! Layer contributions and application metadata
//!
//! A layers directory holds one sub-directory per layer, a `<name>.toml`
//! file per layer describing when it is available (build, cache, launch)
//! and the metadata it was built from, and a single `launch.toml` with
//! the processes and slices of the application.

mod layer;
mod metadata;

pub use layer::{path_list_separator, Layer, LayerFlags};
pub use metadata::{LaunchMetadata, Process, Slice, Slices};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name of the application-level metadata.
pub const LAUNCH_METADATA_FILE: &str = "launch.toml";

#[derive(Debug, Error)]
pub enum LayerError {
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to encode layer metadata: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// The layers directory of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layers {
    root: PathBuf,
}

impl Layers {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the layer called `name`. Nothing is written until it is contributed.
    pub fn layer(&self, name: &str) -> Layer {
        Layer::new(&self.root, name)
    }

    /// Writes `launch.toml`, replacing any previous application metadata.
    pub fn write_application_metadata(&self, metadata: &LaunchMetadata) -> Result<(), LayerError> {
        let path = self.root.join(LAUNCH_METADATA_FILE);
        let content = toml::to_string(metadata)?;

        write_file(&path, &content)?;
        debug!(
            path = %path.display(),
            processes = metadata.processes.len(),
            slices = metadata.slices.len(),
            "Wrote application metadata"
        );
        Ok(())
    }

    /// Reads `launch.toml` back, `None` when it has not been written.
    pub fn read_application_metadata(&self) -> Result<Option<LaunchMetadata>, LayerError> {
        let path = self.root.join(LAUNCH_METADATA_FILE);
        read_toml(&path)
    }
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<(), LayerError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| LayerError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| LayerError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_toml<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, LayerError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(LayerError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    toml::from_str(&content)
        .map(Some)
        .map_err(|source| LayerError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_application_metadata_round_trip() {
        let dir = TempDir::new().unwrap();
        let layers = Layers::new(dir.path());

        let metadata = LaunchMetadata {
            processes: vec![Process::new("web", "java -cp $CLASSPATH Main")],
            slices: vec![
                Slice::new(vec!["Main.class".to_string()]),
                Slice::default(),
            ],
        };
        layers.write_application_metadata(&metadata).unwrap();

        let read = layers.read_application_metadata().unwrap().unwrap();
        assert_eq!(read, metadata);
    }

    #[test]
    fn test_application_metadata_file_format() {
        let dir = TempDir::new().unwrap();
        let layers = Layers::new(dir.path());

        layers
            .write_application_metadata(&LaunchMetadata {
                processes: vec![Process::new("task", "run")],
                slices: vec![],
            })
            .unwrap();

        let content = fs::read_to_string(dir.path().join(LAUNCH_METADATA_FILE)).unwrap();
        assert!(content.contains("[[processes]]"));
        assert!(content.contains("type = \"task\""));
        assert!(content.contains("command = \"run\""));
        assert!(!content.contains("slices"));
    }

    #[test]
    fn test_missing_application_metadata() {
        let dir = TempDir::new().unwrap();
        let layers = Layers::new(dir.path());
        assert!(layers.read_application_metadata().unwrap().is_none());
    }

    #[test]
    fn test_malformed_application_metadata() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LAUNCH_METADATA_FILE), "processes = 7").unwrap();

        let layers = Layers::new(dir.path());
        assert!(matches!(
            layers.read_application_metadata(),
            Err(LayerError::Decode { .. })
        ));
    }
}
