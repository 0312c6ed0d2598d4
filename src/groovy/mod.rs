//! Spring Boot CLI command contributor
//!
//! Applies when the application tree holds at least one Groovy file that
//! declares a class or a `beans { }` block. The launch list passed to
//! `spring run` holds every launched file, including files that matched no
//! rule, which are reported as warnings.

pub mod classifier;

pub use classifier::{classify, GroovyFileKind};

use crate::build::Build;
use crate::layers::{path_list_separator, LaunchMetadata, Layer, LayerError, LayerFlags, Layers};
use crate::util::fs::is_file;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Process type and plan name for Spring Boot CLI applications.
pub const DEPENDENCY: &str = "spring-boot-cli";

pub const LAYER: &str = "command";

pub const GROOVY_FILES: &str = "GROOVY_FILES";

pub const GROOVY_EXTENSION: &str = "groovy";

pub const COMMAND: &str = "spring run -cp $CLASSPATH $GROOVY_FILES";

pub const PROCESS_TYPES: [&str; 3] = [DEPENDENCY, "task", "web"];

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to contribute command: {0}")]
    Layer(#[from] LayerError),
}

#[derive(Serialize)]
struct CommandLayerMetadata<'a> {
    files: &'a [PathBuf],
}

#[derive(Debug, Clone)]
pub struct Command {
    files: Vec<PathBuf>,
    layer: Layer,
    layers: Layers,
}

impl Command {
    /// `Ok(None)` when no Groovy file declares a class or a configuration block.
    pub fn new(build: &Build) -> Result<Option<Self>, CommandError> {
        let root = &build.application.root;
        let mut files = Vec::new();
        let mut invalid = Vec::new();
        let mut qualified = false;

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_groovy_directory(entry));

        for entry in walker {
            let entry = entry.map_err(|source| CommandError::Walk {
                path: root.clone(),
                source,
            })?;
            if !is_file(&entry) || !has_groovy_extension(entry.path()) {
                continue;
            }

            let content = fs::read(entry.path()).map_err(|source| CommandError::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let kind = classify(relative, &String::from_utf8_lossy(&content));
            debug!(path = %relative.display(), kind = ?kind, "Classified Groovy file");

            qualified |= kind.qualifies();
            if kind == GroovyFileKind::Invalid {
                invalid.push(entry.path().to_path_buf());
            }
            if kind.launched() {
                files.push(entry.into_path());
            }
        }

        if !qualified {
            return Ok(None);
        }

        for path in &invalid {
            warn!(
                path = %path.display(),
                "Groovy file declares neither a class nor a beans block; launching it anyway"
            );
        }

        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        files.dedup();

        Ok(Some(Self {
            files,
            layer: build.layers.layer(LAYER),
            layers: build.layers.clone(),
        }))
    }

    /// Absolute paths of the launched files, sorted and deduplicated.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Value of `GROOVY_FILES`: the files joined with the path-list separator,
    /// after a leading empty element.
    pub fn groovy_files(&self) -> String {
        std::iter::once(String::new())
            .chain(self.files.iter().map(|f| f.to_string_lossy().to_string()))
            .collect::<Vec<_>>()
            .join(path_list_separator())
    }

    /// Contributes the launch-only `command` layer and the process types.
    pub fn contribute(&self) -> Result<(), CommandError> {
        let groovy_files = self.groovy_files();
        self.layer.contribute(
            &CommandLayerMetadata { files: &self.files },
            |layer| layer.append_launch_env(GROOVY_FILES, &groovy_files),
            LayerFlags::LAUNCH,
        )?;

        info!(
            files = self.files.len(),
            command = COMMAND,
            "Contributing Spring Boot CLI process types"
        );
        self.layers
            .write_application_metadata(&LaunchMetadata::with_processes(&PROCESS_TYPES, COMMAND))?;
        Ok(())
    }
}

fn is_groovy_directory(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == GROOVY_EXTENSION
}

fn has_groovy_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(GROOVY_EXTENSION)
}
