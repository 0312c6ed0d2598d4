//! Facts about a compiled Spring Boot application, read from its manifest

use super::manifest::{Manifest, ManifestError};
use crate::build::Application;
use crate::util::fs::is_file;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

pub const SPRING_BOOT_VERSION: &str = "Spring-Boot-Version";
pub const SPRING_BOOT_CLASSES: &str = "Spring-Boot-Classes";
pub const SPRING_BOOT_LIB: &str = "Spring-Boot-Lib";
pub const START_CLASS: &str = "Start-Class";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Failed to list JARs under {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplicationMetadata {
    /// Classes directory, relative to the application root
    pub classes: String,

    /// Absolute classes directory followed by every library JAR
    pub classpath: Vec<String>,

    /// Library directory, relative to the application root
    pub lib: String,

    pub start_class: String,

    pub version: String,
}

impl ApplicationMetadata {
    /// Returns `None` when the manifest carries no `Spring-Boot-Version`.
    pub fn from_application(application: &Application) -> Result<Option<Self>, MetadataError> {
        let manifest = Manifest::from_application(&application.root)?;
        Self::from_manifest(&application.root, &manifest)
    }

    pub fn from_manifest(root: &Path, manifest: &Manifest) -> Result<Option<Self>, MetadataError> {
        let Some(version) = manifest.get(SPRING_BOOT_VERSION) else {
            debug!(root = %root.display(), "No {} in manifest", SPRING_BOOT_VERSION);
            return Ok(None);
        };

        let classes = manifest.get(SPRING_BOOT_CLASSES).unwrap_or_default().to_string();
        let lib = manifest.get(SPRING_BOOT_LIB).unwrap_or_default().to_string();
        let start_class = manifest.get(START_CLASS).unwrap_or_default().to_string();

        let mut classpath = vec![root.join(&classes).to_string_lossy().to_string()];
        classpath.extend(find_jars(&root.join(&lib))?);

        Ok(Some(Self {
            classes,
            classpath,
            lib,
            start_class,
            version: version.to_string(),
        }))
    }
}

fn find_jars(lib: &Path) -> Result<Vec<String>, MetadataError> {
    if !lib.exists() {
        return Ok(Vec::new());
    }

    let mut jars = Vec::new();
    for entry in WalkDir::new(lib).sort_by_file_name() {
        let entry = entry.map_err(|source| MetadataError::Walk {
            path: lib.to_path_buf(),
            source,
        })?;

        if is_file(&entry)
            && entry.path().extension().and_then(|e| e.to_str()) == Some("jar")
        {
            jars.push(entry.path().to_string_lossy().to_string());
        }
    }
    jars.sort();

    Ok(jars)
}
