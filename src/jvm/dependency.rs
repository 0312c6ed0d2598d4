//! JAR dependency inventory
//!
//! The library directory is walked once and every regular file, or symlink
//! to one, is probed on the blocking pool. Probes report through one channel;
//! the scan returns after the last probe has finished and the results are
//! sorted, so the inventory does not depend on walk or completion order.

use crate::util::fs::is_file;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::ZipArchive;

const LOCAL_FILE_HEADER: [u8; 4] = *b"PK\x03\x04";
const EMPTY_ARCHIVE: [u8; 4] = *b"PK\x05\x06";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Failed to probe {path}: {source}")]
    Probe { path: PathBuf, source: io::Error },

    #[error("Dependency probe for {path} did not complete: {source}")]
    Join {
        path: PathBuf,
        source: tokio::task::JoinError,
    },
}

/// One JAR found under the library directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JarDependency {
    pub path: PathBuf,
    pub group: Option<String>,
    pub artifact: Option<String>,
    pub version: Option<String>,

    /// The entry carries a `.jar` name but is not a readable archive
    pub exploded: bool,
}

impl JarDependency {
    /// Probes a single file. `Ok(None)` means the file is not a JAR.
    pub fn probe(path: &Path) -> Result<Option<Self>, ScanError> {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };
        if !name.ends_with(".jar") {
            return Ok(None);
        }

        let probe_err = |source| ScanError::Probe {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(probe_err)?;
        let header = read_header(&mut file).map_err(probe_err)?;
        let is_archive = header == Some(LOCAL_FILE_HEADER) || header == Some(EMPTY_ARCHIVE);

        let (coordinates, exploded) = if is_archive {
            match pom_coordinates(file) {
                Ok(Some(coordinates)) => (Some(coordinates), false),
                Ok(None) => (file_name_coordinates(name), false),
                Err(ZipError::Io(source)) => return Err(probe_err(source)),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Unreadable archive");
                    (file_name_coordinates(name), true)
                }
            }
        } else {
            (file_name_coordinates(name), true)
        };

        let coordinates = coordinates.unwrap_or_default();
        Ok(Some(Self {
            path: path.to_path_buf(),
            group: coordinates.group,
            artifact: coordinates.artifact,
            version: coordinates.version,
            exploded,
        }))
    }
}

impl Ord for JarDependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.group
            .cmp(&other.group)
            .then_with(|| self.artifact.cmp(&other.artifact))
            .then_with(|| self.version.cmp(&other.version))
            .then_with(|| self.path.as_os_str().cmp(other.path.as_os_str()))
            .then_with(|| self.exploded.cmp(&other.exploded))
    }
}

impl PartialOrd for JarDependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dependencies sorted by group, artifact, version, then path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JarDependencies(Vec<JarDependency>);

impl JarDependencies {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JarDependency> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<JarDependency> {
        self.0
    }
}

impl FromIterator<JarDependency> for JarDependencies {
    fn from_iter<I: IntoIterator<Item = JarDependency>>(iter: I) -> Self {
        let mut dependencies: Vec<_> = iter.into_iter().collect();
        dependencies.sort();
        Self(dependencies)
    }
}

impl<'a> IntoIterator for &'a JarDependencies {
    type Item = &'a JarDependency;
    type IntoIter = std::slice::Iter<'a, JarDependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds the inventory of every JAR under `lib`.
///
/// A missing directory yields an empty inventory. The first walk or probe
/// failure aborts the scan.
pub async fn scan(lib: &Path) -> Result<JarDependencies, ScanError> {
    if !tokio::fs::try_exists(lib)
        .await
        .map_err(|source| ScanError::Probe {
            path: lib.to_path_buf(),
            source,
        })?
    {
        debug!(lib = %lib.display(), "No library directory");
        return Ok(JarDependencies::default());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut probes = 0usize;

    for entry in WalkDir::new(lib) {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: lib.to_path_buf(),
            source,
        })?;
        if !is_file(&entry) {
            continue;
        }

        let path = entry.into_path();
        let tx = tx.clone();
        probes += 1;

        let handle = tokio::task::spawn_blocking({
            let path = path.clone();
            move || JarDependency::probe(&path)
        });
        tokio::spawn(async move {
            let result = match handle.await {
                Ok(result) => result,
                Err(source) => Err(ScanError::Join { path, source }),
            };
            let _ = tx.send(result);
        });
    }
    drop(tx);

    let mut dependencies = Vec::new();
    while let Some(result) = rx.recv().await {
        if let Some(dependency) = result? {
            dependencies.push(dependency);
        }
    }

    let dependencies: JarDependencies = dependencies.into_iter().collect();
    info!(
        lib = %lib.display(),
        probes,
        dependencies = dependencies.len(),
        "Scanned JAR dependencies"
    );

    Ok(dependencies)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Coordinates {
    group: Option<String>,
    artifact: Option<String>,
    version: Option<String>,
}

fn read_header(file: &mut File) -> io::Result<Option<[u8; 4]>> {
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        match file.read(&mut header[filled..])? {
            0 => return Ok(None),
            n => filled += n,
        }
    }
    Ok(Some(header))
}

/// Coordinates from the single `META-INF/maven/<group>/<artifact>/pom.properties`.
fn pom_coordinates(file: File) -> Result<Option<Coordinates>, ZipError> {
    let mut archive = ZipArchive::new(file)?;

    let poms: Vec<String> = archive
        .file_names()
        .filter(|name| is_pom_properties(name))
        .map(str::to_string)
        .collect();
    let [pom] = poms.as_slice() else {
        return Ok(None);
    };

    let mut content = String::new();
    archive.by_name(pom)?.read_to_string(&mut content)?;

    let mut coordinates = Coordinates::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = Some(value.trim().to_string());
            match key.trim() {
                "groupId" => coordinates.group = value,
                "artifactId" => coordinates.artifact = value,
                "version" => coordinates.version = value,
                _ => {}
            }
        }
    }

    if coordinates == Coordinates::default() {
        return Ok(None);
    }
    Ok(Some(coordinates))
}

fn is_pom_properties(name: &str) -> bool {
    let parts: Vec<&str> = name.split('/').collect();
    matches!(parts.as_slice(), ["META-INF", "maven", group, artifact, "pom.properties"]
        if !group.is_empty() && !artifact.is_empty())
}

/// Artifact and version from `<artifact>-<version>.jar`, the version starting at
/// the first `-` followed by a digit.
fn file_name_coordinates(name: &str) -> Option<Coordinates> {
    static FILE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = FILE_NAME_REGEX.get_or_init(|| {
        Regex::new(r"^(?P<artifact>.+?)-(?P<version>\d.*)\.jar$").expect("Invalid JAR name regex")
    });

    let caps = re.captures(name)?;
    Some(Coordinates {
        group: None,
        artifact: Some(caps["artifact"].to_string()),
        version: Some(caps["version"].to_string()),
    })
}
