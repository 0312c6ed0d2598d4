//! JAR manifest (`META-INF/MANIFEST.MF`) parsing
//!
//! Only the main section is read. Continuation lines start with a single
//! space and are joined onto the previous value without the space.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Malformed manifest {path}, line {line}: {content:?}")]
    Malformed {
        path: PathBuf,
        line: usize,
        content: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    /// Reads the manifest of an exploded application. A missing manifest is empty.
    pub fn from_application(root: &Path) -> Result<Self, ManifestError> {
        let path = root.join(MANIFEST_PATH);
        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&path, &content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ManifestError::Read { path, source }),
        }
    }

    /// Parses manifest text. `path` is only used for error reporting.
    pub fn parse(path: &Path, content: &str) -> Result<Self, ManifestError> {
        let mut entries: BTreeMap<String, String> = BTreeMap::new();
        let mut last_key: Option<String> = None;

        for (index, raw) in content.lines().enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let malformed = || ManifestError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                content: line.to_string(),
            };

            if line.is_empty() {
                break;
            }

            if let Some(continuation) = line.strip_prefix(' ') {
                let key = last_key.as_ref().ok_or_else(malformed)?;
                if let Some(value) = entries.get_mut(key) {
                    value.push_str(continuation);
                }
                continue;
            }

            let (key, value) = line.split_once(':').ok_or_else(malformed)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(malformed());
            }

            let value = value.strip_prefix(' ').unwrap_or(value);
            entries.insert(key.to_string(), value.to_string());
            last_key = Some(key.to_string());
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<Manifest, ManifestError> {
        Manifest::parse(Path::new(MANIFEST_PATH), content)
    }

    #[test]
    fn test_parse_entries() {
        let manifest = parse(
            "Manifest-Version: 1.0\r\nStart-Class: com.example.Application\r\nSpring-Boot-Version: 2.2.2.RELEASE\r\n",
        )
        .unwrap();

        assert_eq!(manifest.get("Manifest-Version"), Some("1.0"));
        assert_eq!(manifest.get("Start-Class"), Some("com.example.Application"));
        assert_eq!(manifest.get("Spring-Boot-Version"), Some("2.2.2.RELEASE"));
        assert_eq!(manifest.get("Main-Class"), None);
    }

    #[test]
    fn test_parse_continuation_lines() {
        let manifest = parse("Start-Class: com.example.very.long.pa\n ckage.Application\n").unwrap();
        assert_eq!(
            manifest.get("Start-Class"),
            Some("com.example.very.long.package.Application")
        );
    }

    #[test]
    fn test_parse_stops_at_first_section() {
        let manifest = parse("Main-Class: A\n\nName: lib/\nMain-Class: B\n").unwrap();
        assert_eq!(manifest.get("Main-Class"), Some("A"));
        assert_eq!(manifest.get("Name"), None);
    }

    #[test]
    fn test_parse_malformed_line() {
        let err = parse("Manifest-Version: 1.0\nnot a header\n").unwrap_err();
        assert!(matches!(err, ManifestError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_parse_leading_continuation_is_malformed() {
        assert!(matches!(
            parse(" dangling\n"),
            Err(ManifestError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let dir = TempDir::new().unwrap();
        let manifest = Manifest::from_application(dir.path()).unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_from_application() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("META-INF")).unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_PATH),
            "Spring-Boot-Lib: BOOT-INF/lib/\n",
        )
        .unwrap();

        let manifest = Manifest::from_application(dir.path()).unwrap();
        assert_eq!(manifest.get("Spring-Boot-Lib"), Some("BOOT-INF/lib/"));
    }
}
