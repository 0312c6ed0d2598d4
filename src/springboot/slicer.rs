//! Five-way partition of an application tree into layer slices

use crate::jvm::ApplicationMetadata;
use crate::layers::{Slice, Slices};
use crate::util::fs::is_file;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

const META_INF: &str = "META-INF/";
const SNAPSHOT: &str = "SNAPSHOT";

#[derive(Debug, Error)]
pub enum SliceError {
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceKind {
    Launch,
    Dependency,
    Snapshot,
    Application,
    Remainder,
}

impl SliceKind {
    /// Emission order. Layer assembly relies on it, so it never changes.
    pub const ORDER: [SliceKind; 5] = [
        SliceKind::Launch,
        SliceKind::Dependency,
        SliceKind::Snapshot,
        SliceKind::Application,
        SliceKind::Remainder,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SliceKind::Launch => "launch",
            SliceKind::Dependency => "dependency",
            SliceKind::Snapshot => "snapshot",
            SliceKind::Application => "application",
            SliceKind::Remainder => "remainder",
        }
    }

    fn index(&self) -> usize {
        match self {
            SliceKind::Launch => 0,
            SliceKind::Dependency => 1,
            SliceKind::Snapshot => 2,
            SliceKind::Application => 3,
            SliceKind::Remainder => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slicer {
    classes: String,
    lib: String,
}

impl Slicer {
    /// `classes` and `lib` are prefixes relative to the application root.
    ///
    /// Overlapping prefixes are accepted; a path matching both lands in the
    /// application slice.
    pub fn new(classes: &str, lib: &str) -> Self {
        let classes = normalize(classes);
        let lib = normalize(lib);

        if overlaps(&classes, &lib) {
            warn!(
                classes = %classes,
                lib = %lib,
                "Classes and library directories overlap; application classes take precedence"
            );
        }

        Self { classes, lib }
    }

    pub fn from_metadata(metadata: &ApplicationMetadata) -> Self {
        Self::new(&metadata.classes, &metadata.lib)
    }

    /// Classifies a root-relative path. The first matching rule wins.
    pub fn classify(&self, relative: &str) -> SliceKind {
        let path = normalize(relative);
        let in_classes = path.starts_with(&self.classes);
        let in_lib = path.starts_with(&self.lib);
        let is_jar = Path::new(&path).extension().and_then(|e| e.to_str()) == Some("jar");
        let is_snapshot = path.contains(SNAPSHOT);

        if in_classes {
            SliceKind::Application
        } else if in_lib && is_jar && !is_snapshot {
            SliceKind::Dependency
        } else if !in_lib && !path.starts_with(META_INF) {
            SliceKind::Launch
        } else if in_lib && is_jar && is_snapshot {
            SliceKind::Snapshot
        } else {
            SliceKind::Remainder
        }
    }

    /// Walks `root` once and returns the slices in [`SliceKind::ORDER`].
    ///
    /// Every regular file, including a symlink to one, lands in exactly one
    /// slice. Paths keep the platform separator.
    pub fn slices(&self, root: &Path) -> Result<Slices, SliceError> {
        let mut slices: Slices = vec![Slice::default(); SliceKind::ORDER.len()];

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|source| SliceError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if !is_file(&entry) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .to_string();

            let kind = self.classify(&relative);
            debug!(path = %relative, slice = kind.name(), "Classified file");
            slices[kind.index()].paths.push(relative);
        }

        Ok(slices)
    }
}

/// An empty prefix is an unset directory, not an overlap.
fn overlaps(classes: &str, lib: &str) -> bool {
    !classes.is_empty()
        && !lib.is_empty()
        && (classes.starts_with(lib) || lib.starts_with(classes))
}

fn normalize(path: &str) -> String {
    if std::path::MAIN_SEPARATOR == '/' {
        path.to_string()
    } else {
        path.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;
    use yare::parameterized;

    fn slicer() -> Slicer {
        Slicer::new("BOOT-INF/classes/", "BOOT-INF/lib/")
    }

    #[parameterized(
        class_file = { "BOOT-INF/classes/com/example/App.class", SliceKind::Application },
        resource = { "BOOT-INF/classes/application.properties", SliceKind::Application },
        snapshot_in_classes = { "BOOT-INF/classes/SNAPSHOT.jar", SliceKind::Application },
        release_jar = { "BOOT-INF/lib/spring-core-5.2.2.RELEASE.jar", SliceKind::Dependency },
        snapshot_jar = { "BOOT-INF/lib/demo-1.0.0-SNAPSHOT.jar", SliceKind::Snapshot },
        lib_non_jar = { "BOOT-INF/lib/index.txt", SliceKind::Remainder },
        loader = { "org/springframework/boot/loader/JarLauncher.class", SliceKind::Launch },
        root_file = { "README.md", SliceKind::Launch },
        manifest = { "META-INF/MANIFEST.MF", SliceKind::Remainder },
        maven_metadata = { "META-INF/maven/com.example/demo/pom.xml", SliceKind::Remainder },
    )]
    fn test_classify(path: &str, expected: SliceKind) {
        assert_eq!(slicer().classify(path), expected);
    }

    #[test]
    fn test_overlapping_prefixes_prefer_application() {
        let slicer = Slicer::new("BOOT-INF/", "BOOT-INF/lib/");
        assert_eq!(slicer.classify("BOOT-INF/lib/a-1.0.jar"), SliceKind::Application);
    }

    #[parameterized(
        nested_lib = { "BOOT-INF/", "BOOT-INF/lib/", true },
        nested_classes = { "BOOT-INF/lib/classes/", "BOOT-INF/lib/", true },
        disjoint = { "BOOT-INF/classes/", "BOOT-INF/lib/", false },
        no_lib = { "BOOT-INF/classes/", "", false },
        no_classes = { "", "BOOT-INF/lib/", false },
    )]
    fn test_overlaps(classes: &str, lib: &str, expected: bool) {
        assert_eq!(overlaps(classes, lib), expected);
    }

    #[test]
    fn test_order_names() {
        let names: Vec<_> = SliceKind::ORDER.iter().map(SliceKind::name).collect();
        assert_eq!(
            names,
            vec!["launch", "dependency", "snapshot", "application", "remainder"]
        );
        for (i, kind) in SliceKind::ORDER.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_slices_partition_the_tree() {
        let dir = TempDir::new().unwrap();
        let files = [
            "BOOT-INF/classes/com/example/App.class",
            "BOOT-INF/lib/spring-core-5.2.2.RELEASE.jar",
            "BOOT-INF/lib/demo-1.0.0-SNAPSHOT.jar",
            "BOOT-INF/lib/index.txt",
            "META-INF/MANIFEST.MF",
            "org/springframework/boot/loader/JarLauncher.class",
        ];
        for file in files {
            touch(dir.path(), file);
        }

        let slices = slicer().slices(dir.path()).unwrap();

        assert_eq!(slices.len(), 5);
        assert_eq!(
            slices[0].paths,
            vec![Path::new("org/springframework/boot/loader/JarLauncher.class")
                .to_string_lossy()
                .to_string()]
        );
        assert_eq!(slices[1].paths.len(), 1);
        assert_eq!(slices[2].paths.len(), 1);
        assert_eq!(slices[3].paths.len(), 1);
        assert_eq!(slices[4].paths.len(), 2);

        let mut seen = HashSet::new();
        for slice in &slices {
            for path in &slice.paths {
                assert!(seen.insert(path.clone()), "{} in two slices", path);
            }
        }
        let expected: HashSet<String> = files
            .iter()
            .map(|f| Path::new(f).to_string_lossy().to_string())
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_slices_empty_tree() {
        let dir = TempDir::new().unwrap();
        let slices = slicer().slices(dir.path()).unwrap();
        assert_eq!(slices.len(), 5);
        assert!(slices.iter().all(Slice::is_empty));
    }

    #[test]
    fn test_slices_are_idempotent() {
        let dir = TempDir::new().unwrap();
        for file in ["b.txt", "a.txt", "BOOT-INF/lib/x-1.jar", "BOOT-INF/classes/Y.class"] {
            touch(dir.path(), file);
        }

        let first = slicer().slices(dir.path()).unwrap();
        let second = slicer().slices(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].paths, vec!["a.txt".to_string(), "b.txt".to_string()]);
    }

    #[test]
    fn test_slices_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            slicer().slices(&dir.path().join("missing")),
            Err(SliceError::Walk { .. })
        ));
    }
}
