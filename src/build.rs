//! Build context shared by the detectors

use crate::layers::Layers;
use std::io;
use std::path::{Path, PathBuf};

/// The application being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub root: PathBuf,
}

impl Application {
    /// Resolves `root` to an absolute, canonical directory.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("application root is not a directory: {}", root.display()),
            ));
        }
        Ok(Self { root })
    }
}

/// Everything a detector needs for one build invocation.
#[derive(Debug, Clone)]
pub struct Build {
    pub application: Application,
    pub layers: Layers,
}

impl Build {
    pub fn new(application: Application, layers: Layers) -> Self {
        Self {
            application,
            layers,
        }
    }
}
