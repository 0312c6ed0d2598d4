//! JVM application facts: manifest, application metadata and the JAR inventory

pub mod dependency;
pub mod manifest;
pub mod metadata;

pub use dependency::{scan, JarDependencies, JarDependency, ScanError};
pub use manifest::{Manifest, ManifestError};
pub use metadata::{ApplicationMetadata, MetadataError};
