//! Spring Boot application contributor
//!
//! Applies when the application manifest carries `Spring-Boot-Version`.
//! Contributes the classpath layer, slices the application for layering
//! and writes the launch processes.

pub mod slicer;

pub use slicer::{SliceError, SliceKind, Slicer};

use crate::build::{Application, Build};
use crate::jvm::{self, ApplicationMetadata, JarDependencies, MetadataError, ScanError};
use crate::layers::{
    path_list_separator, LaunchMetadata, Layer, LayerError, LayerFlags, Layers, Slices,
};
use crate::plan::Plan;
use thiserror::Error;
use tracing::{debug, info};

/// Plan entry and layer name for Spring Boot applications.
pub const DEPENDENCY: &str = "spring-boot";

pub const PROCESS_TYPES: [&str; 3] = [DEPENDENCY, "task", "web"];

#[derive(Debug, Error)]
pub enum SpringBootError {
    #[error("Failed to read application metadata: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Failed to slice application: {0}")]
    Slice(#[from] SliceError),

    #[error("Failed to scan dependencies: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to contribute layers: {0}")]
    Layer(#[from] LayerError),

    #[error("Failed to encode plan metadata: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct SpringBoot {
    pub metadata: ApplicationMetadata,

    application: Application,
    layer: Layer,
    layers: Layers,
}

impl SpringBoot {
    /// `Ok(None)` when the application is not a Spring Boot application.
    pub fn new(build: &Build) -> Result<Option<Self>, SpringBootError> {
        let Some(metadata) = ApplicationMetadata::from_application(&build.application)? else {
            return Ok(None);
        };

        debug!(
            version = %metadata.version,
            start_class = %metadata.start_class,
            "Spring Boot application detected"
        );

        Ok(Some(Self {
            metadata,
            application: build.application.clone(),
            layer: build.layers.layer(DEPENDENCY),
            layers: build.layers.clone(),
        }))
    }

    /// Contributes to build, cache and launch. Any failure aborts before
    /// `launch.toml` is written.
    pub async fn contribute(&self) -> Result<(), SpringBootError> {
        let classpath = self.metadata.classpath.join(path_list_separator());
        self.layer.contribute(
            &self.metadata,
            |layer| layer.prepend_path_shared_env("CLASSPATH", &classpath),
            LayerFlags::BUILD_CACHE_LAUNCH,
        )?;

        let slices = self.slices()?;
        let dependencies = self.dependencies().await?;
        let command = self.command();

        info!(
            dependencies = dependencies.len(),
            command = %command,
            "Contributing Spring Boot process types"
        );

        self.layers.write_application_metadata(
            &LaunchMetadata::with_processes(&PROCESS_TYPES, &command).with_slices(slices),
        )?;
        Ok(())
    }

    /// Plan entry carrying the application metadata and its JAR inventory.
    pub async fn plan(&self) -> Result<Plan, SpringBootError> {
        let mut plan = Plan::new(DEPENDENCY).with_metadata(&self.metadata)?;
        plan.insert("dependencies", &self.dependencies().await?)?;
        Ok(plan)
    }

    pub fn command(&self) -> String {
        format!("java -cp $CLASSPATH $JAVA_OPTS {}", self.metadata.start_class)
    }

    pub fn slices(&self) -> Result<Slices, SpringBootError> {
        Ok(Slicer::from_metadata(&self.metadata).slices(&self.application.root)?)
    }

    pub async fn dependencies(&self) -> Result<JarDependencies, SpringBootError> {
        Ok(jvm::scan(&self.application.root.join(&self.metadata.lib)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn build(manifest: &str) -> (TempDir, TempDir, Build) {
        let app = TempDir::new().unwrap();
        let layers = TempDir::new().unwrap();
        fs::create_dir_all(app.path().join("META-INF")).unwrap();
        fs::write(app.path().join("META-INF/MANIFEST.MF"), manifest).unwrap();

        let build = Build::new(
            Application::new(app.path()).unwrap(),
            Layers::new(layers.path()),
        );
        (app, layers, build)
    }

    #[test]
    fn test_not_applicable_without_version() {
        let (_app, _layers, build) = build("Start-Class: com.example.Application\n");
        assert!(SpringBoot::new(&build).unwrap().is_none());
    }

    #[test]
    fn test_malformed_manifest_errors() {
        let (_app, _layers, build) = build("Spring-Boot-Version: 2.2.2\n???\n");
        assert!(matches!(
            SpringBoot::new(&build),
            Err(SpringBootError::Metadata(_))
        ));
    }

    #[test]
    fn test_command() {
        let (_app, _layers, build) = build(
            "Spring-Boot-Version: 2.2.2.RELEASE\nStart-Class: com.example.Application\n",
        );
        let spring_boot = SpringBoot::new(&build).unwrap().unwrap();
        assert_eq!(
            spring_boot.command(),
            "java -cp $CLASSPATH $JAVA_OPTS com.example.Application"
        );
    }

    #[tokio::test]
    async fn test_plan_without_lib_directory() {
        let (_app, _layers, build) = build(
            "Spring-Boot-Version: 2.2.2.RELEASE\nSpring-Boot-Lib: BOOT-INF/lib/\n",
        );
        let spring_boot = SpringBoot::new(&build).unwrap().unwrap();

        let plan = spring_boot.plan().await.unwrap();
        assert_eq!(plan.name, DEPENDENCY);
        assert_eq!(plan.metadata["version"], "2.2.2.RELEASE");
        assert_eq!(plan.metadata["dependencies"], serde_json::json!([]));
    }
}
