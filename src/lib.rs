//! bootpack - build-time detection and layer slicing for Spring Boot
//!
//! Two detectors inspect an application directory:
//!
//! - [`springboot::SpringBoot`] applies to compiled applications whose
//!   `META-INF/MANIFEST.MF` carries `Spring-Boot-Version`. It contributes a
//!   `CLASSPATH` layer, partitions the application into five slices and
//!   inventories the JARs in the library directory.
//! - [`groovy::Command`] applies to Spring Boot CLI applications: Groovy
//!   scripts declaring a class or a `beans { }` block. It contributes the
//!   `GROOVY_FILES` launch variable.
//!
//! Both write their processes to `launch.toml` in the layers directory.
//!
//! # Example Usage
//!
//! ```no_run
//! use bootpack::{Application, Build, Layers, SpringBoot};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let build = Build::new(Application::new("/workspace")?, Layers::new("/layers"));
//!
//! if let Some(spring_boot) = SpringBoot::new(&build)? {
//!     spring_boot.contribute().await?;
//!     let plan = spring_boot.plan().await?;
//!     println!("{}", serde_json::to_string_pretty(&plan)?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod build;
pub mod cli;
pub mod config;
pub mod groovy;
pub mod jvm;
pub mod layers;
pub mod plan;
pub mod springboot;
pub mod util;

pub use build::{Application, Build};
pub use config::{BootpackConfig, ConfigError};
pub use groovy::{Command, CommandError, GroovyFileKind};
pub use jvm::{ApplicationMetadata, JarDependencies, JarDependency, ScanError};
pub use layers::{LaunchMetadata, Layer, LayerError, LayerFlags, Layers, Process, Slice, Slices};
pub use plan::Plan;
pub use springboot::{SliceKind, Slicer, SpringBoot, SpringBootError};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
