use super::commands::{BuildArgs, DetectArgs, PlanArgs};
use crate::build::{Application, Build};
use crate::config::BootpackConfig;
use crate::groovy::Command;
use crate::layers::Layers;
use crate::springboot::SpringBoot;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Exit code for "no detector applies".
pub const EXIT_NOT_APPLICABLE: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DetectionReport {
    pub spring_boot: bool,
    pub spring_boot_cli: bool,
}

impl DetectionReport {
    pub fn applies(&self) -> bool {
        self.spring_boot || self.spring_boot_cli
    }
}

pub async fn handle_detect(args: &DetectArgs) -> i32 {
    let build = match load_build(args.application_path.clone(), None) {
        Ok(build) => build,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return 1;
        }
    };

    let report = match detect(&build) {
        Ok(report) => report,
        Err(e) => {
            error!("Detection failed: {:#}", e);
            return 1;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to format detection output: {}", e);
            return 1;
        }
    }

    if report.applies() {
        0
    } else {
        EXIT_NOT_APPLICABLE
    }
}

pub async fn handle_build(args: &BuildArgs) -> i32 {
    let build = match load_build(args.application_path.clone(), args.layers.clone()) {
        Ok(build) => build,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return 1;
        }
    };

    match contribute(&build).await {
        Ok(true) => 0,
        Ok(false) => {
            warn!(app = %build.application.root.display(), "No detector applies");
            EXIT_NOT_APPLICABLE
        }
        Err(e) => {
            error!("Build failed: {:#}", e);
            1
        }
    }
}

pub async fn handle_plan(args: &PlanArgs) -> i32 {
    let build = match load_build(args.application_path.clone(), None) {
        Ok(build) => build,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return 1;
        }
    };

    let spring_boot = match SpringBoot::new(&build) {
        Ok(Some(spring_boot)) => spring_boot,
        Ok(None) => {
            warn!("Not a Spring Boot application");
            return EXIT_NOT_APPLICABLE;
        }
        Err(e) => {
            error!("Detection failed: {}", e);
            return 1;
        }
    };

    let output = match spring_boot.plan().await {
        Ok(plan) => match serde_json::to_string_pretty(&plan) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to format plan: {}", e);
                return 1;
            }
        },
        Err(e) => {
            error!("Failed to build plan: {}", e);
            return 1;
        }
    };

    if let Some(path) = &args.output {
        if let Err(e) = fs::write(path, &output) {
            error!("Failed to write output to file {}: {}", path.display(), e);
            return 1;
        }
        info!("Plan written to {}", path.display());
    } else {
        println!("{}", output);
    }

    0
}

/// Runs both detectors without contributing anything.
pub fn detect(build: &Build) -> Result<DetectionReport> {
    let spring_boot = SpringBoot::new(build)
        .context("Failed to detect Spring Boot application")?
        .is_some();
    let spring_boot_cli = Command::new(build)
        .context("Failed to detect Spring Boot CLI application")?
        .is_some();

    Ok(DetectionReport {
        spring_boot,
        spring_boot_cli,
    })
}

/// Contributes the compiled application when it applies, otherwise the CLI
/// command. Returns `false` when neither applies.
pub async fn contribute(build: &Build) -> Result<bool> {
    if let Some(spring_boot) =
        SpringBoot::new(build).context("Failed to detect Spring Boot application")?
    {
        spring_boot
            .contribute()
            .await
            .context("Failed to contribute Spring Boot application")?;
        return Ok(true);
    }

    if let Some(command) =
        Command::new(build).context("Failed to detect Spring Boot CLI application")?
    {
        command
            .contribute()
            .context("Failed to contribute Spring Boot CLI command")?;
        return Ok(true);
    }

    Ok(false)
}

fn load_build(application_path: Option<PathBuf>, layers: Option<PathBuf>) -> Result<Build> {
    let mut config = BootpackConfig::default();
    if let Some(path) = application_path {
        config = config.with_app_dir(path);
    }
    if let Some(layers) = layers {
        config = config.with_layers_dir(layers);
    }
    config.validate()?;

    let application = Application::new(&config.app_dir).with_context(|| {
        format!(
            "Application path is not a readable directory: {}",
            config.app_dir.display()
        )
    })?;

    Ok(Build::new(application, Layers::new(config.layers_dir)))
}
