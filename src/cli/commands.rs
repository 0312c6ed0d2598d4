use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build-time detector and layer slicer for Spring Boot applications
#[derive(Parser, Debug)]
#[command(
    name = "bootpack",
    about = "Build-time detector and layer slicer for Spring Boot applications",
    version,
    author,
    long_about = "bootpack inspects a compiled Spring Boot application or a directory of \
                  Spring Boot CLI Groovy scripts, decides whether it applies, and contributes \
                  the classpath layer, the layer slices and the launch processes."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Report which detectors apply to an application",
        long_about = "Checks the application manifest for Spring-Boot-Version and scans for \
                      Spring Boot CLI Groovy files. Exits 0 when at least one detector \
                      applies and 100 when none does.\n\n\
                      Examples:\n  \
                      bootpack detect\n  \
                      bootpack detect /workspace"
    )]
    Detect(DetectArgs),

    #[command(
        about = "Contribute layers and launch metadata",
        long_about = "Runs the applicable contributor and writes its layers and launch.toml \
                      into the layers directory.\n\n\
                      Examples:\n  \
                      bootpack build /workspace --layers /layers"
    )]
    Build(BuildArgs),

    #[command(
        about = "Print the build plan entry as JSON",
        long_about = "Prints the Spring Boot plan entry, including the full JAR dependency \
                      inventory, as JSON on stdout."
    )]
    Plan(PlanArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to application (defaults to BOOTPACK_APP_DIR or the current directory)"
    )]
    pub application_path: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to application (defaults to BOOTPACK_APP_DIR or the current directory)"
    )]
    pub application_path: Option<PathBuf>,

    #[arg(
        short = 'l',
        long,
        value_name = "DIR",
        help = "Layers directory (defaults to BOOTPACK_LAYERS_DIR or ./layers)"
    )]
    pub layers: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to application (defaults to BOOTPACK_APP_DIR or the current directory)"
    )]
    pub application_path: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_detect_defaults() {
        let args = CliArgs::parse_from(["bootpack", "detect"]);
        match args.command {
            Commands::Detect(detect_args) => assert!(detect_args.application_path.is_none()),
            _ => panic!("Expected Detect command"),
        }
        assert!(!args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_build_with_layers() {
        let args = CliArgs::parse_from(["bootpack", "build", "/workspace", "--layers", "/layers"]);
        match args.command {
            Commands::Build(build_args) => {
                assert_eq!(build_args.application_path, Some(PathBuf::from("/workspace")));
                assert_eq!(build_args.layers, Some(PathBuf::from("/layers")));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_plan_output() {
        let args = CliArgs::parse_from(["bootpack", "plan", "-o", "plan.json", "--log-level", "debug"]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        match args.command {
            Commands::Plan(plan_args) => {
                assert_eq!(plan_args.output, Some(PathBuf::from("plan.json")))
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["bootpack", "-v", "-q", "detect"]).is_err());
    }
}
