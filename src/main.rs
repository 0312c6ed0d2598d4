use bootpack::cli::commands::{CliArgs, Commands};
use bootpack::cli::handlers::{handle_build, handle_detect, handle_plan};
use bootpack::util::logging::{init_logging, parse_level, LoggingConfig};
use bootpack::{BootpackConfig, VERSION};

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("bootpack v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args).await,
        Commands::Build(build_args) => handle_build(build_args).await,
        Commands::Plan(plan_args) => handle_plan(plan_args).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let config = BootpackConfig::default();

    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    init_logging(LoggingConfig {
        level,
        use_json: config.log_json,
        ..LoggingConfig::default()
    });
}
