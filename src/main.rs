use clap::Parser;
use tracing_subscriber::EnvFilter;

use tap_assist::cli::commands::{cmd_resolve, cmd_serve, cmd_simplify, cmd_voice};
use tap_assist::cli::config::{Cli, Commands, load_config};
use tap_assist::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref());
    // Resolve trace path: CLI > config
    let trace_path = cli.trace.as_deref().unwrap_or(&config.trace.path);
    let tracer = TraceLogger::new(trace_path);

    match cli.command {
        Commands::Resolve {
            surface,
            action,
            keywords,
            type_hint,
            threshold,
        } => {
            let found = cmd_resolve(
                &config,
                &surface,
                &action,
                &keywords,
                type_hint.as_deref(),
                threshold,
                &tracer,
            )?;
            if !found {
                std::process::exit(1);
            }
        }
        Commands::Voice { transcript, actions } => {
            if !cmd_voice(&transcript, &actions)? {
                std::process::exit(1);
            }
        }
        Commands::Serve { ack_delay_ms } => {
            cmd_serve(&config, ack_delay_ms, &tracer)?;
        }
        Commands::Simplify {
            image,
            mock,
            endpoint,
        } => {
            cmd_simplify(&config, &image, mock, endpoint.as_deref())?;
        }
    }

    Ok(())
}

// Logs go to stderr; stdout carries command output and the serve protocol.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
