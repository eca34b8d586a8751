//! Trusted Server CLI for VAST extensions.
//!
//! This tool provides commands for:
//! - Re-encoding `<Extension>` / `<Extensions>` XML in canonical form
//! - Inspecting decoded extensions as JSON
//! - Encoding extensions from their JSON form

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use trusted_server_vast::logging::init_logger;
use trusted_server_vast::settings::Settings;

mod commands;
mod error;
mod input;

use error::CliError;

#[derive(Parser)]
#[command(name = "tsvast")]
#[command(about = "Trusted Server CLI for VAST extensions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a settings TOML file (defaults to the built-in settings)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode XML and print it back in canonical form
    Roundtrip(InputArgs),

    /// Decode XML and print the result as JSON
    Inspect(InputArgs),

    /// Read the JSON form and print it as XML
    Encode(InputArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Input file (reads stdin when omitted)
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Treat the input as an <Extensions> list instead of a single <Extension>
    #[arg(long)]
    list: bool,
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_settings(config: Option<&Path>) -> Result<Settings, CliError> {
    let settings = match config {
        Some(path) => Settings::from_toml(&fs::read_to_string(path)?)?,
        None => Settings::new()?,
    };
    Ok(settings)
}

fn run(cli: Cli) -> Result<String, CliError> {
    let settings = load_settings(cli.config.as_deref())?;

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        settings.logging.level_filter()?
    };
    init_logger(level)?;

    let (Commands::Roundtrip(args) | Commands::Inspect(args) | Commands::Encode(args)) =
        &cli.command;

    let content = input::read_input(args.file.as_deref(), settings.limits.max_input_bytes)?;
    log::debug!("Read {} bytes of input", content.len());

    match &cli.command {
        Commands::Roundtrip(_) => commands::roundtrip(&content, args.list),
        Commands::Inspect(_) => commands::inspect(&content, args.list),
        Commands::Encode(_) => commands::encode(&content, args.list),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inspect_list() {
        let cli = Cli::parse_from(["tsvast", "inspect", "--file", "ext.xml", "--list", "-v"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Inspect(args) => {
                assert_eq!(args.file, Some(PathBuf::from("ext.xml")));
                assert!(args.list);
            }
            _ => unreachable!("expected inspect"),
        }
    }

    #[test]
    fn test_load_settings_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"warn\"\n\n[limits]\nmax_input_bytes = 16").unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.limits.max_input_bytes, 16);

        let missing = Path::new("/nonexistent/tsvast.toml");
        assert!(matches!(load_settings(Some(missing)), Err(CliError::Io(_))));
    }
}
