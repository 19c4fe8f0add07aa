//! Lingosite CLI
//!
//! Binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Lingosite.
#[derive(Parser)]
#[command(
    name = "lingosite",
    version,
    about = "Multilingual sitemaps, robots.txt and OpenGraph cards"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "lingosite.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Serve sitemap, robots.txt, OpenGraph cards and the newsletter action
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
    },
    /// Write the static artifacts to the output directory
    Build {
        /// Output directory (overrides build.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include draft entries
        #[arg(long)]
        drafts: bool,
        /// Override site origin (e.g., https://example.com)
        #[arg(long)]
        origin: Option<String>,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    lingosite::init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve { port, host } => {
            lingosite::cmd::serve::run(&cli.config, host.as_deref(), port).await?;
        }
        Commands::Build {
            output,
            drafts,
            origin,
        } => {
            lingosite::cmd::build::run(&cli.config, output.as_deref(), drafts, origin.as_deref())
                .await?;
        }
        Commands::Check { strict } => {
            lingosite::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_serve_command_parsing() {
        let args = ["lingosite", "serve", "--port", "8080", "--host", "0.0.0.0"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, PathBuf::from("lingosite.toml"));
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(8080));
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_serve_defaults_to_config() {
        let cli = Cli::parse_from(["lingosite", "serve"]);
        match cli.command {
            Commands::Serve { port, host } => {
                assert!(port.is_none());
                assert!(host.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_build_command_parsing() {
        let args = [
            "lingosite",
            "build",
            "--output",
            "dist",
            "--drafts",
            "--origin",
            "https://example.com",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build {
                output,
                drafts,
                origin,
            } => {
                assert_eq!(output, Some(PathBuf::from("dist")));
                assert!(drafts);
                assert_eq!(origin.as_deref(), Some("https://example.com"));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let cli = Cli::parse_from(["lingosite", "check", "--strict"]);
        match cli.command {
            Commands::Check { strict } => assert!(strict),
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_and_config() {
        let cli = Cli::parse_from(["lingosite", "-vvv", "--config", "site.toml", "check"]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
    }
}
