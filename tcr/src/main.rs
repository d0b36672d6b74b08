use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tcr::exit_codes;
use tcr::io::init::{InitOptions, init_workspace};
use tcr::replay::{ReplayOptions, ReplayRecord, replay_from_root, validate_workspace};

#[derive(Parser)]
#[command(
    name = "tcr",
    version,
    about = "Test && Commit || Revert policy engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.tcr/config.toml` and an example event script.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Check the workspace config and, optionally, an event script.
    Validate {
        /// Config file to check instead of `.tcr/config.toml`.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Event script to check.
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Replay an event script and print the host requests as JSON lines.
    Replay {
        /// JSON-lines event script.
        script: PathBuf,
        /// Config file to use instead of `.tcr/config.toml`.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also print countdown display updates.
        #[arg(long)]
        countdown: bool,
    },
}

fn main() {
    tcr::logging::init();
    let code = match run() {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = Path::new(".");
    match cli.command {
        Command::Init { force } => {
            init_workspace(root, &InitOptions { force })?;
            Ok(())
        }
        Command::Validate { config, script } => {
            validate_workspace(root, config.as_deref(), script.as_deref())?;
            Ok(())
        }
        Command::Replay {
            script,
            config,
            countdown,
        } => {
            let records = replay_from_root(
                root,
                &script,
                config.as_deref(),
                &ReplayOptions { countdown },
            )?;
            print_records(&records)
        }
    }
}

fn print_records(records: &[ReplayRecord]) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for record in records {
        serde_json::to_writer(&mut out, record).context("serialize record")?;
        out.write_all(b"\n").context("write stdout")?;
    }
    out.flush().context("flush stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::parse_from(["tcr", "init"]);
        assert!(matches!(cli.command, Command::Init { force: false }));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["tcr", "init", "--force"]);
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn parse_replay_with_options() {
        let cli = Cli::parse_from([
            "tcr",
            "replay",
            "events.jsonl",
            "--config",
            "alt.toml",
            "--countdown",
        ]);
        let Command::Replay {
            script,
            config,
            countdown,
        } = cli.command
        else {
            panic!("expected replay");
        };
        assert_eq!(script, PathBuf::from("events.jsonl"));
        assert_eq!(config, Some(PathBuf::from("alt.toml")));
        assert!(countdown);
    }

    #[test]
    fn parse_validate_defaults() {
        let cli = Cli::parse_from(["tcr", "validate"]);
        assert!(matches!(
            cli.command,
            Command::Validate {
                config: None,
                script: None
            }
        ));
    }
}
