//! Command-line entry point.
//!
//! # Responsibility
//! - Load configuration, start logging and open a session.
//! - Expose read-only contact/note queries for quick local checks.

use clap::{Parser, Subcommand};
use log::error;
use pim_core::{default_log_level, init_logging, PimConfig, PimSession, Record};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "pim", version, about = "Personal information manager")]
struct Cli {
    /// Path to pim.toml.
    #[arg(long, short, default_value = "pim.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage info.
    Ping,
    /// List today's and upcoming birthdays.
    Birthdays {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Find contacts by `%FIELD%value` tokens (any token may match).
    Find {
        #[arg(required = true)]
        tokens: Vec<String>,
    },
    /// Find notes carrying any of the tags.
    Tags {
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Find notes containing any of the words.
    Keywords {
        #[arg(required = true)]
        words: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Ping = cli.command {
        println!("pim_core ping={}", pim_core::ping());
        println!("pim_core version={}", pim_core::core_version());
        return Ok(());
    }

    let config = PimConfig::load(&cli.config).map_err(|err| err.to_string())?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        let level = config.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| err.to_string())?;
    }
    let session = PimSession::open(&config).map_err(|err| err.to_string())?;

    match cli.command {
        Command::Ping => {}
        Command::Birthdays { days } => {
            print_records("today", &session.contacts.today());
            print_records(&format!("next {days} days"), &session.contacts.upcoming(days));
        }
        Command::Find { tokens } => {
            let found = session
                .contacts
                .find(&tokens)
                .map_err(|err| err.to_string())?;
            print_records("found", &found);
        }
        Command::Tags { tags } => {
            for note in session.notes.find_by_tags(&tags) {
                println!("{note}");
            }
        }
        Command::Keywords { words } => {
            for note in session.notes.find_by_keyword(&words) {
                println!("{note}");
            }
        }
    }
    Ok(())
}

fn print_records(title: &str, records: &[&Record]) {
    println!("{title}: {}", records.len());
    for record in records {
        println!("  {:>4}  {}", record.id, record.search_str());
    }
}
