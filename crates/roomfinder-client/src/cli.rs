//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// roomfinder - Find and book a free meeting room
#[derive(Debug, Parser)]
#[command(name = "roomfinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ROOMFINDER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Graph access token, overrides graph.access_token
    #[arg(long, env = "ROOMFINDER_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// IANA timezone for --date and --start, overrides the configured one
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find a free room among the candidates
    Find(FindArgs),

    /// Book a given room
    Book(BookArgs),

    /// Show how busy a room is
    Schedule(ScheduleArgs),

    /// List the calendars visible to the token
    Calendars,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// When the meeting starts. Both omitted means now.
#[derive(Debug, Clone, Default, Args)]
pub struct WhenArgs {
    /// Local date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,

    /// Local start time (HH:MM)
    #[arg(long)]
    pub start: Option<String>,
}

#[derive(Debug, Args)]
pub struct FindArgs {
    #[command(flatten)]
    pub when: WhenArgs,

    /// Meeting length: minutes or ISO-8601 (PT30M, PT1H15M)
    #[arg(long)]
    pub duration: String,

    /// Candidate room name (can be repeated), overrides rooms.candidates
    #[arg(long = "room", action = clap::ArgAction::Append)]
    pub rooms: Vec<String>,

    /// Book the room that was found
    #[arg(long)]
    pub book: bool,
}

#[derive(Debug, Args)]
pub struct BookArgs {
    /// Address of the room mailbox
    #[arg(long)]
    pub room_address: String,

    /// Display name of the room
    #[arg(long)]
    pub room_name: String,

    #[command(flatten)]
    pub when: WhenArgs,

    /// Meeting length: minutes or ISO-8601 (PT30M, PT1H15M)
    #[arg(long)]
    pub duration: String,
}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    /// Address of the room mailbox
    #[arg(long)]
    pub room_address: String,

    #[command(flatten)]
    pub when: WhenArgs,

    /// Length of the checked window; without it and --start the whole day
    /// is checked
    #[arg(long)]
    pub duration: Option<String>,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
