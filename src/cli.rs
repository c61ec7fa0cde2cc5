//! CLI definitions for chatsite.
//!
//! Uses clap for argument parsing with derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// chatsite - Turn a message backup into a static website
#[derive(Parser, Debug)]
#[command(name = "chatsite")]
#[command(version)]
#[command(about = "Static website generator for extracted message-backup archives")]
#[command(long_about = r#"
chatsite - Generate a static, browsable website from an extracted
message backup.

The backup source is a directory (or .zip archive) containing:
  chats/        one JSON document per conversation
  attachments/  the attachment files referenced by messages

The generated site has an index page listing conversations by recency
and one page per conversation with date dividers and inline attachment
previews.

Quick start:
  1. Extract your backup with the companion extractor tool
  2. Run: chatsite build /path/to/backup --out site
  3. Open site/index.html in a browser
"#)]
pub struct Cli {
    /// Be verbose (show debug info)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Be quiet (suppress non-error output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the static website from a backup
    Build(BuildArgs),

    /// List conversations in a backup, most recent first
    List(ListArgs),

    /// Show backup statistics
    Stats(StatsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the backup (directory or .zip archive)
    #[arg(env = "CHATSITE_BACKUP")]
    pub backup: PathBuf,

    /// Output directory for the generated site
    #[arg(long, short = 'o', env = "CHATSITE_OUT")]
    pub out: Option<PathBuf>,

    /// Skip copying attachment files (pages still link to them)
    #[arg(long)]
    pub no_attachments: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to the backup (directory or .zip archive)
    #[arg(env = "CHATSITE_BACKUP")]
    pub backup: PathBuf,

    /// Limit number of conversations shown
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Path to the backup (directory or .zip archive)
    #[arg(env = "CHATSITE_BACKUP")]
    pub backup: PathBuf,

    /// Emit statistics as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
