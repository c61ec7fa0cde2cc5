//! chatsite - message backup static site generator CLI
//!
//! Main entry point for the chatsite command-line tool.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use chatsite::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match &cli.command {
        Commands::Build(args) => cmd_build(&cli, args),
        Commands::List(args) => cmd_list(args),
        Commands::Stats(args) => cmd_stats(args),
        Commands::Completions(args) => cmd_completions(args.clone()),
    }
}

fn cmd_build(cli: &Cli, args: &cli::BuildArgs) -> Result<()> {
    let start = Instant::now();
    let config = Config::load();
    if !config.output.colors {
        colored::control::set_override(false);
    }
    let quiet = cli.quiet || config.output.quiet;
    let out_dir = args.out.clone().unwrap_or_else(|| config.out_dir());

    if !quiet {
        println!("{}", "Building website from backup...".bold().cyan());
        println!("  Backup: {}", args.backup.display());
        println!("  Output: {}", out_dir.display());
        println!();
    }

    let parser = BackupParser::open(&args.backup)?;
    let conversations = parser.load_conversations()?;
    let renderer = SiteRenderer::create(&out_dir)?;

    if args.no_attachments {
        if !quiet {
            println!("  {} attachment copying skipped", "-".dimmed());
        }
    } else {
        let copied = renderer.copy_attachments(&parser.attachments_dir())?;
        if !quiet {
            println!("  {} {} attachments copied", "✓".green(), copied);
        }
    }

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(conversations.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("Creating chat pages...");

    // Each conversation renders independently; the index is the only step
    // needing every summary.
    let attachments_src = parser.attachments_dir();
    let summaries = conversations
        .par_iter()
        .map(|conversation| {
            let sequence = sequence_messages(conversation);
            let participant_names: Vec<String> =
                conversation.participants.values().cloned().collect();
            renderer.write_chat_page(
                &conversation.id,
                &conversation_name(conversation),
                &participant_names,
                &sequence,
                &attachments_src,
            )?;
            pb.inc(1);
            Ok(pipeline::summary_from_sequence(conversation, &sequence))
        })
        .collect::<chatsite::Result<Vec<_>>>()?;

    pb.finish_and_clear();
    if !quiet {
        println!("  {} {} chat pages created", "✓".green(), summaries.len());
    }

    let ordered = order_index(summaries);
    renderer.write_index(&ordered)?;
    renderer.write_assets()?;

    if !quiet {
        println!();
        println!(
            "{} in {:.2} seconds",
            "Website created successfully".bold().green(),
            start.elapsed().as_secs_f64()
        );
        println!(
            "Open {} in a browser to view it.",
            renderer.index_path().display().to_string().bold()
        );
    }

    if cli.verbose {
        for summary in &ordered {
            tracing::debug!(
                "chat {} '{}': {} messages",
                summary.id,
                summary.name,
                summary.message_count
            );
        }
    }

    Ok(())
}

fn cmd_list(args: &cli::ListArgs) -> Result<()> {
    let parser = BackupParser::open(&args.backup)?;
    let conversations = parser.load_conversations()?;

    let summaries: Vec<_> = conversations.iter().map(build_summary).collect();
    let ordered = order_index(summaries);
    let limit = args.limit.unwrap_or(ordered.len());

    for summary in ordered.iter().take(limit) {
        let date = summary
            .last_message_at
            .map_or_else(|| "no messages".to_string(), dates::format_date_time);
        println!(
            "{}  {}  {}",
            summary.name.bold(),
            format!("({} messages, {date})", summary.message_count).dimmed(),
            summary.preview
        );
    }

    Ok(())
}

fn cmd_stats(args: &cli::StatsArgs) -> Result<()> {
    let parser = BackupParser::open(&args.backup)?;
    let conversations = parser.load_conversations()?;
    let stats = backup_stats(&conversations);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Backup Statistics".bold().cyan());
    println!("{}", "─".repeat(40));
    println!("  {:<20} {:>10}", "Conversations:", stats.conversation_count);
    println!("  {:<20} {:>10}", "Messages:", stats.message_count);
    println!("  {:<20} {:>10}", "Attachments:", stats.attachment_count);
    println!(
        "  {:<20} {:>10}",
        "  of which images:", stats.image_attachment_count
    );
    println!("{}", "─".repeat(40));

    if let (Some(first), Some(last)) = (stats.first_message_at, stats.last_message_at) {
        println!(
            "  First message: {}",
            dates::format_date(first).green()
        );
        println!(
            "  Last message:  {}",
            dates::format_date(last).green()
        );
    }

    Ok(())
}

fn cmd_completions(args: cli::CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "chatsite", &mut io::stdout());
    Ok(())
}
