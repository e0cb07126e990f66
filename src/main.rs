use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use podshelf::{FeedError, Library, Podcast, ReqwestClient, fetch_feed, is_url, parse_feed_file};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "[-] ");
static BOOKMARK: Emoji<'_, '_> = Emoji("🔖 ", "[*] ");

/// Build and browse a podcast library from RSS feeds
#[derive(Parser, Debug)]
#[command(name = "podshelf")]
#[command(about = "Build and browse a podcast library from RSS feeds")]
#[command(version)]
struct Args {
    /// Path to the library snapshot file
    #[arg(short, long, default_value = "podshelf.json")]
    library: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch feeds and add them to the library
    Add {
        /// RSS feed URLs or paths to local RSS files
        feeds: Vec<String>,
    },
    /// List the podcasts in the library
    List,
    /// List the episodes of one podcast
    Episodes {
        /// Podcast title
        podcast: String,
    },
    /// Resolve an episode's audio URL and resume position
    Cue {
        /// Podcast title
        podcast: String,
        /// Episode title
        episode: String,
    },
    /// Record a playback position for an episode
    Mark {
        /// Podcast title
        podcast: String,
        /// Episode title
        episode: String,
        /// Position in seconds
        seconds: u64,
    },
}

async fn fetch_source(client: &ReqwestClient, source: &str) -> Result<Option<Podcast>, FeedError> {
    if is_url(source) {
        fetch_feed(client, source).await
    } else {
        parse_feed_file(Path::new(source))
    }
}

/// Fetch all sources concurrently and fold the usable ones into the library.
/// A bad feed is skipped with a notice; the rest proceed.
async fn add_feeds(library: &mut Library, feeds: &[String]) -> usize {
    let client = ReqwestClient::new();
    let results =
        futures::future::join_all(feeds.iter().map(|source| fetch_source(&client, source))).await;

    let mut added = 0;
    for (source, result) in feeds.iter().zip(results) {
        match result {
            Ok(Some(podcast)) => {
                println!(
                    "{SUCCESS}{} {} {} episodes",
                    podcast.title.bold().green(),
                    "•".dimmed(),
                    podcast.episodes().len().to_string().cyan()
                );
                library.insert(podcast);
                added += 1;
            }
            Ok(None) => {
                warn!(source = %source, "feed was empty");
                println!("{SKIP}{} {}", source.yellow(), "(empty feed, skipped)".dimmed());
            }
            Err(e) => {
                warn!(source = %source, error = %e, "feed skipped");
                println!("{SKIP}{} {}", source.yellow(), e.to_string().dimmed());
            }
        }
    }
    added
}

fn print_library(library: &Library) {
    if library.is_empty() {
        println!("{}", "Library is empty".dimmed());
        return;
    }
    for podcast in library.podcasts() {
        println!(
            "{HEADPHONES}{} {} {} episodes",
            podcast.title.bold(),
            "•".dimmed(),
            podcast.episodes().len().to_string().cyan()
        );
        if let Some(description) = &podcast.description {
            println!("   {}", description.dimmed());
        }
    }
}

fn print_episodes(library: &Library, title: &str) -> Result<()> {
    let Some(podcast) = library.get(title) else {
        bail!("Podcast '{title}' not found in library");
    };
    for episode in podcast.episodes() {
        let position = match episode.position {
            Some(pos) => format!(" (at {}s)", pos.as_secs()).yellow().to_string(),
            None => String::new(),
        };
        println!(
            "{:>4}  {}{}",
            (episode.index + 1).to_string().cyan(),
            episode.title,
            position
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut library = if args.library.exists() {
        Library::load(&args.library).context("Failed to load library snapshot")?
    } else {
        Library::new()
    };

    match args.command {
        Command::Add { feeds } => {
            if feeds.is_empty() {
                bail!("No feeds given");
            }
            println!(
                "\n{}{} {}\n",
                MICROPHONE,
                "podshelf".bold().magenta(),
                "- fetching feeds".dimmed()
            );
            let added = add_feeds(&mut library, &feeds).await;
            library
                .save(&args.library)
                .context("Failed to save library snapshot")?;
            println!(
                "\n{} {} of {} feeds added\n",
                "Done:".bold().green(),
                added.to_string().green(),
                feeds.len()
            );
        }

        Command::List => print_library(&library),

        Command::Episodes { podcast } => print_episodes(&library, &podcast)?,

        Command::Cue { podcast, episode } => {
            let cue = library
                .open_episode(&podcast, &episode)
                .context("Failed to resolve episode")?;
            println!("{HEADPHONES}{}", cue.url.to_string().cyan());
            if let Some(resume) = cue.resume_at {
                println!("{BOOKMARK}resume at {}s", resume.as_secs().to_string().yellow());
            }
        }

        Command::Mark {
            podcast,
            episode,
            seconds,
        } => {
            library
                .record_position(&podcast, &episode, Duration::from_secs(seconds))
                .context("Failed to record position")?;
            library
                .save(&args.library)
                .context("Failed to save library snapshot")?;
            println!(
                "{BOOKMARK}{} {} {}s",
                episode.bold(),
                "marked at".dimmed(),
                seconds.to_string().yellow()
            );
        }
    }

    Ok(())
}
