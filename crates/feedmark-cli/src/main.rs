use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, Offset, Utc};
use clap::{Parser, Subcommand};
use feedmark_core::{
    Archive, ComposeOptions, ConvertOptions, DigestOptions, FeedSource, UnterminatedLinks,
    convert_with_options, digest, parse_channel,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "feedmark", version, about = "Turns feed markup into chat-ready text")]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a markup fragment to inline text.
    Convert {
        /// Fragment file; stdin when omitted or `-`.
        input: Option<PathBuf>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,

        /// Render links left open at end of input instead of dropping them.
        #[arg(long)]
        flush_unterminated: bool,
    },
    /// Print webhook messages for feed items not yet in the archive.
    Digest {
        /// RSS document; stdin when omitted or `-`.
        feed: Option<PathBuf>,

        /// File of already handled item GUIDs.
        #[arg(long, value_name = "FILE", default_value = "feed.txt")]
        archive: PathBuf,

        /// Announce items even when the archive is empty.
        #[arg(long)]
        force_old: bool,

        /// Attach the converted item description.
        #[arg(long)]
        summary: bool,

        /// Show dates in UTC instead of local time.
        #[arg(long)]
        utc: bool,
    },
    /// Print the RSS URL of a Steam app or group.
    Source {
        #[command(subcommand)]
        kind: SourceKind,
    },
}

#[derive(Debug, Subcommand)]
enum SourceKind {
    App { appid: String },
    Group { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Convert {
            input,
            json,
            flush_unterminated,
        } => run_convert(input.as_deref(), json, flush_unterminated),
        Command::Digest {
            feed,
            archive,
            force_old,
            summary,
            utc,
        } => {
            let options = DigestOptions {
                compose: ComposeOptions {
                    summary,
                    ..ComposeOptions::default()
                },
                force_old,
                display_offset: Some(if utc {
                    Utc.fix()
                } else {
                    Local::now().offset().fix()
                }),
            };
            run_digest(feed.as_deref(), &archive, &options)
        }
        Command::Source { kind } => {
            let source = match kind {
                SourceKind::App { appid } => FeedSource::App(appid),
                SourceKind::Group { name } => FeedSource::Group(name),
            };
            println!("{}", source.url());
            Ok(())
        }
    }
}

fn run_convert(input: Option<&Path>, json: bool, flush_unterminated: bool) -> Result<()> {
    let fragment = read_input(input)?;
    let options = ConvertOptions {
        unterminated_links: if flush_unterminated {
            UnterminatedLinks::Flush
        } else {
            UnterminatedLinks::Discard
        },
    };
    let conversion = convert_with_options(&fragment, &options);

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer(&mut stdout, &conversion)?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{}", conversion.text)?;
        for link in &conversion.bare_links {
            writeln!(stdout, "{link}")?;
        }
    }
    Ok(())
}

fn run_digest(feed: Option<&Path>, archive: &Path, options: &DigestOptions) -> Result<()> {
    let xml = read_input(feed)?;
    let channel = parse_channel(&xml).context("failed to parse feed")?;
    let mut archive = Archive::load(archive)?;
    info!(
        channel = %channel.title,
        archive = %archive.path().display(),
        archived = archive.len(),
        "digesting feed"
    );

    let mut stdout = io::stdout().lock();
    let delivered = digest(&channel, &mut archive, options, |message| -> Result<()> {
        serde_json::to_writer(&mut stdout, &message)?;
        writeln!(stdout)?;
        stdout.flush()?;
        Ok(())
    })?;
    info!(delivered, "digest written");
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}
