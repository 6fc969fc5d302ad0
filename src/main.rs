//! `media-access` CLI - Open locators through the access layer

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::FmtSubscriber;

use media_access::control::{Control, ControlReply};
use media_access::stream::ItemKind;
use media_access::{config, Opener, Registry, Stream};

#[derive(Parser)]
#[command(name = "media-access")]
#[command(about = "Open media locators through pluggable access backends")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.config/media-access/access.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which backend serves a locator and what it can do
    Probe {
        /// Locator, e.g. file:///path/to/media.ts
        locator: String,
    },

    /// Copy a stream to stdout
    Cat {
        /// Locator to read
        locator: String,

        /// Seek to this byte offset first
        #[arg(short, long)]
        offset: Option<u64>,
    },

    /// List directory entries
    Ls {
        /// Directory locator
        locator: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let config = config::load(cli.config.as_deref())?;
    let opener = Opener::new(Registry::with_builtin()).with_config(config);

    match cli.command {
        Commands::Probe { locator } => cmd_probe(&opener, &locator)?,
        Commands::Cat { locator, offset } => cmd_cat(&opener, &locator, offset)?,
        Commands::Ls { locator } => cmd_ls(&opener, &locator)?,
    }

    Ok(())
}

fn cmd_probe(opener: &Opener, locator: &str) -> Result<()> {
    let mut stream = opener
        .open_raw(locator)
        .with_context(|| format!("cannot open {locator}"))?;

    {
        let access = stream.access();
        println!("module:    {}", access.module());
        println!("scheme:    {}", access.scheme());
        println!("location:  {}", access.location());
        println!(
            "path:      {}",
            access
                .path()
                .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
        );
    }

    let strategy = stream.strategy();
    println!("read:      {strategy:?}");
    println!("directory: {:?}", stream.dir_strategy());
    println!(
        "recipe:    {}",
        opener.config().recipe_for(strategy).unwrap_or("(none)")
    );

    for (label, query) in [
        ("seekable", Control::CanSeek),
        ("pausable", Control::CanPause),
        ("size", Control::GetSize),
        ("pts delay", Control::GetPtsDelay),
    ] {
        println!("{:<10} {}", format!("{label}:"), describe(stream.control(query)));
    }

    Ok(())
}

fn describe(reply: media_access::Result<ControlReply>) -> String {
    match reply {
        Ok(ControlReply::Flag(value)) => value.to_string(),
        Ok(ControlReply::Size(size)) => format!("{size} bytes"),
        Ok(ControlReply::PtsDelay(delay)) => format!("{} ms", delay.as_millis()),
        Ok(other) => format!("{other:?}"),
        Err(err) => format!("- ({err})"),
    }
}

fn cmd_cat(opener: &Opener, locator: &str, offset: Option<u64>) -> Result<()> {
    let mut stream = opener
        .open(locator)
        .with_context(|| format!("cannot open {locator}"))?;

    if let Some(offset) = offset {
        stream
            .seek(offset)
            .with_context(|| format!("cannot seek {locator} to {offset}"))?;
    }

    let mut out = io::stdout().lock();
    io::copy(&mut stream, &mut out).with_context(|| format!("failed reading {locator}"))?;

    Ok(())
}

fn cmd_ls(opener: &Opener, locator: &str) -> Result<()> {
    let mut stream = opener
        .open(locator)
        .with_context(|| format!("cannot open {locator}"))?;

    while let Some(item) = stream.read_dir() {
        let kind = match item.kind {
            ItemKind::Directory => "dir",
            ItemKind::File => "file",
            ItemKind::Unknown => "?",
        };
        println!("{kind}\t{}\t{}", item.name, item.uri);
    }

    Ok(())
}
