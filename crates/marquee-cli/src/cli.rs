use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use marquee_core::models::EntryKind;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about = "Edit JSON movie, series and channel catalogs")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every entry ordered by id
    List {
        /// Catalog file, or `-` for stdin
        file: PathBuf,
    },

    /// Print one entry as JSON
    Show {
        file: PathBuf,
        #[command(flatten)]
        target: Target,
    },

    /// Add a new entry and export the catalog
    Add {
        file: PathBuf,

        /// movie, series or channel
        #[arg(long)]
        kind: EntryKind,

        #[command(flatten)]
        fields: FieldArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Edit an existing entry and export the catalog
    Edit {
        file: PathBuf,

        #[command(flatten)]
        target: Target,

        #[command(flatten)]
        fields: FieldArgs,

        /// Remove the source at this position (as shown by `show`)
        #[arg(long = "remove-source", value_name = "INDEX")]
        remove_sources: Vec<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete an entry and export the catalog
    Delete {
        file: PathBuf,

        #[command(flatten)]
        target: Target,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Preview what TMDb enrichment would fill in
    Enrich {
        /// TMDb id
        #[arg(long)]
        tmdb: u64,

        /// Declared kind; omit to try movie, then series
        #[arg(long)]
        kind: Option<EntryKind>,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Re-export a catalog with missing collections filled in
    Export {
        file: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write the default config to the config file (or `--config` path)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective config
    Show,
}

#[derive(Args)]
pub struct Target {
    /// Entry id
    #[arg(long, allow_negative_numbers = true)]
    pub id: i64,

    /// movie, series or channel
    #[arg(long)]
    pub kind: EntryKind,
}

/// Form field overrides. Only the flags given replace loaded values.
#[derive(Args, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub title: Option<String>,

    /// Movies and series only
    #[arg(long)]
    pub year: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub image: Option<String>,

    /// Movies and series only
    #[arg(long)]
    pub cover: Option<String>,

    /// Trailer URL; an empty value clears it (movies and series only)
    #[arg(long)]
    pub trailer: Option<String>,

    /// Channels only
    #[arg(long)]
    pub rating: Option<String>,

    /// Live stream URL; an empty value clears it (channels only)
    #[arg(long)]
    pub stream_url: Option<String>,

    /// Append a source, as `URL` or `NAME=URL` (movies and series only)
    #[arg(long = "source", value_name = "NAME=URL")]
    pub sources: Vec<String>,

    /// Fill fields from TMDb before applying the other flags
    #[arg(long)]
    pub tmdb: Option<u64>,
}

#[derive(Args)]
pub struct OutputArgs {
    /// Where to write the edited catalog (defaults to export.file_name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
