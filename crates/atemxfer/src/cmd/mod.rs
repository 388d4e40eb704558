use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use atemxfer_transfer::TransferMode;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod catalog;
pub mod chunk;
pub mod decode;
pub mod unframe;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode one title-stripped payload.
    Decode(DecodeArgs),
    /// Split a buffer of framed commands and decode each one.
    Unframe(UnframeArgs),
    /// List the known message titles and their layouts.
    Catalog(CatalogArgs),
    /// Build the commands that upload a file.
    Chunk(ChunkArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Unframe(args) => unframe::run(args, format),
        Command::Catalog(args) => catalog::run(args, format),
        Command::Chunk(args) => chunk::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Four-character title, e.g. FTSD.
    pub title: String,
    /// Payload bytes as hex (whitespace and ':' ignored).
    pub hex: String,
    /// Reject chunk requests whose magic values differ from the standard ones.
    #[arg(long)]
    pub strict_magic: bool,
}

#[derive(Args, Debug)]
pub struct UnframeArgs {
    /// Framed commands as hex.
    pub hex: String,
    /// Fail on titles outside the transfer family instead of skipping them.
    #[arg(long)]
    pub strict: bool,
    /// Largest accepted command, header included.
    #[arg(long, default_value_t = atemxfer_wire::DEFAULT_MAX_COMMAND)]
    pub max_command_size: usize,
}

#[derive(Args, Debug, Default)]
pub struct CatalogArgs {}

#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// File to upload.
    pub file: PathBuf,
    /// Transfer ID correlating every command of the upload.
    #[arg(long, default_value = "0")]
    pub transfer_id: u16,
    /// Destination store.
    #[arg(long, default_value = "0")]
    pub store: u16,
    /// Frame (slot) inside the store.
    #[arg(long, default_value = "0")]
    pub frame: u16,
    /// What the device should do with the data.
    #[arg(long, value_enum, default_value = "write")]
    pub mode: ModeArg,
    /// Maximum bytes per chunk.
    #[arg(long, default_value = "1396")]
    pub chunk_size: u16,
    /// Chunks in the batch.
    #[arg(long, default_value = "20")]
    pub chunk_count: u16,
    /// Asset name; adds a file description command.
    #[arg(long)]
    pub name: Option<String>,
    /// Asset description (requires --name).
    #[arg(long, requires = "name")]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ModeArg {
    NoOperation,
    Write,
    Clear,
    Write2,
    Clear2,
    WriteInputLabel,
}

impl From<ModeArg> for TransferMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::NoOperation => TransferMode::NoOperation,
            ModeArg::Write => TransferMode::Write,
            ModeArg::Clear => TransferMode::Clear,
            ModeArg::Write2 => TransferMode::Write2,
            ModeArg::Clear2 => TransferMode::Clear2,
            ModeArg::WriteInputLabel => TransferMode::WriteInputLabel,
        }
    }
}
