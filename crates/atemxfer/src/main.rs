mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "atemxfer",
    version,
    about = "Inspect and build ATEM transfer commands"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from(["atemxfer", "decode", "FTDC", "00070000"])
            .expect("decode args should parse");
        assert!(matches!(cli.command, Command::Decode(_)));
    }

    #[test]
    fn parses_chunk_subcommand() {
        let cli = Cli::try_parse_from([
            "atemxfer",
            "--format",
            "json",
            "chunk",
            "/tmp/still.rgba",
            "--transfer-id",
            "3",
            "--chunk-size",
            "1396",
            "--mode",
            "write2",
        ])
        .expect("chunk args should parse");
        assert!(matches!(cli.command, Command::Chunk(_)));
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }

    #[test]
    fn rejects_out_of_range_transfer_id() {
        let err = Cli::try_parse_from([
            "atemxfer",
            "chunk",
            "/tmp/still.rgba",
            "--transfer-id",
            "70000",
        ])
        .expect_err("transfer id must fit u16");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn log_level_is_global() {
        let cli = Cli::try_parse_from(["atemxfer", "catalog", "--log-level", "debug"])
            .expect("global flags should parse after subcommand");
        assert!(matches!(cli.log_level, LogLevel::Debug));
    }
}
