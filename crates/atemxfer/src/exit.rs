use std::fmt;
use std::io;

use atemxfer_transfer::TransferError;
use atemxfer_wire::WireError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn wire_error(context: &str, err: WireError) -> CliError {
    let code = match err {
        WireError::InvalidTitle(_) => USAGE,
        _ => DATA_INVALID,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transfer_error(context: &str, err: TransferError) -> CliError {
    match err {
        TransferError::Wire(err) => wire_error(context, err),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

/// Parse hex input, tolerating whitespace, `:` separators and a `0x` prefix.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&digits).map_err(|err| CliError::new(USAGE, format!("invalid hex input: {err}")))
}
