//! Four-character command titles.
//!
//! Every command on the wire is tagged with a 4-byte ASCII title (`FTSD`,
//! `LOCK`, ...). Titles are only used for routing; they never appear inside a
//! message payload.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WireError};

/// Size of a title on the wire.
pub const TITLE_SIZE: usize = 4;

/// A 4-byte ASCII command title.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Title([u8; TITLE_SIZE]);

impl Title {
    /// Build a title from a byte literal, e.g. `Title::new(b"FTSD")`.
    pub const fn new(bytes: &[u8; TITLE_SIZE]) -> Self {
        Self(*bytes)
    }

    /// Parse a title from text, requiring exactly four printable ASCII characters.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes()).map_err(|_| WireError::InvalidTitle(text.to_string()))
    }

    /// Read a title from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let array: [u8; TITLE_SIZE] = bytes
            .try_into()
            .map_err(|_| WireError::InvalidTitle(String::from_utf8_lossy(bytes).into_owned()))?;
        if !array.iter().all(|b| is_printable(*b)) {
            return Err(WireError::InvalidTitle(
                String::from_utf8_lossy(bytes).into_owned(),
            ));
        }
        Ok(Self(array))
    }

    /// The raw title bytes.
    pub const fn as_bytes(&self) -> &[u8; TITLE_SIZE] {
        &self.0
    }

    /// The title as text.
    pub fn as_str(&self) -> &str {
        // Constructors only admit printable ASCII.
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

/// Printable ASCII: space through tilde.
pub(crate) fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Title({:?})", self.as_str())
    }
}

impl FromStr for Title {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
