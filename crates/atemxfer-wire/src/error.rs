use crate::title::Title;

/// Errors that can occur while building, encoding or decoding messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// The buffer ends before a field's byte range does.
    #[error("truncated buffer ({available} bytes, need {needed})")]
    TruncatedBuffer { needed: usize, available: usize },

    /// A constrained field holds a value outside its declared domain.
    #[error("invalid value {value:#x} for field `{field}`")]
    InvalidEnumValue { field: &'static str, value: u32 },

    /// A declared length disagrees with the bytes that actually follow it.
    #[error("size mismatch ({declared} bytes declared, {available} present)")]
    SizeMismatch { declared: usize, available: usize },

    /// A string field contains a byte outside printable ASCII.
    #[error("invalid byte {byte:#04x} at position {position} of field `{field}`")]
    InvalidEncoding {
        field: &'static str,
        byte: u8,
        position: usize,
    },

    /// A value does not fit the field reserved for it.
    #[error("field `{field}` too large ({len} bytes, max {max})")]
    FieldTooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A protocol sentinel differs from its fixed value (strict decoding only).
    #[error("invalid magic in field `{field}` (expected {expected:#x}, got {actual:#x})")]
    InvalidMagic {
        field: &'static str,
        expected: u32,
        actual: u32,
    },

    /// A title is not exactly four printable ASCII bytes.
    #[error("invalid title {0:?} (expected 4 printable ASCII characters)")]
    InvalidTitle(String),

    /// No decoder is registered for a title.
    #[error("unknown title {0}")]
    UnknownTitle(Title),

    /// A command carries a different title than the decoder expects.
    #[error("title mismatch (expected {expected}, got {actual})")]
    TitleMismatch { expected: Title, actual: Title },

    /// A command header declares a length outside the accepted range.
    #[error("invalid command length {len} (min {min}, max {max})")]
    InvalidCommandLength { len: usize, min: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, WireError>;
