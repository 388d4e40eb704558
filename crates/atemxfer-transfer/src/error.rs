use atemxfer_wire::WireError;

/// Errors that can occur while slicing an asset into chunks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    /// Message-level error.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// A chunk request names a different transfer.
    #[error("chunk request for transfer {actual}, expected {expected}")]
    TransferIdMismatch { expected: u16, actual: u16 },

    /// The device asked for zero-byte chunks while data remains.
    #[error("chunk request for transfer {0} has zero chunk size")]
    ZeroChunkSize(u16),
}

pub type Result<T> = std::result::Result<T, TransferError>;
