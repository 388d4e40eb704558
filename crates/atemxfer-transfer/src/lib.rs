//! Store locking and chunked data transfer for the ATEM control protocol.
//!
//! The messages here push named binary assets (stills, clips, labels) into
//! numbered stores on the device. Each one implements
//! [`atemxfer_wire::Message`]; [`TransferMessage`] dispatches on title for
//! callers that receive commands from the wire.

pub mod catalog;
pub mod chunker;
pub mod description;
pub mod error;
pub mod lock;
pub mod transfer;

pub use catalog::{lookup, CatalogEntry, Direction, TransferMessage, CATALOG};
pub use chunker::Chunker;
pub use description::{SetFileDescription, DEFAULT_HASH, HASH_SIZE};
pub use error::{Result, TransferError};
pub use lock::{ChangeLock, ObtainLock, RequestLock, RequestLockPosition};
pub use transfer::{
    FinishDataTransfer, RequestDataChunks, StartDataTransfer, TransferData, TransferMode,
    CHUNK_MAGIC, CHUNK_MAGIC2, MAX_CHUNK_BODY,
};
