//! Codec for the ATEM store locking and chunked data-transfer commands.
//!
//! # Crate Structure
//!
//! - [`wire`]: Big-endian primitives, field layouts, titles and command framing
//! - [`transfer`]: Lock and transfer messages, title dispatch, chunking
//!
//! ```
//! use atemxfer::transfer::{TransferData, TransferMessage};
//! use atemxfer::wire::Message;
//!
//! let chunk = TransferData::new(7, vec![0xaa, 0xbb, 0xcc]).unwrap();
//! let payload = chunk.encode();
//! assert_eq!(payload.as_ref(), &[0x00, 0x07, 0x00, 0x03, 0xaa, 0xbb, 0xcc]);
//!
//! let decoded = TransferMessage::decode(TransferData::TITLE, &payload).unwrap();
//! assert_eq!(decoded, TransferMessage::TransferData(chunk));
//! ```

/// Re-export wire types.
pub mod wire {
    pub use atemxfer_wire::*;
}

/// Re-export transfer message types.
pub mod transfer {
    pub use atemxfer_transfer::*;
}
