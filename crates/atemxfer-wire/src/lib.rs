//! Wire primitives for the ATEM control protocol.
//!
//! Every command on the wire is a 4-character title followed by a payload
//! with a fixed, big-endian field layout:
//! - [`primitive`] converts integers to and from big-endian bytes
//! - [`layout`] declares where each field of a payload lives
//! - [`Message`] ties a title and a layout to a typed value
//! - [`command`] frames titled payloads into the 8-byte command envelope
//!
//! No sockets, no sessions: encoding and decoding are pure functions over
//! byte buffers.

pub mod command;
pub mod error;
pub mod layout;
pub mod message;
pub mod primitive;
pub mod title;

#[cfg(feature = "async")]
pub mod async_codec;

pub use command::{
    decode_command, encode_command, encode_raw_command, split_commands, CommandConfig, RawCommand,
    DEFAULT_MAX_COMMAND, HEADER_SIZE,
};
pub use error::{Result, WireError};
pub use layout::{
    AsciiField, BytesField, FieldKind, FieldSpec, FieldValue, Layout, PayloadWriter, ReservedField,
    TailField, U16Field, U32Field, U8Field,
};
pub use message::Message;
pub use primitive::{bytes_of_u16, bytes_of_u32, u16_from, u32_from};
pub use title::{Title, TITLE_SIZE};

#[cfg(feature = "async")]
pub use async_codec::{CodecError, CommandCodec};
