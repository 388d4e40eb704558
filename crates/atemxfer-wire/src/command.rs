use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::error::{Result, WireError};
use crate::message::Message;
use crate::primitive::u16_from;
use crate::title::{Title, TITLE_SIZE};

/// Command header: length (2) + reserved (2) + title (4) = 8 bytes.
pub const HEADER_SIZE: usize = 4 + TITLE_SIZE;

/// Largest command the 16-bit length header can describe.
pub const DEFAULT_MAX_COMMAND: usize = u16::MAX as usize;

/// A title plus its undecoded payload, as routed by a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand {
    pub title: Title,
    pub payload: Bytes,
}

impl RawCommand {
    pub fn new(title: Title, payload: impl Into<Bytes>) -> Self {
        Self {
            title,
            payload: payload.into(),
        }
    }

    /// Wrap an encoded message.
    pub fn from_message<M: Message>(message: &M) -> Self {
        Self::new(M::TITLE, message.encode())
    }

    /// The total wire size of this command (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Decode the payload as `M`, checking the title first.
    pub fn decode<M: Message>(&self) -> Result<M> {
        if self.title != M::TITLE {
            return Err(WireError::TitleMismatch {
                expected: M::TITLE,
                actual: self.title,
            });
        }
        M::decode(&self.payload)
    }
}

/// Encode a message as a framed command.
pub fn encode_command<M: Message>(message: &M, dst: &mut BytesMut) -> Result<()> {
    let len = checked_length(message.encoded_len())?;
    dst.reserve(len as usize);
    put_header(M::TITLE, len, dst);
    message.encode_into(dst);
    Ok(())
}

/// Encode an already-serialized payload as a framed command.
///
/// Wire format:
/// ```text
/// ┌──────────────┬────────────┬────────────┬──────────────────┐
/// │ Length (2B)  │ Reserved   │ Title (4B) │ Payload          │
/// │ BE, incl.    │ (2B, zero) │ ASCII      │ (Length - 8 B)   │
/// │ header       │            │            │                  │
/// └──────────────┴────────────┴────────────┴──────────────────┘
/// ```
pub fn encode_raw_command(title: Title, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = checked_length(payload.len())?;
    dst.reserve(len as usize);
    put_header(title, len, dst);
    dst.put_slice(payload);
    Ok(())
}

fn checked_length(payload_len: usize) -> Result<u16> {
    let total = HEADER_SIZE + payload_len;
    u16::try_from(total).map_err(|_| WireError::FieldTooLarge {
        field: "command length",
        len: total,
        max: DEFAULT_MAX_COMMAND,
    })
}

fn put_header(title: Title, len: u16, dst: &mut BytesMut) {
    dst.put_u16(len);
    dst.put_u16(0);
    dst.put_slice(title.as_bytes());
}

/// Decode one command from the front of a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete command yet.
/// On success, consumes the command bytes from the buffer.
pub fn decode_command(src: &mut BytesMut, config: &CommandConfig) -> Result<Option<RawCommand>> {
    if src.len() < HEADER_SIZE {
        return Ok(None);
    }

    let len = u16_from(src, 0)? as usize;
    if len < HEADER_SIZE || len > config.max_command_size {
        return Err(WireError::InvalidCommandLength {
            len,
            min: HEADER_SIZE,
            max: config.max_command_size,
        });
    }
    let title = Title::from_bytes(&src[4..HEADER_SIZE])?;

    if src.len() < len {
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(len - HEADER_SIZE).freeze();
    trace!(%title, len, "decoded command");

    Ok(Some(RawCommand { title, payload }))
}

/// Split a complete packet body into its commands.
///
/// Unlike [`decode_command`], a trailing partial command is an error here:
/// the caller asserts the buffer is whole.
pub fn split_commands(packet: &[u8], config: &CommandConfig) -> Result<Vec<RawCommand>> {
    let mut src = BytesMut::from(packet);
    let mut commands = Vec::new();
    while !src.is_empty() {
        match decode_command(&mut src, config)? {
            Some(command) => commands.push(command),
            None => {
                let needed = if src.len() < HEADER_SIZE {
                    HEADER_SIZE
                } else {
                    u16_from(&src, 0)? as usize
                };
                return Err(WireError::TruncatedBuffer {
                    needed,
                    available: src.len(),
                });
            }
        }
    }
    Ok(commands)
}

/// Configuration for command framing.
#[derive(Debug, Clone)]
pub struct CommandConfig {
    /// Maximum command size in bytes, header included. Default: 65535.
    pub max_command_size: usize,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            max_command_size: DEFAULT_MAX_COMMAND,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;
    use crate::layout::{FieldSpec, Layout, PayloadWriter, U16Field};

    const FTDC: Title = Title::new(b"FTDC");

    #[derive(Debug, PartialEq)]
    struct Done(u16);

    const ID: U16Field = U16Field::at("transfer_id", 0);
    const FIELDS: &[FieldSpec] = &[ID.spec()];

    impl Message for Done {
        const TITLE: Title = FTDC;
        const LAYOUT: Layout = Layout::fixed(2, FIELDS);

        fn write_fields(&self, w: &mut PayloadWriter<'_>) {
            ID.write(w, self.0);
        }

        fn read_fields(bytes: &[u8]) -> Result<Self> {
            Ok(Self(ID.read(bytes)?))
        }
    }

    impl fmt::Display for Done {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "done {}", self.0)
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        encode_raw_command(FTDC, &[0x00, 0x07], &mut buf).unwrap();

        assert_eq!(
            buf.as_ref(),
            &[0x00, 0x0a, 0x00, 0x00, b'F', b'T', b'D', b'C', 0x00, 0x07]
        );

        let command = decode_command(&mut buf, &CommandConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(command.title, FTDC);
        assert_eq!(command.payload.as_ref(), &[0x00, 0x07]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_encode_message() {
        let mut buf = BytesMut::new();
        encode_command(&Done(9), &mut buf).unwrap();

        let command = decode_command(&mut buf, &CommandConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(command.wire_size(), HEADER_SIZE + 2);
        assert_eq!(command.decode::<Done>().unwrap(), Done(9));
        assert_eq!(RawCommand::from_message(&Done(9)), command);
    }

    #[test]
    fn test_decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x00, 0x0a, 0x00][..]);
        let result = decode_command(&mut buf, &CommandConfig::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_raw_command(FTDC, b"hello", &mut buf).unwrap();
        buf.truncate(HEADER_SIZE + 2);

        let result = decode_command(&mut buf, &CommandConfig::default()).unwrap();
        assert!(result.is_none());
        assert_eq!(buf.len(), HEADER_SIZE + 2);
    }

    #[test]
    fn test_decode_length_below_header() {
        let mut buf = BytesMut::from(&[0x00, 0x04, 0x00, 0x00, b'F', b'T', b'D', b'C'][..]);
        let result = decode_command(&mut buf, &CommandConfig::default());
        assert!(matches!(
            result,
            Err(WireError::InvalidCommandLength { len: 4, .. })
        ));
    }

    #[test]
    fn test_decode_command_too_large() {
        let mut buf = BytesMut::new();
        encode_raw_command(FTDC, &[0u8; 64], &mut buf).unwrap();

        let config = CommandConfig {
            max_command_size: 32,
        };
        let result = decode_command(&mut buf, &config);
        assert!(matches!(
            result,
            Err(WireError::InvalidCommandLength { len: 72, .. })
        ));
    }

    #[test]
    fn test_decode_invalid_title() {
        let mut buf = BytesMut::from(&[0x00, 0x08, 0x00, 0x00, 0xff, b'T', b'D', b'C'][..]);
        let result = decode_command(&mut buf, &CommandConfig::default());
        assert!(matches!(result, Err(WireError::InvalidTitle(_))));
    }

    #[test]
    fn test_encode_payload_too_large() {
        let mut buf = BytesMut::new();
        let result = encode_raw_command(FTDC, &vec![0u8; DEFAULT_MAX_COMMAND], &mut buf);
        assert!(matches!(result, Err(WireError::FieldTooLarge { .. })));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_title_mismatch() {
        let command = RawCommand::new(Title::new(b"LOCK"), vec![0, 1]);
        assert_eq!(
            command.decode::<Done>(),
            Err(WireError::TitleMismatch {
                expected: FTDC,
                actual: Title::new(b"LOCK"),
            })
        );
    }

    #[test]
    fn test_split_commands() {
        let mut buf = BytesMut::new();
        encode_command(&Done(1), &mut buf).unwrap();
        encode_raw_command(Title::new(b"LKOB"), &[0x00, 0x02, 0x00, 0x00], &mut buf).unwrap();

        let commands = split_commands(&buf, &CommandConfig::default()).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].decode::<Done>().unwrap(), Done(1));
        assert_eq!(commands[1].title, Title::new(b"LKOB"));
    }

    #[test]
    fn test_split_commands_rejects_partial_tail() {
        let mut buf = BytesMut::new();
        encode_command(&Done(1), &mut buf).unwrap();
        buf.put_slice(&[0x00, 0x0c, 0x00]);

        let result = split_commands(&buf, &CommandConfig::default());
        assert_eq!(
            result,
            Err(WireError::TruncatedBuffer {
                needed: HEADER_SIZE,
                available: 3
            })
        );
    }
}
