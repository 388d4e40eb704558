use std::fmt;

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::error::Result;
use crate::layout::{Layout, PayloadWriter};
use crate::title::Title;

/// A typed protocol message with a fixed title and a declared wire layout.
///
/// Implementors describe only their fields; framing of the payload buffer,
/// minimum-size checks and logging live in the provided methods so they are
/// identical for every message type.
///
/// `Display` gives a one-line human summary for diagnostics.
pub trait Message: fmt::Display + Sized {
    /// Routing title, e.g. `FTSD`.
    const TITLE: Title;

    /// Canonical field layout.
    const LAYOUT: Layout;

    /// Write every non-reserved field into a zeroed buffer of [`Message::encoded_len`] bytes.
    fn write_fields(&self, w: &mut PayloadWriter<'_>);

    /// Parse fields from a payload already checked against [`Message::LAYOUT`].
    fn read_fields(bytes: &[u8]) -> Result<Self>;

    /// Encoded payload size.
    fn encoded_len(&self) -> usize {
        Self::LAYOUT.min_size
    }

    fn title(&self) -> Title {
        Self::TITLE
    }

    /// Serialize to a freshly allocated payload.
    fn encode(&self) -> Bytes {
        let mut buf = BytesMut::zeroed(self.encoded_len());
        self.write_fields(&mut PayloadWriter::new(&mut buf));
        trace!(title = %Self::TITLE, len = buf.len(), "encoded message");
        buf.freeze()
    }

    /// Serialize, appending to `dst`.
    fn encode_into(&self, dst: &mut BytesMut) {
        let start = dst.len();
        dst.resize(start + self.encoded_len(), 0);
        self.write_fields(&mut PayloadWriter::new(&mut dst[start..]));
    }

    /// Parse a title-stripped payload.
    ///
    /// Fixed-size messages accept trailing bytes (command padding) and ignore
    /// them; anything shorter than the layout is `TruncatedBuffer`.
    fn decode(bytes: &[u8]) -> Result<Self> {
        Self::LAYOUT.check(bytes)?;
        if !Self::LAYOUT.variable && bytes.len() > Self::LAYOUT.min_size {
            debug!(
                title = %Self::TITLE,
                len = bytes.len(),
                expected = Self::LAYOUT.min_size,
                "ignoring trailing bytes after fixed-size payload"
            );
        }
        let message = Self::read_fields(bytes)?;
        trace!(title = %Self::TITLE, len = bytes.len(), "decoded message");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WireError;
    use crate::layout::{FieldSpec, ReservedField, U16Field};

    #[derive(Debug, PartialEq)]
    struct Ping {
        id: u16,
    }

    const ID: U16Field = U16Field::at("id", 0);
    const RESERVED: ReservedField = ReservedField::at("reserved", 2, 2);
    const FIELDS: &[FieldSpec] = &[ID.spec(), RESERVED.spec()];

    impl Message for Ping {
        const TITLE: Title = Title::new(b"PING");
        const LAYOUT: Layout = Layout::fixed(4, FIELDS);

        fn write_fields(&self, w: &mut PayloadWriter<'_>) {
            ID.write(w, self.id);
        }

        fn read_fields(bytes: &[u8]) -> Result<Self> {
            Ok(Self {
                id: ID.read(bytes)?,
            })
        }
    }

    impl fmt::Display for Ping {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "ping {}", self.id)
        }
    }

    #[test]
    fn encode_fills_layout_size() {
        let bytes = Ping { id: 0x0a0b }.encode();
        assert_eq!(bytes.as_ref(), &[0x0a, 0x0b, 0x00, 0x00]);
    }

    #[test]
    fn decode_inverts_encode() {
        let ping = Ping { id: 42 };
        assert_eq!(Ping::decode(&ping.encode()).unwrap(), ping);
    }

    #[test]
    fn decode_rejects_short_payload() {
        assert_eq!(
            Ping::decode(&[0x00, 0x01, 0x00]),
            Err(WireError::TruncatedBuffer {
                needed: 4,
                available: 3
            })
        );
    }

    #[test]
    fn decode_ignores_padding() {
        assert_eq!(
            Ping::decode(&[0x00, 0x05, 0x00, 0x00, 0xff, 0xff]).unwrap(),
            Ping { id: 5 }
        );
    }

    #[test]
    fn encode_into_appends() {
        let mut buf = BytesMut::from(&b"xy"[..]);
        Ping { id: 1 }.encode_into(&mut buf);
        assert_eq!(buf.as_ref(), &[b'x', b'y', 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(Ping { id: 1 }.title().to_string(), "PING");
    }
}
