//! Field layout descriptors.
//!
//! Each message type declares its wire format once, as `const` field
//! descriptors plus a [`Layout`] table listing them. The descriptors do the
//! bounds-checked reads and writes; the table drives minimum-size checks and
//! diagnostics.

use std::ops::Range;

use crate::error::{Result, WireError};
use crate::primitive::{bytes_of_u16, bytes_of_u32, u16_from, u32_from, u8_from, window};
use crate::title::is_printable;

/// Primitive type stored in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    /// Fixed-length opaque bytes.
    Bytes,
    /// Fixed-capacity ASCII, zero-padded.
    Ascii,
    /// Always written as zero, ignored on read.
    Reserved,
    /// Variable-length trailing bytes.
    Tail,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::U8 => "u8",
            FieldKind::U16 => "u16",
            FieldKind::U32 => "u32",
            FieldKind::Bytes => "bytes",
            FieldKind::Ascii => "ascii",
            FieldKind::Reserved => "reserved",
            FieldKind::Tail => "tail",
        }
    }
}

/// One row of a layout table. `len` is zero for [`FieldKind::Tail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// The canonical wire layout of one message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Fixed size, or the header size for variable-length messages.
    pub min_size: usize,
    /// True when a [`FieldKind::Tail`] field follows the fixed part.
    pub variable: bool,
    pub fields: &'static [FieldSpec],
}

impl Layout {
    pub const fn fixed(size: usize, fields: &'static [FieldSpec]) -> Self {
        Self {
            min_size: size,
            variable: false,
            fields,
        }
    }

    pub const fn variable(header_size: usize, fields: &'static [FieldSpec]) -> Self {
        Self {
            min_size: header_size,
            variable: true,
            fields,
        }
    }

    /// Reject buffers shorter than the declared minimum.
    pub fn check(&self, bytes: &[u8]) -> Result<()> {
        if bytes.len() < self.min_size {
            return Err(WireError::TruncatedBuffer {
                needed: self.min_size,
                available: bytes.len(),
            });
        }
        Ok(())
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Render every field of `bytes` for diagnostics.
    ///
    /// Fields that fall outside `bytes` render as `<truncated>`; nothing here
    /// validates the payload.
    pub fn describe(&self, bytes: &[u8]) -> Vec<FieldValue> {
        self.fields
            .iter()
            .map(|spec| FieldValue {
                spec: *spec,
                value: render(spec, bytes),
            })
            .collect()
    }
}

/// A rendered field, as produced by [`Layout::describe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub spec: FieldSpec,
    pub value: String,
}

fn render(spec: &FieldSpec, bytes: &[u8]) -> String {
    let rendered = match spec.kind {
        FieldKind::U8 => u8_from(bytes, spec.offset).map(|v| format!("{v} ({v:#04x})")),
        FieldKind::U16 => u16_from(bytes, spec.offset).map(|v| format!("{v} ({v:#06x})")),
        FieldKind::U32 => u32_from(bytes, spec.offset).map(|v| format!("{v} ({v:#010x})")),
        FieldKind::Bytes | FieldKind::Reserved => window(bytes, spec.offset, spec.len).map(hex::encode),
        FieldKind::Ascii => window(bytes, spec.offset, spec.len)
            .map(|raw| String::from_utf8_lossy(until_terminator(raw)).into_owned()),
        FieldKind::Tail => Ok(bytes.get(spec.offset..).map(hex::encode).unwrap_or_default()),
    };
    rendered.unwrap_or_else(|_| "<truncated>".to_string())
}

/// The bytes of `field` before its first zero, or all of it when unterminated.
fn until_terminator(field: &[u8]) -> &[u8] {
    let end = field.iter().position(|b| *b == 0).unwrap_or(field.len());
    &field[..end]
}

/// Bounds-checked writer over a zeroed payload buffer.
///
/// Offsets come from `const` layouts whose ranges lie inside the buffer the
/// message allocated, so an out-of-range write is a layout bug and panics
/// rather than touching memory outside the payload.
pub struct PayloadWriter<'a> {
    buf: &'a mut [u8],
}

impl<'a> PayloadWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }

    pub fn put_u8(&mut self, offset: usize, value: u8) {
        self.buf[offset] = value;
    }

    pub fn put_u16(&mut self, offset: usize, value: u16) {
        self.put_slice(offset, &bytes_of_u16(value));
    }

    pub fn put_u32(&mut self, offset: usize, value: u32) {
        self.put_slice(offset, &bytes_of_u32(value));
    }

    pub fn put_slice(&mut self, offset: usize, bytes: &[u8]) {
        self.buf[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// A single-byte field.
#[derive(Debug, Clone, Copy)]
pub struct U8Field {
    pub name: &'static str,
    pub offset: usize,
}

impl U8Field {
    pub const fn at(name: &'static str, offset: usize) -> Self {
        Self { name, offset }
    }

    pub const fn spec(&self) -> FieldSpec {
        FieldSpec {
            name: self.name,
            offset: self.offset,
            len: 1,
            kind: FieldKind::U8,
        }
    }

    pub fn read(&self, bytes: &[u8]) -> Result<u8> {
        u8_from(bytes, self.offset)
    }

    pub fn write(&self, w: &mut PayloadWriter<'_>, value: u8) {
        w.put_u8(self.offset, value);
    }
}

/// A big-endian `u16` field.
#[derive(Debug, Clone, Copy)]
pub struct U16Field {
    pub name: &'static str,
    pub offset: usize,
}

impl U16Field {
    pub const fn at(name: &'static str, offset: usize) -> Self {
        Self { name, offset }
    }

    pub const fn spec(&self) -> FieldSpec {
        FieldSpec {
            name: self.name,
            offset: self.offset,
            len: 2,
            kind: FieldKind::U16,
        }
    }

    pub fn read(&self, bytes: &[u8]) -> Result<u16> {
        u16_from(bytes, self.offset)
    }

    pub fn write(&self, w: &mut PayloadWriter<'_>, value: u16) {
        w.put_u16(self.offset, value);
    }
}

/// A big-endian `u32` field.
#[derive(Debug, Clone, Copy)]
pub struct U32Field {
    pub name: &'static str,
    pub offset: usize,
}

impl U32Field {
    pub const fn at(name: &'static str, offset: usize) -> Self {
        Self { name, offset }
    }

    pub const fn spec(&self) -> FieldSpec {
        FieldSpec {
            name: self.name,
            offset: self.offset,
            len: 4,
            kind: FieldKind::U32,
        }
    }

    pub fn read(&self, bytes: &[u8]) -> Result<u32> {
        u32_from(bytes, self.offset)
    }

    pub fn write(&self, w: &mut PayloadWriter<'_>, value: u32) {
        w.put_u32(self.offset, value);
    }
}

/// A fixed-length opaque byte array.
#[derive(Debug, Clone, Copy)]
pub struct BytesField<const N: usize> {
    pub name: &'static str,
    pub offset: usize,
}

impl<const N: usize> BytesField<N> {
    pub const fn at(name: &'static str, offset: usize) -> Self {
        Self { name, offset }
    }

    pub const fn spec(&self) -> FieldSpec {
        FieldSpec {
            name: self.name,
            offset: self.offset,
            len: N,
            kind: FieldKind::Bytes,
        }
    }

    pub fn read(&self, bytes: &[u8]) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(window(bytes, self.offset, N)?);
        Ok(out)
    }

    pub fn write(&self, w: &mut PayloadWriter<'_>, value: &[u8; N]) {
        w.put_slice(self.offset, value);
    }
}

/// A fixed-capacity ASCII string, right-padded with zero bytes.
#[derive(Debug, Clone, Copy)]
pub struct AsciiField {
    pub name: &'static str,
    pub offset: usize,
    pub capacity: usize,
}

impl AsciiField {
    pub const fn at(name: &'static str, offset: usize, capacity: usize) -> Self {
        Self {
            name,
            offset,
            capacity,
        }
    }

    pub const fn spec(&self) -> FieldSpec {
        FieldSpec {
            name: self.name,
            offset: self.offset,
            len: self.capacity,
            kind: FieldKind::Ascii,
        }
    }

    /// Check that `text` is printable ASCII and fits the field.
    pub fn validate(&self, text: &str) -> Result<()> {
        if text.len() > self.capacity {
            return Err(WireError::FieldTooLarge {
                field: self.name,
                len: text.len(),
                max: self.capacity,
            });
        }
        check_printable(self.name, text.as_bytes())
    }

    /// Read the text up to the first zero byte inside the field.
    ///
    /// The terminator scan stops at the end of the field; a string filling
    /// the whole capacity needs no terminator.
    pub fn read(&self, bytes: &[u8]) -> Result<String> {
        let text = until_terminator(window(bytes, self.offset, self.capacity)?);
        check_printable(self.name, text)?;
        Ok(text.iter().map(|b| *b as char).collect())
    }

    /// Write `text`; the rest of the field keeps its zero padding.
    ///
    /// `text` must already have passed [`AsciiField::validate`].
    pub fn write(&self, w: &mut PayloadWriter<'_>, text: &str) {
        let bytes = text.as_bytes();
        let len = bytes.len().min(self.capacity);
        w.put_slice(self.offset, &bytes[..len]);
    }
}

fn check_printable(field: &'static str, text: &[u8]) -> Result<()> {
    match text.iter().position(|b| !is_printable(*b)) {
        Some(position) => Err(WireError::InvalidEncoding {
            field,
            byte: text[position],
            position,
        }),
        None => Ok(()),
    }
}

/// Zero bytes the writer skips and the reader ignores.
#[derive(Debug, Clone, Copy)]
pub struct ReservedField {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
}

impl ReservedField {
    pub const fn at(name: &'static str, offset: usize, len: usize) -> Self {
        Self { name, offset, len }
    }

    pub const fn spec(&self) -> FieldSpec {
        FieldSpec {
            name: self.name,
            offset: self.offset,
            len: self.len,
            kind: FieldKind::Reserved,
        }
    }
}

/// Variable-length bytes running from `offset` to the end of the payload.
#[derive(Debug, Clone, Copy)]
pub struct TailField {
    pub name: &'static str,
    pub offset: usize,
}

impl TailField {
    pub const fn at(name: &'static str, offset: usize) -> Self {
        Self { name, offset }
    }

    pub const fn spec(&self) -> FieldSpec {
        FieldSpec {
            name: self.name,
            offset: self.offset,
            len: 0,
            kind: FieldKind::Tail,
        }
    }

    /// Read exactly `declared` trailing bytes; any other count is a `SizeMismatch`.
    pub fn read<'b>(&self, bytes: &'b [u8], declared: usize) -> Result<&'b [u8]> {
        let available = bytes.len().saturating_sub(self.offset);
        if available != declared {
            return Err(WireError::SizeMismatch {
                declared,
                available,
            });
        }
        Ok(&bytes[self.offset..])
    }

    pub fn write(&self, w: &mut PayloadWriter<'_>, body: &[u8]) {
        w.put_slice(self.offset, body);
    }
}
