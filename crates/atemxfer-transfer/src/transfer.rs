//! Chunked data transfer.
//!
//! One transfer is correlated by its transfer ID:
//! 1. controller sends [`StartDataTransfer`] (and optionally `SetFileDescription`)
//! 2. device replies [`RequestDataChunks`] with how many chunks of what size it wants
//! 3. controller streams that many [`TransferData`] messages, repeating from 2
//! 4. device sends [`FinishDataTransfer`]

use std::fmt;

use atemxfer_wire::{
    FieldSpec, Layout, Message, PayloadWriter, ReservedField, Result, TailField, Title, U16Field,
    U32Field, U8Field, WireError,
};
use bytes::Bytes;
use tracing::debug;

const TRANSFER_ID: U16Field = U16Field::at("transfer_id", 0);

/// What the device should do with the transferred data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TransferMode {
    NoOperation = 0,
    Write = 1,
    Clear = 2,
    Write2 = 256,
    Clear2 = 512,
    WriteInputLabel = 513,
}

impl TransferMode {
    pub const ALL: [TransferMode; 6] = [
        TransferMode::NoOperation,
        TransferMode::Write,
        TransferMode::Clear,
        TransferMode::Write2,
        TransferMode::Clear2,
        TransferMode::WriteInputLabel,
    ];

    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for TransferMode {
    type Error = WireError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(TransferMode::NoOperation),
            1 => Ok(TransferMode::Write),
            2 => Ok(TransferMode::Clear),
            256 => Ok(TransferMode::Write2),
            512 => Ok(TransferMode::Clear2),
            513 => Ok(TransferMode::WriteInputLabel),
            other => Err(WireError::InvalidEnumValue {
                field: START_MODE.name,
                value: other.into(),
            }),
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferMode::NoOperation => "no operation",
            TransferMode::Write => "write",
            TransferMode::Clear => "clear",
            TransferMode::Write2 => "write2",
            TransferMode::Clear2 => "clear2",
            TransferMode::WriteInputLabel => "write input label",
        };
        f.write_str(name)
    }
}

/// Open a transfer of `size` bytes into frame `frame_number` of `store`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartDataTransfer {
    pub transfer_id: u16,
    pub store: u16,
    pub frame_number: u16,
    pub size: u32,
    pub mode: TransferMode,
}

const START_STORE: U16Field = U16Field::at("store", 2);
const START_RESERVED: ReservedField = ReservedField::at("reserved", 4, 2);
const START_FRAME: U16Field = U16Field::at("frame_number", 6);
const START_SIZE: U32Field = U32Field::at("size", 8);
const START_MODE: U16Field = U16Field::at("mode", 12);
const START_TRAILER: ReservedField = ReservedField::at("reserved", 14, 2);
const START_FIELDS: &[FieldSpec] = &[
    TRANSFER_ID.spec(),
    START_STORE.spec(),
    START_RESERVED.spec(),
    START_FRAME.spec(),
    START_SIZE.spec(),
    START_MODE.spec(),
    START_TRAILER.spec(),
];

impl StartDataTransfer {
    pub fn new(
        transfer_id: u16,
        store: u16,
        frame_number: u16,
        size: u32,
        mode: TransferMode,
    ) -> Self {
        Self {
            transfer_id,
            store,
            frame_number,
            size,
            mode,
        }
    }
}

impl Message for StartDataTransfer {
    const TITLE: Title = Title::new(b"FTSD");
    const LAYOUT: Layout = Layout::fixed(16, START_FIELDS);

    fn write_fields(&self, w: &mut PayloadWriter<'_>) {
        TRANSFER_ID.write(w, self.transfer_id);
        START_STORE.write(w, self.store);
        START_FRAME.write(w, self.frame_number);
        START_SIZE.write(w, self.size);
        START_MODE.write(w, self.mode.as_u16());
    }

    fn read_fields(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            transfer_id: TRANSFER_ID.read(bytes)?,
            store: START_STORE.read(bytes)?,
            frame_number: START_FRAME.read(bytes)?,
            size: START_SIZE.read(bytes)?,
            mode: TransferMode::try_from(START_MODE.read(bytes)?)?,
        })
    }
}

impl fmt::Display for StartDataTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Start data transfer (id {}) to frame {} of store {} (mode: {}, size: {})",
            self.transfer_id, self.frame_number, self.store, self.mode, self.size
        )
    }
}

/// Fixed value of the byte at offset 2 of [`RequestDataChunks`].
pub const CHUNK_MAGIC: u8 = 0x1a;
/// Fixed value of the trailing `u16` of [`RequestDataChunks`].
pub const CHUNK_MAGIC2: u16 = 0x8b00;

/// Device request: send `chunk_count` chunks of at most `chunk_size` bytes.
///
/// The two magic fields are sentinels with no known meaning. Decoding keeps
/// whatever the device sent so re-encoding echoes it verbatim; use
/// [`RequestDataChunks::decode_strict`] to reject non-standard values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDataChunks {
    pub transfer_id: u16,
    pub chunk_size: u16,
    pub chunk_count: u16,
    magic: u8,
    magic2: u16,
}

const CHUNKS_MAGIC: U8Field = U8Field::at("magic", 2);
const CHUNKS_RESERVED: ReservedField = ReservedField::at("reserved", 3, 3);
const CHUNKS_SIZE: U16Field = U16Field::at("chunk_size", 6);
const CHUNKS_COUNT: U16Field = U16Field::at("chunk_count", 8);
const CHUNKS_MAGIC2: U16Field = U16Field::at("magic2", 10);
const CHUNKS_FIELDS: &[FieldSpec] = &[
    TRANSFER_ID.spec(),
    CHUNKS_MAGIC.spec(),
    CHUNKS_RESERVED.spec(),
    CHUNKS_SIZE.spec(),
    CHUNKS_COUNT.spec(),
    CHUNKS_MAGIC2.spec(),
];

impl RequestDataChunks {
    /// Build a request carrying the standard magic values.
    pub fn new(transfer_id: u16, chunk_size: u16, chunk_count: u16) -> Self {
        Self::with_magic(transfer_id, chunk_size, chunk_count, CHUNK_MAGIC, CHUNK_MAGIC2)
    }

    pub fn with_magic(
        transfer_id: u16,
        chunk_size: u16,
        chunk_count: u16,
        magic: u8,
        magic2: u16,
    ) -> Self {
        Self {
            transfer_id,
            chunk_size,
            chunk_count,
            magic,
            magic2,
        }
    }

    pub fn magic(&self) -> u8 {
        self.magic
    }

    pub fn magic2(&self) -> u16 {
        self.magic2
    }

    pub fn has_standard_magic(&self) -> bool {
        self.magic == CHUNK_MAGIC && self.magic2 == CHUNK_MAGIC2
    }

    /// Decode, rejecting magic values other than [`CHUNK_MAGIC`]/[`CHUNK_MAGIC2`].
    pub fn decode_strict(bytes: &[u8]) -> Result<Self> {
        let msg = Self::decode(bytes)?;
        if msg.magic != CHUNK_MAGIC {
            return Err(WireError::InvalidMagic {
                field: CHUNKS_MAGIC.name,
                expected: CHUNK_MAGIC.into(),
                actual: msg.magic.into(),
            });
        }
        if msg.magic2 != CHUNK_MAGIC2 {
            return Err(WireError::InvalidMagic {
                field: CHUNKS_MAGIC2.name,
                expected: CHUNK_MAGIC2.into(),
                actual: msg.magic2.into(),
            });
        }
        Ok(msg)
    }
}

impl Message for RequestDataChunks {
    const TITLE: Title = Title::new(b"FTCD");
    const LAYOUT: Layout = Layout::fixed(12, CHUNKS_FIELDS);

    fn write_fields(&self, w: &mut PayloadWriter<'_>) {
        TRANSFER_ID.write(w, self.transfer_id);
        CHUNKS_MAGIC.write(w, self.magic);
        CHUNKS_SIZE.write(w, self.chunk_size);
        CHUNKS_COUNT.write(w, self.chunk_count);
        CHUNKS_MAGIC2.write(w, self.magic2);
    }

    fn read_fields(bytes: &[u8]) -> Result<Self> {
        let msg = Self {
            transfer_id: TRANSFER_ID.read(bytes)?,
            magic: CHUNKS_MAGIC.read(bytes)?,
            chunk_size: CHUNKS_SIZE.read(bytes)?,
            chunk_count: CHUNKS_COUNT.read(bytes)?,
            magic2: CHUNKS_MAGIC2.read(bytes)?,
        };
        if !msg.has_standard_magic() {
            debug!(
                transfer_id = msg.transfer_id,
                magic = msg.magic,
                magic2 = msg.magic2,
                "chunk request carries non-standard magic"
            );
        }
        Ok(msg)
    }
}

impl fmt::Display for RequestDataChunks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Command: please send me {} chunks of max {} bytes for transfer 0x{:X}",
            self.chunk_count, self.chunk_size, self.transfer_id
        )
    }
}

/// One chunk of transfer payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferData {
    transfer_id: u16,
    body: Bytes,
}

const DATA_SIZE: U16Field = U16Field::at("size", 2);
const DATA_BODY: TailField = TailField::at("body", 4);
const DATA_FIELDS: &[FieldSpec] = &[TRANSFER_ID.spec(), DATA_SIZE.spec(), DATA_BODY.spec()];

/// Largest body a single [`TransferData`] can carry.
pub const MAX_CHUNK_BODY: usize = u16::MAX as usize;

impl TransferData {
    /// Wrap a chunk; bodies longer than [`MAX_CHUNK_BODY`] are `FieldTooLarge`.
    pub fn new(transfer_id: u16, data: impl Into<Bytes>) -> Result<Self> {
        let body = data.into();
        if body.len() > MAX_CHUNK_BODY {
            return Err(WireError::FieldTooLarge {
                field: DATA_BODY.name,
                len: body.len(),
                max: MAX_CHUNK_BODY,
            });
        }
        Ok(Self { transfer_id, body })
    }

    pub fn transfer_id(&self) -> u16 {
        self.transfer_id
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }
}

impl Message for TransferData {
    const TITLE: Title = Title::new(b"FTDa");
    const LAYOUT: Layout = Layout::variable(4, DATA_FIELDS);

    fn encoded_len(&self) -> usize {
        Self::LAYOUT.min_size + self.body.len()
    }

    fn write_fields(&self, w: &mut PayloadWriter<'_>) {
        TRANSFER_ID.write(w, self.transfer_id);
        // Construction bounds the body to u16.
        DATA_SIZE.write(w, self.body.len() as u16);
        DATA_BODY.write(w, &self.body);
    }

    fn read_fields(bytes: &[u8]) -> Result<Self> {
        let declared = DATA_SIZE.read(bytes)? as usize;
        let body = DATA_BODY.read(bytes, declared)?;
        Ok(Self {
            transfer_id: TRANSFER_ID.read(bytes)?,
            body: Bytes::copy_from_slice(body),
        })
    }
}

impl fmt::Display for TransferData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transfer {} bytes of data (ID: {})",
            self.body.len(),
            self.transfer_id
        )
    }
}

/// Device notification: the transfer completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishDataTransfer {
    pub transfer_id: u16,
}

const FINISH_RESERVED: ReservedField = ReservedField::at("reserved", 2, 2);
const FINISH_FIELDS: &[FieldSpec] = &[TRANSFER_ID.spec(), FINISH_RESERVED.spec()];

impl FinishDataTransfer {
    pub fn new(transfer_id: u16) -> Self {
        Self { transfer_id }
    }
}

impl Message for FinishDataTransfer {
    const TITLE: Title = Title::new(b"FTDC");
    const LAYOUT: Layout = Layout::fixed(4, FINISH_FIELDS);

    fn write_fields(&self, w: &mut PayloadWriter<'_>) {
        TRANSFER_ID.write(w, self.transfer_id);
    }

    fn read_fields(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            transfer_id: TRANSFER_ID.read(bytes)?,
        })
    }
}

impl fmt::Display for FinishDataTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Data transfer {} completed", self.transfer_id)
    }
}
