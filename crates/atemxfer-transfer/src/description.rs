use std::fmt;

use atemxfer_wire::{
    AsciiField, BytesField, FieldSpec, Layout, Message, PayloadWriter, ReservedField, Result,
    Title, U16Field,
};

/// Length of the content hash carried by [`SetFileDescription`].
pub const HASH_SIZE: usize = 16;

/// Hash sent when the caller has none to offer.
pub const DEFAULT_HASH: [u8; HASH_SIZE] = [1; HASH_SIZE];

const TRANSFER_ID: U16Field = U16Field::at("transfer_id", 0);
const NAME: AsciiField = AsciiField::at("name", 2, 64);
const DESCRIPTION: AsciiField = AsciiField::at("description", 66, 128);
const HASH: BytesField<HASH_SIZE> = BytesField::at("hash", 194);
const RESERVED: ReservedField = ReservedField::at("reserved", 210, 2);
const FIELDS: &[FieldSpec] = &[
    TRANSFER_ID.spec(),
    NAME.spec(),
    DESCRIPTION.spec(),
    HASH.spec(),
    RESERVED.spec(),
];

/// Name, description and content hash of the asset being transferred.
///
/// Strings are printable ASCII, at most 64 (name) and 128 (description)
/// bytes; both are checked when the value is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetFileDescription {
    transfer_id: u16,
    name: String,
    description: String,
    hash: [u8; HASH_SIZE],
}

impl SetFileDescription {
    pub const NAME_CAPACITY: usize = NAME.capacity;
    pub const DESCRIPTION_CAPACITY: usize = DESCRIPTION.capacity;

    /// Describe a transfer with [`DEFAULT_HASH`].
    pub fn new(
        transfer_id: u16,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        Self::with_hash(transfer_id, name, description, DEFAULT_HASH)
    }

    pub fn with_hash(
        transfer_id: u16,
        name: impl Into<String>,
        description: impl Into<String>,
        hash: [u8; HASH_SIZE],
    ) -> Result<Self> {
        let name = name.into();
        let description = description.into();
        NAME.validate(&name)?;
        DESCRIPTION.validate(&description)?;
        Ok(Self {
            transfer_id,
            name,
            description,
            hash,
        })
    }

    pub fn transfer_id(&self) -> u16 {
        self.transfer_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn hash(&self) -> &[u8; HASH_SIZE] {
        &self.hash
    }
}

impl Message for SetFileDescription {
    const TITLE: Title = Title::new(b"FTFD");
    const LAYOUT: Layout = Layout::fixed(212, FIELDS);

    fn write_fields(&self, w: &mut PayloadWriter<'_>) {
        TRANSFER_ID.write(w, self.transfer_id);
        NAME.write(w, &self.name);
        DESCRIPTION.write(w, &self.description);
        HASH.write(w, &self.hash);
    }

    fn read_fields(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            transfer_id: TRANSFER_ID.read(bytes)?,
            name: NAME.read(bytes)?,
            description: DESCRIPTION.read(bytes)?,
            hash: HASH.read(bytes)?,
        })
    }
}

impl fmt::Display for SetFileDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File '{}': {} (Transfer ID: {}, hash: ",
            self.name, self.description, self.transfer_id
        )?;
        for byte in self.hash {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}
