//! Store locking.
//!
//! The controller asks for a lock with [`RequestLock`] or
//! [`RequestLockPosition`]; the device answers with [`ObtainLock`] and
//! reports lock changes with [`ChangeLock`]. Lock state itself is owned by
//! the device.

use std::fmt;

use atemxfer_wire::{
    FieldSpec, Layout, Message, PayloadWriter, ReservedField, Result, Title, U16Field, U8Field,
    WireError,
};

const STORE: U16Field = U16Field::at("store", 0);

/// Ask the device to lock (or unlock) a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLock {
    pub store: u16,
    pub state: u16,
}

const LOCK_STATE: U16Field = U16Field::at("state", 2);
const REQUEST_LOCK_FIELDS: &[FieldSpec] = &[STORE.spec(), LOCK_STATE.spec()];

impl RequestLock {
    pub fn new(store: u16, state: u16) -> Self {
        Self { store, state }
    }
}

impl Message for RequestLock {
    const TITLE: Title = Title::new(b"LOCK");
    const LAYOUT: Layout = Layout::fixed(4, REQUEST_LOCK_FIELDS);

    fn write_fields(&self, w: &mut PayloadWriter<'_>) {
        STORE.write(w, self.store);
        LOCK_STATE.write(w, self.state);
    }

    fn read_fields(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            store: STORE.read(bytes)?,
            state: LOCK_STATE.read(bytes)?,
        })
    }
}

impl fmt::Display for RequestLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lock store {} to {:x}", self.store, self.state)
    }
}

/// Ask for a lock on one position (frame, clip, ...) inside a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLockPosition {
    pub store: u16,
    pub index: u16,
    pub lock_type: u16,
}

const POSITION_INDEX: U16Field = U16Field::at("index", 2);
const POSITION_TYPE: U16Field = U16Field::at("type", 4);
const POSITION_RESERVED: ReservedField = ReservedField::at("reserved", 6, 2);
const REQUEST_LOCK_POSITION_FIELDS: &[FieldSpec] = &[
    STORE.spec(),
    POSITION_INDEX.spec(),
    POSITION_TYPE.spec(),
    POSITION_RESERVED.spec(),
];

impl RequestLockPosition {
    pub fn new(store: u16, index: u16, lock_type: u16) -> Self {
        Self {
            store,
            index,
            lock_type,
        }
    }
}

impl Message for RequestLockPosition {
    const TITLE: Title = Title::new(b"PLCK");
    const LAYOUT: Layout = Layout::fixed(8, REQUEST_LOCK_POSITION_FIELDS);

    fn write_fields(&self, w: &mut PayloadWriter<'_>) {
        STORE.write(w, self.store);
        POSITION_INDEX.write(w, self.index);
        POSITION_TYPE.write(w, self.lock_type);
    }

    fn read_fields(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            store: STORE.read(bytes)?,
            index: POSITION_INDEX.read(bytes)?,
            lock_type: POSITION_TYPE.read(bytes)?,
        })
    }
}

impl fmt::Display for RequestLockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lock request for store {}; at index {}, type {}",
            self.store, self.index, self.lock_type
        )
    }
}

/// Device notification: the lock on a store was established or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeLock {
    pub store: u16,
    pub is_locked: bool,
}

const IS_LOCKED: U8Field = U8Field::at("is_locked", 2);
const CHANGE_LOCK_RESERVED: ReservedField = ReservedField::at("reserved", 3, 1);
const CHANGE_LOCK_FIELDS: &[FieldSpec] = &[
    STORE.spec(),
    IS_LOCKED.spec(),
    CHANGE_LOCK_RESERVED.spec(),
];

impl ChangeLock {
    pub fn new(store: u16, is_locked: bool) -> Self {
        Self { store, is_locked }
    }
}

impl Message for ChangeLock {
    const TITLE: Title = Title::new(b"LKST");
    const LAYOUT: Layout = Layout::fixed(4, CHANGE_LOCK_FIELDS);

    fn write_fields(&self, w: &mut PayloadWriter<'_>) {
        STORE.write(w, self.store);
        IS_LOCKED.write(w, u8::from(self.is_locked));
    }

    fn read_fields(bytes: &[u8]) -> Result<Self> {
        let is_locked = match IS_LOCKED.read(bytes)? {
            0 => false,
            1 => true,
            other => {
                return Err(WireError::InvalidEnumValue {
                    field: IS_LOCKED.name,
                    value: other.into(),
                })
            }
        };
        Ok(Self {
            store: STORE.read(bytes)?,
            is_locked,
        })
    }
}

impl fmt::Display for ChangeLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_locked {
            "established"
        } else {
            "released"
        };
        write!(f, "Lock for store {} is {}", self.store, state)
    }
}

/// Device notification: the requested lock was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObtainLock {
    pub store: u16,
}

const OBTAIN_LOCK_RESERVED: ReservedField = ReservedField::at("reserved", 2, 2);
const OBTAIN_LOCK_FIELDS: &[FieldSpec] = &[STORE.spec(), OBTAIN_LOCK_RESERVED.spec()];

impl ObtainLock {
    pub fn new(store: u16) -> Self {
        Self { store }
    }
}

impl Message for ObtainLock {
    const TITLE: Title = Title::new(b"LKOB");
    const LAYOUT: Layout = Layout::fixed(4, OBTAIN_LOCK_FIELDS);

    fn write_fields(&self, w: &mut PayloadWriter<'_>) {
        STORE.write(w, self.store);
    }

    fn read_fields(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            store: STORE.read(bytes)?,
        })
    }
}

impl fmt::Display for ObtainLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lock obtained for store {}", self.store)
    }
}
