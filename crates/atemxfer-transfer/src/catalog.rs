//! Title-based dispatch over the transfer message family.

use std::fmt;

use atemxfer_wire::{Layout, Message, RawCommand, Result, Title, WireError};
use bytes::Bytes;

use crate::description::SetFileDescription;
use crate::lock::{ChangeLock, ObtainLock, RequestLock, RequestLockPosition};
use crate::transfer::{FinishDataTransfer, RequestDataChunks, StartDataTransfer, TransferData};

/// Which side normally sends a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Controller to device.
    Request,
    /// Device to controller.
    Response,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Request => "request",
            Direction::Response => "response",
        }
    }
}

/// Static description of one message type.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub title: Title,
    pub name: &'static str,
    pub direction: Direction,
    pub layout: Layout,
}

const fn entry<M: Message>(name: &'static str, direction: Direction) -> CatalogEntry {
    CatalogEntry {
        title: M::TITLE,
        name,
        direction,
        layout: M::LAYOUT,
    }
}

/// Every message type this crate understands.
pub static CATALOG: [CatalogEntry; 9] = [
    entry::<RequestLock>("RequestLock", Direction::Request),
    entry::<RequestLockPosition>("RequestLockPosition", Direction::Request),
    entry::<ChangeLock>("ChangeLock", Direction::Response),
    entry::<ObtainLock>("ObtainLock", Direction::Response),
    entry::<StartDataTransfer>("StartDataTransfer", Direction::Request),
    entry::<RequestDataChunks>("RequestDataChunks", Direction::Request),
    entry::<SetFileDescription>("SetFileDescription", Direction::Request),
    entry::<TransferData>("TransferData", Direction::Request),
    entry::<FinishDataTransfer>("FinishDataTransfer", Direction::Response),
];

/// Look up a catalog entry by title.
pub fn lookup(title: Title) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.title == title)
}

/// Any message of the transfer family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferMessage {
    RequestLock(RequestLock),
    RequestLockPosition(RequestLockPosition),
    ChangeLock(ChangeLock),
    ObtainLock(ObtainLock),
    StartDataTransfer(StartDataTransfer),
    RequestDataChunks(RequestDataChunks),
    SetFileDescription(SetFileDescription),
    TransferData(TransferData),
    FinishDataTransfer(FinishDataTransfer),
}

macro_rules! for_each_message {
    ($value:expr, $msg:ident => $body:expr) => {
        match $value {
            TransferMessage::RequestLock($msg) => $body,
            TransferMessage::RequestLockPosition($msg) => $body,
            TransferMessage::ChangeLock($msg) => $body,
            TransferMessage::ObtainLock($msg) => $body,
            TransferMessage::StartDataTransfer($msg) => $body,
            TransferMessage::RequestDataChunks($msg) => $body,
            TransferMessage::SetFileDescription($msg) => $body,
            TransferMessage::TransferData($msg) => $body,
            TransferMessage::FinishDataTransfer($msg) => $body,
        }
    };
}

impl TransferMessage {
    /// Decode a title-stripped payload by its title.
    pub fn decode(title: Title, payload: &[u8]) -> Result<Self> {
        let message = match title.as_bytes() {
            b"LOCK" => Self::RequestLock(RequestLock::decode(payload)?),
            b"PLCK" => Self::RequestLockPosition(RequestLockPosition::decode(payload)?),
            b"LKST" => Self::ChangeLock(ChangeLock::decode(payload)?),
            b"LKOB" => Self::ObtainLock(ObtainLock::decode(payload)?),
            b"FTSD" => Self::StartDataTransfer(StartDataTransfer::decode(payload)?),
            b"FTCD" => Self::RequestDataChunks(RequestDataChunks::decode(payload)?),
            b"FTFD" => Self::SetFileDescription(SetFileDescription::decode(payload)?),
            b"FTDa" => Self::TransferData(TransferData::decode(payload)?),
            b"FTDC" => Self::FinishDataTransfer(FinishDataTransfer::decode(payload)?),
            _ => return Err(WireError::UnknownTitle(title)),
        };
        Ok(message)
    }

    /// Decode a framed command.
    pub fn from_command(command: &RawCommand) -> Result<Self> {
        Self::decode(command.title, &command.payload)
    }

    pub fn title(&self) -> Title {
        for_each_message!(self, msg => msg.title())
    }

    pub fn layout(&self) -> Layout {
        for_each_message!(self, msg => layout_of(msg))
    }

    pub fn encode(&self) -> Bytes {
        for_each_message!(self, msg => msg.encode())
    }

    pub fn to_command(&self) -> RawCommand {
        RawCommand::new(self.title(), self.encode())
    }

    /// Transfer ID for messages that belong to a transfer.
    pub fn transfer_id(&self) -> Option<u16> {
        match self {
            Self::StartDataTransfer(msg) => Some(msg.transfer_id),
            Self::RequestDataChunks(msg) => Some(msg.transfer_id),
            Self::SetFileDescription(msg) => Some(msg.transfer_id()),
            Self::TransferData(msg) => Some(msg.transfer_id()),
            Self::FinishDataTransfer(msg) => Some(msg.transfer_id),
            _ => None,
        }
    }
}

fn layout_of<M: Message>(_: &M) -> Layout {
    M::LAYOUT
}

impl fmt::Display for TransferMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for_each_message!(self, msg => fmt::Display::fmt(msg, f))
    }
}

macro_rules! impl_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for TransferMessage {
                fn from(msg: $variant) -> Self {
                    TransferMessage::$variant(msg)
                }
            }
        )*
    };
}

impl_from!(
    RequestLock,
    RequestLockPosition,
    ChangeLock,
    ObtainLock,
    StartDataTransfer,
    RequestDataChunks,
    SetFileDescription,
    TransferData,
    FinishDataTransfer,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::TransferMode;

    fn samples() -> Vec<TransferMessage> {
        vec![
            RequestLock::new(1, 1).into(),
            RequestLockPosition::new(1, 2, 3).into(),
            ChangeLock::new(1, true).into(),
            ObtainLock::new(1).into(),
            StartDataTransfer::new(5, 1, 2, 300, TransferMode::Write2).into(),
            RequestDataChunks::new(5, 150, 2).into(),
            SetFileDescription::new(5, "still", "frame").unwrap().into(),
            TransferData::new(5, vec![1, 2, 3]).unwrap().into(),
            FinishDataTransfer::new(5).into(),
        ]
    }

    #[test]
    fn catalog_titles_are_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert_ne!(a.title, b.title);
            }
        }
    }

    #[test]
    fn catalog_sizes_match_wire_contract() {
        let sizes: Vec<_> = CATALOG
            .iter()
            .map(|e| (e.title.to_string(), e.layout.min_size, e.layout.variable))
            .collect();
        assert_eq!(
            sizes,
            vec![
                ("LOCK".to_string(), 4, false),
                ("PLCK".to_string(), 8, false),
                ("LKST".to_string(), 4, false),
                ("LKOB".to_string(), 4, false),
                ("FTSD".to_string(), 16, false),
                ("FTCD".to_string(), 12, false),
                ("FTFD".to_string(), 212, false),
                ("FTDa".to_string(), 4, true),
                ("FTDC".to_string(), 4, false),
            ]
        );
    }

    #[test]
    fn layouts_tile_the_payload() {
        for entry in CATALOG {
            let mut next = 0;
            for field in entry.layout.fields {
                assert_eq!(field.offset, next, "{} field {}", entry.title, field.name);
                next = field.offset + field.len;
            }
            assert_eq!(next, entry.layout.min_size, "{}", entry.title);
        }
    }

    #[test]
    fn dispatch_roundtrips_every_message() {
        for msg in samples() {
            let decoded = TransferMessage::decode(msg.title(), &msg.encode()).unwrap();
            assert_eq!(decoded, msg);
            assert_eq!(decoded.layout(), lookup(msg.title()).unwrap().layout);
        }
    }

    #[test]
    fn every_message_rejects_one_byte_short() {
        for msg in samples() {
            let min = msg.layout().min_size;
            let short = vec![0u8; min - 1];
            assert!(
                matches!(
                    TransferMessage::decode(msg.title(), &short),
                    Err(WireError::TruncatedBuffer { .. })
                ),
                "{}",
                msg.title()
            );
        }
    }

    #[test]
    fn command_roundtrip() {
        let msg: TransferMessage = FinishDataTransfer::new(9).into();
        let command = msg.to_command();
        assert_eq!(command.title, Title::new(b"FTDC"));
        assert_eq!(TransferMessage::from_command(&command).unwrap(), msg);
    }

    #[test]
    fn unknown_title_is_rejected() {
        assert_eq!(
            TransferMessage::decode(Title::new(b"PrgI"), &[0; 8]),
            Err(WireError::UnknownTitle(Title::new(b"PrgI")))
        );
    }

    #[test]
    fn transfer_id_only_for_transfer_messages() {
        let ids: Vec<_> = samples().iter().map(|m| m.transfer_id()).collect();
        assert_eq!(
            ids,
            vec![
                None,
                None,
                None,
                None,
                Some(5),
                Some(5),
                Some(5),
                Some(5),
                Some(5)
            ]
        );
    }

    #[test]
    fn display_delegates_to_message() {
        let msg: TransferMessage = ChangeLock::new(2, false).into();
        assert_eq!(msg.to_string(), "Lock for store 2 is released");
    }
}
