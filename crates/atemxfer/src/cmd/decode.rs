use atemxfer_transfer::{RequestDataChunks, TransferMessage};
use atemxfer_wire::{Message, Title};
use tracing::debug;

use crate::cmd::DecodeArgs;
use crate::exit::{parse_hex, wire_error, CliResult, SUCCESS};
use crate::output::{print_messages, MessageOutput, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let title = Title::parse(&args.title).map_err(|err| wire_error("invalid title", err))?;
    let payload = parse_hex(&args.hex)?;
    debug!(%title, len = payload.len(), "decoding payload");

    let message = decode(title, &payload, args.strict_magic)
        .map_err(|err| wire_error(&format!("cannot decode {title}"), err))?;

    print_messages(&[MessageOutput::new(&message)], format);
    Ok(SUCCESS)
}

fn decode(
    title: Title,
    payload: &[u8],
    strict_magic: bool,
) -> atemxfer_wire::Result<TransferMessage> {
    if strict_magic && title == RequestDataChunks::TITLE {
        return RequestDataChunks::decode_strict(payload).map(TransferMessage::from);
    }
    TransferMessage::decode(title, payload)
}

#[cfg(test)]
mod tests {
    use atemxfer_wire::WireError;

    use super::*;

    const NON_STANDARD: [u8; 12] = [
        0x00, 0x01, 0x1a, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x02, 0x8c, 0x00,
    ];

    #[test]
    fn lenient_decode_keeps_magic() {
        let msg = decode(RequestDataChunks::TITLE, &NON_STANDARD, false).unwrap();
        assert_eq!(msg.encode().as_ref(), &NON_STANDARD);
    }

    #[test]
    fn strict_decode_rejects_magic() {
        assert!(matches!(
            decode(RequestDataChunks::TITLE, &NON_STANDARD, true),
            Err(WireError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn strict_flag_ignored_for_other_titles() {
        let msg = decode(Title::new(b"FTDC"), &[0x00, 0x03, 0x00, 0x00], true).unwrap();
        assert_eq!(msg.transfer_id(), Some(3));
    }
}
