use atemxfer_transfer::TransferMessage;
use atemxfer_wire::{split_commands, CommandConfig, RawCommand, WireError};
use tracing::{debug, warn};

use crate::cmd::UnframeArgs;
use crate::exit::{parse_hex, wire_error, CliResult, SUCCESS};
use crate::output::{print_messages, MessageOutput, OutputFormat};

pub fn run(args: UnframeArgs, format: OutputFormat) -> CliResult<i32> {
    let packet = parse_hex(&args.hex)?;
    let config = CommandConfig {
        max_command_size: args.max_command_size,
    };
    let commands =
        split_commands(&packet, &config).map_err(|err| wire_error("cannot split commands", err))?;
    debug!(commands = commands.len(), "split packet");

    let messages = decode_all(&commands, args.strict)?;
    let outputs: Vec<MessageOutput> = messages.iter().map(MessageOutput::new).collect();
    print_messages(&outputs, format);
    Ok(SUCCESS)
}

fn decode_all(commands: &[RawCommand], strict: bool) -> CliResult<Vec<TransferMessage>> {
    let mut messages = Vec::with_capacity(commands.len());
    for command in commands {
        match TransferMessage::from_command(command) {
            Ok(message) => messages.push(message),
            Err(WireError::UnknownTitle(title)) if !strict => {
                warn!(
                    %title,
                    len = command.payload.len(),
                    "skipping command outside the transfer family"
                );
            }
            Err(err) => {
                return Err(wire_error(&format!("cannot decode {}", command.title), err));
            }
        }
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use atemxfer_wire::Title;

    use super::*;
    use crate::exit::{DATA_INVALID, USAGE};

    fn commands() -> Vec<RawCommand> {
        vec![
            RawCommand::new(Title::new(b"LKOB"), vec![0x00, 0x01, 0x00, 0x00]),
            RawCommand::new(Title::new(b"PrgI"), vec![0x00, 0x00, 0x00, 0x01]),
            RawCommand::new(Title::new(b"FTDC"), vec![0x00, 0x02, 0x00, 0x00]),
        ]
    }

    #[test]
    fn skips_unknown_titles_by_default() {
        let messages = decode_all(&commands(), false).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].transfer_id(), Some(2));
    }

    #[test]
    fn strict_mode_fails_on_unknown_titles() {
        let err = decode_all(&commands(), true).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.contains("PrgI"));
    }

    #[test]
    fn malformed_payload_always_fails() {
        let bad = vec![RawCommand::new(Title::new(b"LKST"), vec![0x00, 0x01, 0x07, 0x00])];
        let err = decode_all(&bad, false).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        assert_ne!(err.code, USAGE);
    }
}
