use std::fs;

use atemxfer_transfer::{Chunker, RequestDataChunks, SetFileDescription, TransferMessage};
use bytes::BytesMut;
use tracing::info;

use crate::cmd::ChunkArgs;
use crate::exit::{io_error, transfer_error, wire_error, CliResult, SUCCESS};
use crate::output::{print_messages, print_raw, MessageOutput, OutputFormat};

pub fn run(args: ChunkArgs, format: OutputFormat) -> CliResult<i32> {
    let data = fs::read(&args.file)
        .map_err(|err| io_error(&format!("failed reading {}", args.file.display()), err))?;
    let messages = build(&args, data)?;

    info!(
        transfer_id = args.transfer_id,
        commands = messages.len(),
        "built upload commands"
    );

    match format {
        OutputFormat::Raw => {
            let mut wire = BytesMut::new();
            for message in &messages {
                let command = message.to_command();
                atemxfer_wire::encode_raw_command(command.title, &command.payload, &mut wire)
                    .map_err(|err| wire_error("cannot frame command", err))?;
            }
            print_raw(&wire);
        }
        _ => {
            let outputs: Vec<MessageOutput> = messages.iter().map(MessageOutput::new).collect();
            print_messages(&outputs, format);
        }
    }
    Ok(SUCCESS)
}

/// The start command, the optional description, then the first chunk batch.
fn build(args: &ChunkArgs, data: Vec<u8>) -> CliResult<Vec<TransferMessage>> {
    let mut chunker = Chunker::new(args.transfer_id, data);
    let mut messages: Vec<TransferMessage> = Vec::new();

    let start = chunker
        .start(args.store, args.frame, args.mode.into())
        .map_err(|err| transfer_error("cannot start transfer", err))?;
    messages.push(start.into());

    if let Some(name) = &args.name {
        let description = args.description.clone().unwrap_or_default();
        let describe = SetFileDescription::new(args.transfer_id, name.clone(), description)
            .map_err(|err| wire_error("invalid file description", err))?;
        messages.push(describe.into());
    }

    let request = RequestDataChunks::new(args.transfer_id, args.chunk_size, args.chunk_count);
    let batch = chunker
        .next_batch(&request)
        .map_err(|err| transfer_error("cannot slice file", err))?;
    messages.extend(batch.into_iter().map(TransferMessage::from));

    Ok(messages)
}
