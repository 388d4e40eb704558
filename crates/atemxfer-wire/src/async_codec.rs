//! `tokio_util` codec for framed commands.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::command::{decode_command, encode_raw_command, CommandConfig, RawCommand};
use crate::error::WireError;

/// Errors surfaced by [`CommandCodec`] inside `FramedRead`/`FramedWrite`.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("command I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stream codec yielding one [`RawCommand`] per framed command.
#[derive(Debug, Clone, Default)]
pub struct CommandCodec {
    config: CommandConfig,
}

impl CommandCodec {
    pub fn new(config: CommandConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CommandConfig {
        &self.config
    }
}

impl Decoder for CommandCodec {
    type Item = RawCommand;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(decode_command(src, &self.config)?)
    }
}

impl Encoder<RawCommand> for CommandCodec {
    type Error = CodecError;

    fn encode(&mut self, item: RawCommand, dst: &mut BytesMut) -> Result<(), Self::Error> {
        Ok(encode_raw_command(item.title, &item.payload, dst)?)
    }
}
