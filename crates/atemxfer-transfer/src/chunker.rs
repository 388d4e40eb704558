use atemxfer_wire::WireError;
use bytes::Bytes;
use tracing::debug;

use crate::error::{Result, TransferError};
use crate::transfer::{RequestDataChunks, StartDataTransfer, TransferData, TransferMode};

/// Slices one asset into [`TransferData`] messages as the device asks for them.
///
/// Chunks share the asset's buffer; nothing is copied until encoding.
#[derive(Debug, Clone)]
pub struct Chunker {
    transfer_id: u16,
    data: Bytes,
    offset: usize,
}

impl Chunker {
    pub fn new(transfer_id: u16, data: impl Into<Bytes>) -> Self {
        Self {
            transfer_id,
            data: data.into(),
            offset: 0,
        }
    }

    pub fn transfer_id(&self) -> u16 {
        self.transfer_id
    }

    pub fn total_len(&self) -> usize {
        self.data.len()
    }

    /// Bytes handed out so far.
    pub fn sent(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_complete(&self) -> bool {
        self.offset == self.data.len()
    }

    /// The `StartDataTransfer` announcing this asset.
    pub fn start(
        &self,
        store: u16,
        frame_number: u16,
        mode: TransferMode,
    ) -> Result<StartDataTransfer> {
        let size = u32::try_from(self.data.len()).map_err(|_| WireError::FieldTooLarge {
            field: "size",
            len: self.data.len(),
            max: u32::MAX as usize,
        })?;
        Ok(StartDataTransfer::new(
            self.transfer_id,
            store,
            frame_number,
            size,
            mode,
        ))
    }

    /// Answer a chunk request with up to `chunk_count` chunks of at most
    /// `chunk_size` bytes. Returns an empty batch once all data is sent.
    pub fn next_batch(&mut self, request: &RequestDataChunks) -> Result<Vec<TransferData>> {
        if request.transfer_id != self.transfer_id {
            return Err(TransferError::TransferIdMismatch {
                expected: self.transfer_id,
                actual: request.transfer_id,
            });
        }
        if request.chunk_size == 0 && !self.is_complete() {
            return Err(TransferError::ZeroChunkSize(request.transfer_id));
        }

        let chunk_size = usize::from(request.chunk_size);
        let mut batch = Vec::with_capacity(usize::from(request.chunk_count));
        while batch.len() < usize::from(request.chunk_count) && !self.is_complete() {
            let end = (self.offset + chunk_size).min(self.data.len());
            batch.push(TransferData::new(
                self.transfer_id,
                self.data.slice(self.offset..end),
            )?);
            self.offset = end;
        }

        debug!(
            transfer_id = self.transfer_id,
            chunks = batch.len(),
            sent = self.offset,
            total = self.data.len(),
            "prepared chunk batch"
        );
        Ok(batch)
    }
}
