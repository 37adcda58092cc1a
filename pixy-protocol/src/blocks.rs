//! Detected block records
//!
//! A block-list payload is a run of fixed 14-byte records, one per tracked
//! object in the current frame:
//!
//! ```text
//! ┌─────┬─────┬─────┬───────┬────────┬──────┬───────┬─────┐
//! │ SIG │ X   │ Y   │ WIDTH │ HEIGHT │ AREA │ INDEX │ AGE │
//! │ u16 │ u16 │ u16 │ u16   │ u16    │ u16  │ u8    │ u8  │
//! └─────┴─────┴─────┴───────┴────────┴──────┴───────┴─────┘
//! ```
//!
//! All u16 fields are little-endian. A record starting with
//! [`NO_BLOCKS_SENTINEL`] marks the end of the list.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::packet::{ProtocolError, MAX_PAYLOAD_SIZE};

/// Size of one block record in bytes
pub const BLOCK_SIZE: usize = 14;

/// Most records a single response payload can carry
pub const MAX_BLOCKS: usize = MAX_PAYLOAD_SIZE / BLOCK_SIZE;

/// First byte of a record that means "no (more) blocks"
pub const NO_BLOCKS_SENTINEL: u8 = 0xFE;

/// One tracked object in the current camera frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Block {
    /// Color signature id
    pub signature: u16,
    /// Center x in pixels
    pub x: u16,
    /// Center y in pixels
    pub y: u16,
    /// Bounding box width
    pub width: u16,
    /// Bounding box height
    pub height: u16,
    /// Area reported by the camera
    pub area: u16,
    /// Tracking index, reused by the camera while the object stays in view
    pub index: u8,
    /// Frames the object has been tracked for (saturates at 255)
    pub age: u8,
}

impl Block {
    /// Decode one 14-byte record
    pub fn from_record(record: &[u8; BLOCK_SIZE]) -> Self {
        let word = |i: usize| u16::from_le_bytes([record[i], record[i + 1]]);
        Self {
            signature: word(0),
            x: word(2),
            y: word(4),
            width: word(6),
            height: word(8),
            area: word(10),
            index: record[12],
            age: record[13],
        }
    }

    /// Encode this block as a 14-byte record
    pub fn to_record(&self) -> [u8; BLOCK_SIZE] {
        let mut record = [0u8; BLOCK_SIZE];
        let words = [
            self.signature,
            self.x,
            self.y,
            self.width,
            self.height,
            self.area,
        ];
        for (chunk, word) in record.chunks_exact_mut(2).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        record[12] = self.index;
        record[13] = self.age;
        record
    }
}

/// Iterator over the block records of a payload
///
/// Yields records in order and stops at the sentinel or at the last
/// complete record. Trailing bytes that do not fill a record are ignored.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    records: core::slice::ChunksExact<'a, u8>,
    done: bool,
}

impl<'a> Blocks<'a> {
    /// Iterate the records in `payload`
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            records: payload.chunks_exact(BLOCK_SIZE),
            done: false,
        }
    }
}

impl Iterator for Blocks<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        if self.done {
            return None;
        }

        let record = self.records.next()?;
        if record[0] == NO_BLOCKS_SENTINEL {
            self.done = true;
            return None;
        }

        // chunks_exact guarantees BLOCK_SIZE bytes
        let record: &[u8; BLOCK_SIZE] = record.try_into().ok()?;
        Some(Block::from_record(record))
    }
}

impl core::iter::FusedIterator for Blocks<'_> {}

/// Parse a block-list payload into a list of blocks
///
/// A single response carries at most [`MAX_BLOCKS`] records. A payload
/// holding more than that is rejected with `MalformedLength` instead of
/// being cut short; use [`Blocks`] to walk longer buffers.
pub fn parse_blocks(payload: &[u8]) -> Result<Vec<Block, MAX_BLOCKS>, ProtocolError> {
    let mut blocks = Vec::new();
    for block in Blocks::new(payload) {
        blocks.push(block).map_err(|_| ProtocolError::MalformedLength {
            expected: MAX_BLOCKS * BLOCK_SIZE,
            actual: payload.len(),
        })?;
    }
    Ok(blocks)
}
