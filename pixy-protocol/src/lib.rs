//! Pixy (CMUcam5) I2C Protocol
//!
//! This crate implements the request/response packet protocol spoken by
//! the Pixy camera. Every exchange is one request followed by a response
//! header and a checksummed payload.
//!
//! # Protocol Overview
//!
//! Requests:
//! ```text
//! ┌───────────┬──────┬────────┬─────────────┐
//! │ SYNC      │ TYPE │ LENGTH │ PAYLOAD     │
//! │ AE C1     │ 1B   │ 1B     │ 0–255B      │
//! └───────────┴──────┴────────┴─────────────┘
//! ```
//!
//! Responses:
//! ```text
//! ┌───────────┬──────┬────────┬──────────┐   ┌─────────────┐
//! │ SYNC      │ TYPE │ LENGTH │ CHECKSUM │ + │ PAYLOAD     │
//! │ AF C1     │ 1B   │ 1B     │ 2B (LE)  │   │ LENGTH B    │
//! └───────────┴──────┴────────┴──────────┘   └─────────────┘
//! ```
//!
//! The checksum is the sum of the payload bytes, truncated to 16 bits.

#![no_std]
#![deny(unsafe_code)]

pub mod blocks;
pub mod messages;
pub mod packet;

pub use blocks::{parse_blocks, Block, Blocks, BLOCK_SIZE, MAX_BLOCKS, NO_BLOCKS_SENTINEL};
pub use messages::{CameraRequest, Command, Resolution, Rgb, Version};
pub use packet::{
    checksum, encode_request, verify_checksum, ProtocolError, Request, ResponseHeader,
    HEADER_SIZE, MAX_PAYLOAD_SIZE, MAX_REQUEST_SIZE, SYNC_CHECKSUM, SYNC_NO_CHECKSUM,
};
