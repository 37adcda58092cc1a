//! Packet encoding and decoding for the Pixy I2C protocol.
//!
//! Request format (host → camera):
//! - SYNC (2 bytes): 0xC1AE little-endian, "no checksum" marker
//! - TYPE (1 byte): command code
//! - LENGTH (1 byte): payload length (0-255)
//! - PAYLOAD (0-255 bytes): command arguments
//!
//! Response header (camera → host):
//! - SYNC (2 bytes): 0xC1AF little-endian, "checksum" marker
//! - TYPE (1 byte): response type
//! - LENGTH (1 byte): payload length that follows the header
//! - CHECKSUM (2 bytes): little-endian sum of all payload bytes
//!
//! The response payload is read separately, `LENGTH` bytes after the header.

use heapless::Vec;

/// Sync marker for packets without a checksum field (requests)
pub const SYNC_NO_CHECKSUM: [u8; 2] = [0xAE, 0xC1];

/// Sync marker for packets carrying a checksum field (responses)
pub const SYNC_CHECKSUM: [u8; 2] = [0xAF, 0xC1];

/// Response header size in bytes
pub const HEADER_SIZE: usize = 6;

/// Request header size in bytes (no checksum field)
pub const REQUEST_HEADER_SIZE: usize = 4;

/// Maximum payload size in bytes (single length byte)
pub const MAX_PAYLOAD_SIZE: usize = 255;

/// Maximum complete request size (SYNC + TYPE + LENGTH + MAX_PAYLOAD)
pub const MAX_REQUEST_SIZE: usize = REQUEST_HEADER_SIZE + MAX_PAYLOAD_SIZE;

/// Errors that can occur while encoding requests or decoding responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Header sync bytes are not the checksum-mode marker
    InvalidSync,
    /// Sum of payload bytes does not match the header checksum
    ChecksumMismatch {
        /// Checksum declared in the header
        expected: u16,
        /// Low 16 bits of the payload byte sum
        computed: u16,
    },
    /// A header or payload has fewer (or more) bytes than required
    MalformedLength {
        /// Bytes required
        expected: usize,
        /// Bytes available
        actual: usize,
    },
    /// Request payload exceeds the single-byte length field
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// An outgoing request packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Command code
    pub command_type: u8,
    /// Argument bytes
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Request {
    /// Create a request with the given command code and arguments
    pub fn new(command_type: u8, payload: &[u8]) -> Result<Self, ProtocolError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| ProtocolError::PayloadTooLarge)?;

        Ok(Self {
            command_type,
            payload: payload_vec,
        })
    }

    /// Create a request with no arguments
    pub fn empty(command_type: u8) -> Self {
        Self {
            command_type,
            payload: Vec::new(),
        }
    }

    /// Number of bytes this request occupies on the wire
    pub fn encoded_len(&self) -> usize {
        REQUEST_HEADER_SIZE + self.payload.len()
    }

    /// Encode this request into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, ProtocolError> {
        encode_request(self.command_type, &self.payload, buffer)
    }

    /// Encode this request into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_REQUEST_SIZE>, ProtocolError> {
        let mut buffer = [0u8; MAX_REQUEST_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| ProtocolError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// Encode a request directly from a command code and argument slice
///
/// Fails with `PayloadTooLarge` rather than truncating the length byte.
pub fn encode_request(
    command_type: u8,
    payload: &[u8],
    buffer: &mut [u8],
) -> Result<usize, ProtocolError> {
    let length = u8::try_from(payload.len()).map_err(|_| ProtocolError::PayloadTooLarge)?;
    let packet_len = REQUEST_HEADER_SIZE + payload.len();
    if buffer.len() < packet_len {
        return Err(ProtocolError::BufferTooSmall);
    }

    buffer[..2].copy_from_slice(&SYNC_NO_CHECKSUM);
    buffer[2] = command_type;
    buffer[3] = length;
    buffer[REQUEST_HEADER_SIZE..packet_len].copy_from_slice(payload);

    Ok(packet_len)
}

/// Decoded response header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResponseHeader {
    /// Response type byte
    pub command_type: u8,
    /// Number of payload bytes that follow the header
    pub length: u8,
    /// Expected sum of the payload bytes
    pub checksum: u16,
}

impl ResponseHeader {
    /// Decode a 6-byte response header
    ///
    /// Only the checksum-mode sync marker is accepted.
    pub fn decode(header: &[u8]) -> Result<Self, ProtocolError> {
        if header.len() != HEADER_SIZE {
            return Err(ProtocolError::MalformedLength {
                expected: HEADER_SIZE,
                actual: header.len(),
            });
        }

        if header[..2] != SYNC_CHECKSUM {
            return Err(ProtocolError::InvalidSync);
        }

        Ok(Self {
            command_type: header[2],
            length: header[3],
            checksum: u16::from_le_bytes([header[4], header[5]]),
        })
    }

    /// Encode this header with the checksum-mode sync marker
    ///
    /// Used when simulating the camera side of an exchange.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let [ck_lo, ck_hi] = self.checksum.to_le_bytes();
        [
            SYNC_CHECKSUM[0],
            SYNC_CHECKSUM[1],
            self.command_type,
            self.length,
            ck_lo,
            ck_hi,
        ]
    }

    /// Build the header the camera would send for `payload`
    pub fn for_payload(command_type: u8, payload: &[u8]) -> Result<Self, ProtocolError> {
        let length = u8::try_from(payload.len()).map_err(|_| ProtocolError::PayloadTooLarge)?;
        Ok(Self {
            command_type,
            length,
            checksum: checksum(payload),
        })
    }

    /// Check `payload` against this header's checksum
    pub fn verify(&self, payload: &[u8]) -> Result<(), ProtocolError> {
        verify_checksum(self.checksum, payload)
    }
}

/// Sum of all payload bytes, truncated to the 16-bit checksum field
///
/// Accumulates in 32 bits and keeps the low half, matching the camera's
/// 16-bit accumulator.
pub fn checksum(payload: &[u8]) -> u16 {
    let sum: u32 = payload.iter().map(|&b| u32::from(b)).sum();
    sum as u16
}

/// Verify a payload against the checksum declared in its header
pub fn verify_checksum(expected: u16, payload: &[u8]) -> Result<(), ProtocolError> {
    let computed = checksum(payload);
    if computed != expected {
        return Err(ProtocolError::ChecksumMismatch { expected, computed });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty_payload() {
        let request = Request::empty(14); // version
        let mut buffer = [0u8; 8];
        let len = request.encode(&mut buffer).unwrap();

        assert_eq!(len, 4);
        assert_eq!(&buffer[..4], &[0xAE, 0xC1, 14, 0]);
    }

    #[test]
    fn test_encode_with_payload() {
        let request = Request::new(32, &[1, 255]).unwrap();
        let encoded = request.encode_to_vec().unwrap();

        assert_eq!(&encoded[..], &[0xAE, 0xC1, 32, 2, 1, 255]);
        assert_eq!(request.encoded_len(), 6);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let request = Request::new(20, &[1, 2, 3]).unwrap();
        let mut buffer = [0u8; 6];
        assert_eq!(request.encode(&mut buffer), Err(ProtocolError::BufferTooSmall));
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(
            Request::new(20, &large_payload),
            Err(ProtocolError::PayloadTooLarge)
        );

        let mut buffer = [0u8; MAX_REQUEST_SIZE + 1];
        assert_eq!(
            encode_request(20, &large_payload, &mut buffer),
            Err(ProtocolError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_max_payload_fits() {
        let payload = [0x11u8; MAX_PAYLOAD_SIZE];
        let encoded = Request::new(20, &payload).unwrap().encode_to_vec().unwrap();
        assert_eq!(encoded.len(), MAX_REQUEST_SIZE);
        assert_eq!(encoded[3], 255);
    }

    #[test]
    fn test_decode_header() {
        let header = ResponseHeader::decode(&[0xAF, 0xC1, 32, 14, 0x34, 0x12]).unwrap();
        assert_eq!(header.command_type, 32);
        assert_eq!(header.length, 14);
        assert_eq!(header.checksum, 0x1234);
    }

    #[test]
    fn test_decode_header_invalid_sync() {
        assert_eq!(
            ResponseHeader::decode(&[0x00, 0x00, 14, 0, 0, 0]),
            Err(ProtocolError::InvalidSync)
        );
    }

    #[test]
    fn test_decode_header_rejects_request_sync() {
        // Requests use 0xAE; the camera always answers with 0xAF
        assert_eq!(
            ResponseHeader::decode(&[0xAE, 0xC1, 14, 0, 0, 0]),
            Err(ProtocolError::InvalidSync)
        );
    }

    #[test]
    fn test_decode_header_wrong_length() {
        assert_eq!(
            ResponseHeader::decode(&[0xAF, 0xC1, 14, 0]),
            Err(ProtocolError::MalformedLength {
                expected: 6,
                actual: 4
            })
        );
    }

    #[test]
    fn test_header_to_bytes_roundtrip() {
        let header = ResponseHeader::for_payload(12, &[0x40, 0x01, 0xF0, 0x00]).unwrap();
        assert_eq!(header.checksum, 0x40 + 0x01 + 0xF0);
        assert_eq!(ResponseHeader::decode(&header.to_bytes()), Ok(header));
    }

    #[test]
    fn test_checksum_wraps_at_16_bits() {
        // 300 * 0xFF = 76500 = 0x12AD4
        let payload = [0xFFu8; 300];
        assert_eq!(checksum(&payload), 0x2AD4);
        assert!(verify_checksum(0x2AD4, &payload).is_ok());
    }

    #[test]
    fn test_verify_checksum_mismatch() {
        assert_eq!(
            verify_checksum(7, &[1, 2, 3]),
            Err(ProtocolError::ChecksumMismatch {
                expected: 7,
                computed: 6
            })
        );
    }

    #[test]
    fn test_empty_payload_checksum_is_zero() {
        assert!(verify_checksum(0, &[]).is_ok());
    }
}
