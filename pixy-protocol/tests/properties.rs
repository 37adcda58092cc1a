//! Property tests for the packet codec

use pixy_protocol::{
    checksum, parse_blocks, verify_checksum, Block, ProtocolError, Request, ResponseHeader,
    BLOCK_SIZE, MAX_BLOCKS, NO_BLOCKS_SENTINEL,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn request_fields_roundtrip_through_header(
        command in any::<u8>(),
        payload in proptest::collection::vec(any::<u8>(), 0..=255),
    ) {
        let encoded = Request::new(command, &payload).unwrap().encode_to_vec().unwrap();
        prop_assert_eq!(&encoded[..2], &[0xAE, 0xC1]);
        prop_assert_eq!(&encoded[4..], &payload[..]);

        // Re-frame the request fields the way the camera echoes them
        let header = [0xAF, 0xC1, encoded[2], encoded[3], 0, 0];
        let decoded = ResponseHeader::decode(&header).unwrap();
        prop_assert_eq!(decoded.command_type, command);
        prop_assert_eq!(decoded.length as usize, payload.len());
    }

    #[test]
    fn oversized_payload_rejected(len in 256usize..600) {
        let payload = vec![0u8; len];
        prop_assert_eq!(Request::new(20, &payload), Err(ProtocolError::PayloadTooLarge));
    }

    #[test]
    fn checksum_accepts_iff_sum_matches(
        payload in proptest::collection::vec(any::<u8>(), 0..=255),
        expected in any::<u16>(),
    ) {
        let sum = payload.iter().map(|&b| b as u64).sum::<u64>() % 65536;
        prop_assert_eq!(verify_checksum(expected, &payload).is_ok(), sum == expected as u64);
    }

    #[test]
    fn single_byte_mutation_rejected(
        payload in proptest::collection::vec(any::<u8>(), 1..=255),
        index in any::<prop::sample::Index>(),
        delta in 1u8..=255,
    ) {
        let expected = checksum(&payload);
        let mut mutated = payload.clone();
        let i = index.index(mutated.len());
        mutated[i] = mutated[i].wrapping_add(delta);

        let rejected = matches!(
            verify_checksum(expected, &mutated),
            Err(ProtocolError::ChecksumMismatch { .. })
        );
        prop_assert!(rejected);
    }

    #[test]
    fn invalid_sync_rejected(
        sync in any::<[u8; 2]>().prop_filter("not checksum sync", |s| *s != [0xAF, 0xC1]),
        rest in any::<[u8; 4]>(),
    ) {
        let header = [sync[0], sync[1], rest[0], rest[1], rest[2], rest[3]];
        prop_assert_eq!(ResponseHeader::decode(&header), Err(ProtocolError::InvalidSync));
    }

    #[test]
    fn single_record_decodes_little_endian(
        record in any::<[u8; BLOCK_SIZE]>().prop_filter("not sentinel", |r| r[0] != NO_BLOCKS_SENTINEL),
    ) {
        let blocks = parse_blocks(&record).unwrap();
        prop_assert_eq!(blocks.len(), 1);

        let le = |i: usize| u16::from_le_bytes([record[i], record[i + 1]]);
        prop_assert_eq!(
            blocks[0],
            Block {
                signature: le(0),
                x: le(2),
                y: le(4),
                width: le(6),
                height: le(8),
                area: le(10),
                index: record[12],
                age: record[13],
            }
        );
    }

    #[test]
    fn sentinel_first_byte_yields_no_blocks(
        rest in proptest::collection::vec(any::<u8>(), 0..=254),
    ) {
        let mut payload = vec![NO_BLOCKS_SENTINEL];
        payload.extend(rest);
        prop_assert!(parse_blocks(&payload).unwrap().is_empty());
    }

    #[test]
    fn trailing_bytes_ignored(
        payload in proptest::collection::vec(1u8..NO_BLOCKS_SENTINEL, 0..=255),
    ) {
        // No byte is the sentinel, so every complete record is a block
        prop_assert_eq!(parse_blocks(&payload).unwrap().len(), payload.len() / BLOCK_SIZE);
    }

    #[test]
    fn block_list_longer_than_one_response_rejected(
        payload in proptest::collection::vec(
            1u8..NO_BLOCKS_SENTINEL,
            (MAX_BLOCKS + 1) * BLOCK_SIZE..600,
        ),
    ) {
        let rejected = matches!(
            parse_blocks(&payload),
            Err(ProtocolError::MalformedLength { .. })
        );
        prop_assert!(rejected);
    }
}
