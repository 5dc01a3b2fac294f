#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for the wire layer through the public API: boundary
//! values, crafted garbage, and framing invariants.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use signpost::core::codec::{PacketCodec, MAX_FRAME_LEN};
use signpost::core::packet::Packet;
use signpost::core::wire;
use signpost::error::ProtocolError;

// ============================================================================
// VARINT EDGE CASES
// ============================================================================

#[test]
fn varint_roundtrip_full_range_sample() {
    // every byte-length boundary plus a spread across the u32 range
    let mut values: Vec<u32> = vec![
        0,
        0x7F,
        0x80,
        0x3FFF,
        0x4000,
        0x1F_FFFF,
        0x20_0000,
        0xFFF_FFFF,
        0x1000_0000,
        u32::MAX,
    ];
    values.extend((0..32).map(|shift| 1u32 << shift));

    for value in values {
        let mut buf = BytesMut::new();
        wire::write_var_int(&mut buf, value);
        assert!(buf.len() <= 5, "{value} encoded to {} bytes", buf.len());
        assert_eq!(buf.len(), wire::var_int_len(value));
        assert_eq!(wire::read_var_int(&mut buf.freeze()).unwrap(), value);
    }
}

#[test]
fn varint_six_continuation_bytes_is_malformed() {
    let raw: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
    let mut buf = raw;
    assert!(matches!(
        wire::read_var_int(&mut buf),
        Err(ProtocolError::MalformedVarInt)
    ));
}

#[test]
fn varint_empty_source_is_truncated() {
    let mut buf: &[u8] = &[];
    assert!(matches!(
        wire::read_var_int(&mut buf),
        Err(ProtocolError::TruncatedRead { .. })
    ));
}

// ============================================================================
// STRING EDGE CASES
// ============================================================================

#[test]
fn string_roundtrip_includes_empty_and_multibyte() {
    for s in ["", "a", "server list", "émoji 🎉", "\u{10FFFF}"] {
        let mut buf = BytesMut::new();
        wire::write_string(&mut buf, s);
        assert_eq!(wire::read_string(&mut buf.freeze()).unwrap(), s);
    }
}

#[test]
fn empty_string_encodes_to_exactly_one_zero_byte() {
    let mut buf = BytesMut::new();
    wire::write_string(&mut buf, "");
    assert_eq!(&buf[..], &[0x00][..]);
}

#[test]
fn string_declared_longer_than_source_is_truncated() {
    // claims 10 bytes, provides 2
    let raw: &[u8] = &[0x0A, b'h', b'i'];
    let mut buf = raw;
    assert!(matches!(
        wire::read_string(&mut buf),
        Err(ProtocolError::TruncatedRead {
            expected: 10,
            available: 2
        })
    ));
}

// ============================================================================
// FRAME EDGE CASES
// ============================================================================

#[test]
fn status_frame_build_is_idempotent() {
    let payload = r#"{"description":{"text":"same"},"players":{"online":0,"max":20},"version":{"name":"x","protocol":765}}"#;
    let first = Packet::with_string(0x00, payload).to_bytes();
    let second = Packet::with_string(0x00, payload).to_bytes();
    assert_eq!(first, second);
}

#[test]
fn large_payload_roundtrips_through_codec() {
    let packet = Packet::new(0x01, vec![0xAB; 20_000]);
    let mut codec = PacketCodec;
    let mut buf = BytesMut::new();
    codec.encode(packet.clone(), &mut buf).unwrap();
    let decoded = codec.decode(&mut buf).unwrap().unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn declared_length_above_cap_is_rejected() {
    let mut buf = BytesMut::new();
    wire::write_var_int(&mut buf, (MAX_FRAME_LEN as u32) + 1);
    buf.extend_from_slice(&[0u8; 64]);
    let mut codec = PacketCodec;
    assert!(matches!(
        codec.decode(&mut buf),
        Err(ProtocolError::OversizedFrame(_))
    ));
}

#[test]
fn multibyte_length_prefix_frames_decode() {
    // a payload long enough that the length prefix itself takes 2 bytes
    let packet = Packet::new(0x00, vec![0x55; 300]);
    let bytes = packet.to_bytes();
    assert_eq!(wire::var_int_len(packet.body_len() as u32), 2);

    let mut codec = PacketCodec;
    let mut buf = BytesMut::from(&bytes[..]);
    assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), packet);
}

#[test]
fn packet_id_consumes_part_of_declared_length() {
    // declared length 3 = two-byte id varint would be wrong for id 0x0A;
    // id 0x0A is one byte, leaving two payload bytes
    let packet = Packet::new(0x0A, vec![0xEE, 0xFF]);
    let bytes = packet.to_bytes();
    assert_eq!(bytes[0], 3);
    let reparsed = Packet::from_bytes(&bytes).unwrap();
    assert_eq!(reparsed.payload, vec![0xEE, 0xFF]);
}
