//! # Packet Codec
//!
//! Tokio codec for framing [`Packet`]s over a byte stream.
//!
//! A single socket read may deliver any fraction of a frame, so the
//! decoder is incremental: it returns `Ok(None)` until a complete length
//! prefix and body have accumulated, and only then splits a frame off the
//! buffer.
//!
//! ## Security
//! - Declared lengths above [`MAX_FRAME_LEN`] are rejected before any
//!   allocation happens.
//! - A length prefix that does not terminate within the VarInt maximum is
//!   a `MalformedVarInt`, ending the connection.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::core::packet::Packet;
use crate::core::wire;
use crate::error::{ProtocolError, Result, MAX_VAR_INT_BYTES};

/// Upper bound on a declared frame length.
///
/// Handshake-family traffic is tiny; anything near this limit is garbage.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Length-prefixed VarInt framing codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketCodec;

/// Attempts to read one VarInt from the front of `src` without consuming.
///
/// Returns `Ok(None)` when more bytes are needed.
fn peek_var_int(src: &[u8]) -> Result<Option<(u32, usize)>> {
    let mut value: u32 = 0;
    for group in 0..MAX_VAR_INT_BYTES {
        let Some(&byte) = src.get(group) else {
            return Ok(None);
        };
        value |= u32::from(byte & 0x7F) << (7 * group);
        if byte & 0x80 == 0 {
            return Ok(Some((value, group + 1)));
        }
    }
    Err(ProtocolError::MalformedVarInt)
}

impl Decoder for PacketCodec {
    type Item = Packet;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        let Some((body_len, prefix_len)) = peek_var_int(src)? else {
            return Ok(None);
        };
        let body_len = body_len as usize;
        if body_len > MAX_FRAME_LEN {
            return Err(ProtocolError::OversizedFrame(body_len));
        }
        if src.len() < prefix_len + body_len {
            src.reserve(prefix_len + body_len - src.len());
            return Ok(None);
        }

        src.advance(prefix_len);
        let mut body = src.split_to(body_len).freeze();
        // A declared length of zero has no packet ID at all; reading it
        // reports the truncation and the connection is dropped.
        let id = wire::read_var_int(&mut body)?;
        Ok(Some(Packet {
            id,
            payload: body.to_vec(),
        }))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Packet>> {
        match self.decode(src)? {
            Some(packet) => Ok(Some(packet)),
            None if src.is_empty() => Ok(None),
            // The peer vanished mid-frame: ordinary churn, not a fault.
            None => Err(ProtocolError::TruncatedRead {
                expected: src.len() + 1,
                available: src.len(),
            }),
        }
    }
}

impl Encoder<Packet> for PacketCodec {
    type Error = ProtocolError;

    fn encode(&mut self, packet: Packet, dst: &mut BytesMut) -> Result<()> {
        let body_len = packet.body_len();
        dst.reserve(wire::var_int_len(body_len as u32) + body_len);
        wire::write_var_int(dst, body_len as u32);
        wire::write_var_int(dst, packet.id);
        dst.put_slice(&packet.payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nothing_from_partial_prefix() {
        let mut codec = PacketCodec;
        let mut buf = BytesMut::from(&[0x80u8][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn decodes_frame_fed_byte_by_byte() {
        let mut codec = PacketCodec;
        let mut buf = BytesMut::new();
        let frame = Packet::with_string(0x00, "ping").to_bytes();
        for &byte in &frame[..frame.len() - 1] {
            buf.put_u8(byte);
            assert!(codec.decode(&mut buf).unwrap().is_none());
        }
        buf.put_u8(frame[frame.len() - 1]);
        let packet = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(packet.string_payload().unwrap(), "ping");
        assert!(buf.is_empty());
    }

    #[test]
    fn decodes_consecutive_frames() {
        let mut codec = PacketCodec;
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&Packet::new(0x01, vec![0xAA]).to_bytes());
        buf.extend_from_slice(&Packet::new(0x01, vec![0xBB]).to_bytes());
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().payload, vec![0xAA]);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap().payload, vec![0xBB]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn legacy_ping_frame_is_id_only() {
        let mut codec = PacketCodec;
        let mut buf = BytesMut::from(&[0x01u8, 0x00][..]);
        let packet = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(packet.id, 0x00);
        assert!(packet.payload.is_empty());
    }

    #[test]
    fn zero_length_frame_is_truncated() {
        let mut codec = PacketCodec;
        let mut buf = BytesMut::from(&[0x00u8][..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::TruncatedRead { .. })
        ));
    }

    #[test]
    fn malformed_length_prefix_fails() {
        let mut codec = PacketCodec;
        let mut buf = BytesMut::from(&[0x80u8, 0x80, 0x80, 0x80, 0x80, 0x01][..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::MalformedVarInt)
        ));
    }

    #[test]
    fn oversized_declared_length_rejected_before_body_arrives() {
        let mut codec = PacketCodec;
        let mut buf = BytesMut::new();
        wire::write_var_int(&mut buf, (MAX_FRAME_LEN + 1) as u32);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::OversizedFrame(_))
        ));
    }

    #[test]
    fn encoder_matches_to_bytes() {
        let packet = Packet::with_string(0x00, "same bytes");
        let mut codec = PacketCodec;
        let mut buf = BytesMut::new();
        codec.encode(packet.clone(), &mut buf).unwrap();
        assert_eq!(buf.to_vec(), packet.to_bytes());
    }
}
