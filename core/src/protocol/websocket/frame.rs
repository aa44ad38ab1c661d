/*
 * frame.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Wireprobe, a raw HTTP and WebSocket probing client.
 *
 * Wireprobe is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Wireprobe is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Wireprobe.  If not, see <http://www.gnu.org/licenses/>.
 */

//! WebSocket frame format (RFC 6455 §5): encoder for send (always masked), decoder for
//! receive (masked or unmasked).

use bytes::{Buf, BufMut, BytesMut};
use std::io;

pub const OP_TEXT: u8 = 1;
pub const OP_CLOSE: u8 = 8;

/// Largest payload the decoder will buffer. A larger declared length is treated as garbage.
pub const MAX_FRAME_PAYLOAD: u64 = 16 * 1024 * 1024;

/// One decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub fin: bool,
    pub opcode: u8,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Payload as text; invalid UTF-8 sequences become U+FFFD.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Fresh random masking key. Never reuse one across frames.
pub fn new_mask_key() -> io::Result<[u8; 4]> {
    let mut key = [0u8; 4];
    getrandom::getrandom(&mut key).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(key)
}

/// XOR `data` in place with `key`, cycling the key by index mod 4.
pub fn apply_mask(data: &mut [u8], key: &[u8; 4]) {
    for (i, b) in data.iter_mut().enumerate() {
        *b ^= key[i % 4];
    }
}

/// Encode one final frame (client → server: masked with `mask_key`).
pub fn encode_frame(opcode: u8, payload: &[u8], mask_key: &[u8; 4], out: &mut BytesMut) {
    let len = payload.len();
    out.reserve(14 + len);
    out.put_u8(0x80 | (opcode & 0x0f));
    if len < 126 {
        out.put_u8(0x80 | (len as u8));
    } else if len <= u16::MAX as usize {
        out.put_u8(0x80 | 126);
        out.put_u16(len as u16);
    } else {
        out.put_u8(0x80 | 127);
        out.put_u64(len as u64);
    }
    out.put_slice(mask_key);
    let start = out.len();
    out.put_slice(payload);
    apply_mask(&mut out[start..], mask_key);
}

/// Decode one frame from the front of `buf`.
///
/// Returns `Ok(None)` without consuming anything when `buf` does not yet hold the whole
/// frame; the caller reads more and retries. On success the frame's bytes are consumed.
pub fn decode_frame(buf: &mut BytesMut) -> io::Result<Option<Frame>> {
    if buf.len() < 2 {
        return Ok(None);
    }
    let b0 = buf[0];
    let b1 = buf[1];
    let masked = (b1 & 0x80) != 0;
    let (payload_len, mut header_len) = match b1 & 0x7f {
        126 => {
            if buf.len() < 4 {
                return Ok(None);
            }
            (u16::from_be_bytes([buf[2], buf[3]]) as u64, 4)
        }
        127 => {
            if buf.len() < 10 {
                return Ok(None);
            }
            let mut len = [0u8; 8];
            len.copy_from_slice(&buf[2..10]);
            (u64::from_be_bytes(len), 10)
        }
        n => (n as u64, 2),
    };
    if payload_len > MAX_FRAME_PAYLOAD {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame payload of {} bytes exceeds limit", payload_len),
        ));
    }
    let mask_key = if masked {
        if buf.len() < header_len + 4 {
            return Ok(None);
        }
        let key = [
            buf[header_len],
            buf[header_len + 1],
            buf[header_len + 2],
            buf[header_len + 3],
        ];
        header_len += 4;
        Some(key)
    } else {
        None
    };
    let payload_len = payload_len as usize;
    if buf.len() < header_len + payload_len {
        return Ok(None);
    }

    buf.advance(header_len);
    let mut payload = buf.split_to(payload_len).to_vec();
    if let Some(key) = mask_key {
        apply_mask(&mut payload, &key);
    }
    Ok(Some(Frame {
        fin: (b0 & 0x80) != 0,
        opcode: b0 & 0x0f,
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(len: usize) {
        let text: String = (0..len).map(|i| (b'a' + (i % 26) as u8) as char).collect();
        let key = new_mask_key().unwrap();
        let mut buf = BytesMut::new();
        encode_frame(OP_TEXT, text.as_bytes(), &key, &mut buf);
        let frame = decode_frame(&mut buf).unwrap().unwrap();
        assert!(frame.fin);
        assert_eq!(frame.opcode, OP_TEXT);
        assert_eq!(frame.text(), text);
        assert!(buf.is_empty());
    }

    #[test]
    fn roundtrip_length_boundaries() {
        for len in [0, 1, 125, 126, 127, 65535, 65536, 70000] {
            roundtrip(len);
        }
    }

    #[test]
    fn header_encoding_by_length() {
        let key = [1, 2, 3, 4];
        let mut buf = BytesMut::new();
        encode_frame(OP_TEXT, &[0u8; 125], &key, &mut buf);
        assert_eq!(&buf[..2], &[0x81, 0x80 | 125]);
        assert_eq!(&buf[2..6], &key);

        let mut buf = BytesMut::new();
        encode_frame(OP_TEXT, &[0u8; 126], &key, &mut buf);
        assert_eq!(&buf[..4], &[0x81, 0xfe, 0x00, 0x7e]);

        let mut buf = BytesMut::new();
        encode_frame(OP_TEXT, &[0u8; 65536], &key, &mut buf);
        assert_eq!(&buf[..10], &[0x81, 0xff, 0, 0, 0, 0, 0, 1, 0, 0]);
        assert_eq!(buf.len(), 14 + 65536);
    }

    #[test]
    fn payload_is_xored_with_key() {
        let key = [0xff, 0x00, 0x0f, 0xf0];
        let mut buf = BytesMut::new();
        encode_frame(OP_TEXT, b"abcde", &key, &mut buf);
        assert_eq!(
            &buf[6..],
            &[b'a' ^ 0xff, b'b', b'c' ^ 0x0f, b'd' ^ 0xf0, b'e' ^ 0xff]
        );
    }

    #[test]
    fn decodes_unmasked_server_frame() {
        let mut buf = BytesMut::new();
        buf.put_u8(0x81);
        buf.put_u8(126);
        buf.put_u16(300);
        buf.put_slice(&[b'q'; 300]);
        let frame = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!(frame.payload, vec![b'q'; 300]);
    }

    #[test]
    fn incomplete_frame_is_not_consumed() {
        let mut full = BytesMut::new();
        encode_frame(OP_TEXT, b"hello world", &[9, 8, 7, 6], &mut full);
        for cut in 0..full.len() {
            let mut partial = BytesMut::from(&full[..cut]);
            assert!(decode_frame(&mut partial).unwrap().is_none());
            assert_eq!(partial.len(), cut);
        }
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let frame = Frame {
            fin: true,
            opcode: OP_TEXT,
            payload: vec![b'o', b'k', 0xff, 0xfe],
        };
        assert_eq!(frame.text(), "ok\u{fffd}\u{fffd}");
    }

    #[test]
    fn oversized_length_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u8(0x81);
        buf.put_u8(127);
        buf.put_u64(MAX_FRAME_PAYLOAD + 1);
        let err = decode_frame(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn mask_keys_differ() {
        // 2^-32 chance of a false failure per pair; three draws make it negligible
        let keys: Vec<[u8; 4]> = (0..3).map(|_| new_mask_key().unwrap()).collect();
        assert!(keys[0] != keys[1] || keys[1] != keys[2]);
    }
}
