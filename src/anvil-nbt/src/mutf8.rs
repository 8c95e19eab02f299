//! Java "modified UTF-8" as used by NBT strings.
//!
//! Differs from standard UTF-8 in two ways: U+0000 is written as `C0 80`, and
//! characters outside the BMP are written as two 3-byte surrogate halves.

use crate::error::{NbtError, Result};

pub(crate) fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        match ch as u32 {
            0 => out.extend_from_slice(&[0xC0, 0x80]),
            c if c < 0x80 => out.push(c as u8),
            c if c < 0x800 => {
                out.push(0xC0 | (c >> 6) as u8);
                out.push(0x80 | (c & 0x3F) as u8);
            }
            c if c < 0x10000 => push_three(&mut out, c as u16),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    push_three(&mut out, *unit);
                }
            }
        }
    }
    out
}

fn push_three(out: &mut Vec<u8>, unit: u16) {
    out.push(0xE0 | (unit >> 12) as u8);
    out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
    out.push(0x80 | (unit & 0x3F) as u8);
}

pub(crate) fn decode(bytes: &[u8]) -> Result<String> {
    // Fast path: plain ASCII/UTF-8 without NUL or surrogates decodes identically.
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok(s.to_string());
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];
        if b0 & 0x80 == 0 {
            units.push(b0 as u16);
            i += 1;
        } else if b0 & 0xE0 == 0xC0 {
            let b1 = continuation(bytes, i + 1)?;
            units.push((((b0 & 0x1F) as u16) << 6) | b1 as u16);
            i += 2;
        } else if b0 & 0xF0 == 0xE0 {
            let b1 = continuation(bytes, i + 1)?;
            let b2 = continuation(bytes, i + 2)?;
            units.push((((b0 & 0x0F) as u16) << 12) | ((b1 as u16) << 6) | b2 as u16);
            i += 3;
        } else if b0 & 0xF8 == 0xF0 {
            // Standard 4-byte UTF-8, as written by encoders that skip surrogates.
            let mut code = (b0 & 0x07) as u32;
            for at in i + 1..i + 4 {
                code = (code << 6) | continuation(bytes, at)? as u32;
            }
            let ch = char::from_u32(code).ok_or(NbtError::InvalidString)?;
            let mut pair = [0u16; 2];
            units.extend_from_slice(ch.encode_utf16(&mut pair));
            i += 4;
        } else {
            return Err(NbtError::InvalidString);
        }
    }
    String::from_utf16(&units).map_err(|_| NbtError::InvalidString)
}

fn continuation(bytes: &[u8], at: usize) -> Result<u8> {
    match bytes.get(at) {
        Some(b) if b & 0xC0 == 0x80 => Ok(b & 0x3F),
        _ => Err(NbtError::InvalidString),
    }
}
