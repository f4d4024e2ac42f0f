//! # COSEM TLV Decoder
//!
//! The APDU payload is a sequence of length-prefixed typed values. Each
//! value starts with a 1-octet type tag; arrays and structures recurse with
//! a 1-octet element count. The decoder is strict: an unknown tag or a
//! truncated value fails the whole payload and the frame is dropped.
//!
//! A symmetric encoder is provided so a decoded tree can be re-serialised
//! bit-for-bit (canonical 1-octet lengths).

use nom::bytes::complete::take;
use nom::multi::count;
use nom::number::complete::{be_i16, be_i8, be_u16, be_u32, be_u8};
use nom::IResult;
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

use crate::error::HanError;

pub const TAG_NULL: u8 = 0x00;
pub const TAG_ARRAY: u8 = 0x01;
pub const TAG_STRUCTURE: u8 = 0x02;
pub const TAG_DOUBLE_LONG_UNSIGNED: u8 = 0x06;
pub const TAG_OCTET_STRING: u8 = 0x09;
pub const TAG_VISIBLE_STRING: u8 = 0x0A;
pub const TAG_UTF8_STRING: u8 = 0x0C;
pub const TAG_INTEGER: u8 = 0x0F;
pub const TAG_LONG: u8 = 0x10;
pub const TAG_LONG_UNSIGNED: u8 = 0x12;
pub const TAG_ENUM: u8 = 0x16;

/// A COSEM data value, named after the DLMS data types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CosemValue {
    Null,
    Array(Vec<CosemValue>),
    Structure(Vec<CosemValue>),
    DoubleLongUnsigned(u32),
    OctetString(Vec<u8>),
    VisibleString(String),
    Utf8String(String),
    Integer(i8),
    Long(i16),
    LongUnsigned(u16),
    Enum(u8),
}

impl CosemValue {
    /// Parses one value, recursing into arrays and structures.
    pub fn parse(input: &[u8]) -> IResult<&[u8], CosemValue> {
        let (input, tag) = be_u8(input)?;
        match tag {
            TAG_NULL => Ok((input, CosemValue::Null)),
            TAG_ARRAY => {
                let (input, n) = be_u8(input)?;
                let (input, items) = count(CosemValue::parse, n as usize)(input)?;
                Ok((input, CosemValue::Array(items)))
            }
            TAG_STRUCTURE => {
                let (input, n) = be_u8(input)?;
                let (input, items) = count(CosemValue::parse, n as usize)(input)?;
                Ok((input, CosemValue::Structure(items)))
            }
            TAG_DOUBLE_LONG_UNSIGNED => {
                let (input, v) = be_u32(input)?;
                Ok((input, CosemValue::DoubleLongUnsigned(v)))
            }
            TAG_OCTET_STRING => {
                let (input, n) = be_u8(input)?;
                let (input, bytes) = take(n as usize)(input)?;
                Ok((input, CosemValue::OctetString(bytes.to_vec())))
            }
            TAG_VISIBLE_STRING => {
                let (input, n) = be_u8(input)?;
                let (input, bytes) = take(n as usize)(input)?;
                let s = bytes.iter().map(|&b| b as char).collect();
                Ok((input, CosemValue::VisibleString(s)))
            }
            TAG_UTF8_STRING => {
                let (input, n) = be_u8(input)?;
                let (input, s) = parse_utf8_chars(input, n as usize)?;
                Ok((input, CosemValue::Utf8String(s)))
            }
            TAG_INTEGER => {
                let (input, v) = be_i8(input)?;
                Ok((input, CosemValue::Integer(v)))
            }
            TAG_LONG => {
                let (input, v) = be_i16(input)?;
                Ok((input, CosemValue::Long(v)))
            }
            TAG_LONG_UNSIGNED => {
                let (input, v) = be_u16(input)?;
                Ok((input, CosemValue::LongUnsigned(v)))
            }
            TAG_ENUM => {
                let (input, v) = be_u8(input)?;
                Ok((input, CosemValue::Enum(v)))
            }
            _ => Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Tag,
            ))),
        }
    }

    /// Appends the canonical wire form of this value to `out`.
    ///
    /// Lengths above 255 elements/octets cannot be represented with the
    /// canonical 1-octet length and are truncated by the `as u8` casts;
    /// decoded trees never exceed them because the decoder itself reads
    /// 1-octet lengths.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            CosemValue::Null => out.push(TAG_NULL),
            CosemValue::Array(items) => {
                out.push(TAG_ARRAY);
                out.push(items.len() as u8);
                for item in items {
                    item.encode(out);
                }
            }
            CosemValue::Structure(items) => {
                out.push(TAG_STRUCTURE);
                out.push(items.len() as u8);
                for item in items {
                    item.encode(out);
                }
            }
            CosemValue::DoubleLongUnsigned(v) => {
                out.push(TAG_DOUBLE_LONG_UNSIGNED);
                out.extend_from_slice(&v.to_be_bytes());
            }
            CosemValue::OctetString(bytes) => {
                out.push(TAG_OCTET_STRING);
                out.push(bytes.len() as u8);
                out.extend_from_slice(bytes);
            }
            CosemValue::VisibleString(s) => {
                out.push(TAG_VISIBLE_STRING);
                out.push(s.len() as u8);
                out.extend(s.chars().map(|c| c as u8));
            }
            CosemValue::Utf8String(s) => {
                out.push(TAG_UTF8_STRING);
                out.push(s.chars().count() as u8);
                out.extend_from_slice(s.as_bytes());
            }
            CosemValue::Integer(v) => {
                out.push(TAG_INTEGER);
                out.push(*v as u8);
            }
            CosemValue::Long(v) => {
                out.push(TAG_LONG);
                out.extend_from_slice(&v.to_be_bytes());
            }
            CosemValue::LongUnsigned(v) => {
                out.push(TAG_LONG_UNSIGNED);
                out.extend_from_slice(&v.to_be_bytes());
            }
            CosemValue::Enum(v) => {
                out.push(TAG_ENUM);
                out.push(*v);
            }
        }
    }
}

/// Decodes the sequence of top-level values filling `payload`.
///
/// nom surfaces the innermost failure, so the reported tag and offset point
/// at the offending value even when it is nested inside arrays or
/// structures.
pub fn decode_all(payload: &[u8]) -> Result<Vec<CosemValue>, HanError> {
    let mut values = Vec::new();
    let mut rest = payload;
    while !rest.is_empty() {
        match CosemValue::parse(rest) {
            Ok((remaining, value)) => {
                values.push(value);
                rest = remaining;
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                let fail_offset = payload.len() - e.input.len();
                if e.code == nom::error::ErrorKind::Tag {
                    // The dispatch consumed the tag octet just before failing.
                    let tag_offset = fail_offset.saturating_sub(1);
                    return Err(HanError::UnknownTag {
                        tag: payload[tag_offset],
                        offset: tag_offset,
                    });
                }
                return Err(HanError::MalformedFrame(format!(
                    "truncated COSEM value at payload offset {fail_offset}"
                )));
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(HanError::MalformedFrame(
                    "truncated COSEM value".to_string(),
                ));
            }
        }
    }
    Ok(values)
}

/// Reads `nchars` UTF-8 characters, one code point at a time.
///
/// The length prefix of the 0x0C variant counts characters, not bytes. Each
/// code point is at most 4 bytes; invalid sequences decode to U+FFFD.
fn parse_utf8_chars(mut input: &[u8], nchars: usize) -> IResult<&[u8], String> {
    let mut s = String::with_capacity(nchars);
    for _ in 0..nchars {
        let (rest, first) = be_u8(input)?;
        let width = utf8_sequence_len(first);
        if width <= 1 {
            if width == 1 {
                s.push(first as char);
            } else {
                s.push(char::REPLACEMENT_CHARACTER);
            }
            input = rest;
            continue;
        }
        let (rest, tail) = take(width - 1)(rest)?;
        let mut buf = [0u8; 4];
        buf[0] = first;
        buf[1..width].copy_from_slice(tail);
        match core::str::from_utf8(&buf[..width]) {
            Ok(cs) => s.push_str(cs),
            Err(_) => s.push(char::REPLACEMENT_CHARACTER),
        }
        input = rest;
    }
    Ok((input, s))
}

/// Expected sequence length from a UTF-8 leading byte; 0 for a continuation
/// or invalid leading byte.
fn utf8_sequence_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

impl Serialize for CosemValue {
    /// Renders the raw value tree for the `payload` document field:
    /// octet-strings as hex, strings as strings, numbers as numbers.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CosemValue::Null => serializer.serialize_none(),
            CosemValue::Array(items) | CosemValue::Structure(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            CosemValue::DoubleLongUnsigned(v) => serializer.serialize_u32(*v),
            CosemValue::OctetString(bytes) => serializer.serialize_str(&hex::encode(bytes)),
            CosemValue::VisibleString(s) | CosemValue::Utf8String(s) => {
                serializer.serialize_str(s)
            }
            CosemValue::Integer(v) => serializer.serialize_i8(*v),
            CosemValue::Long(v) => serializer.serialize_i16(*v),
            CosemValue::LongUnsigned(v) => serializer.serialize_u16(*v),
            CosemValue::Enum(v) => serializer.serialize_u8(*v),
        }
    }
}
