//! # HDLC Link-Layer Parser
//!
//! Validates a candidate frame produced by the scanner and exposes the
//! APDU it carries: checks both CRC-16/X-25 check sequences (full-frame FCS
//! first, then the header HCS), walks the variable-length address fields,
//! strips the LLC sub-header, and reads the APDU prefix. The remaining
//! bytes up to the trailing FCS are the COSEM payload.
//!
//! The type nibble of the frame-format word is surfaced but never used to
//! reject a frame; deployed meters emit values outside the documented
//! type-3 framing.

use log::{debug, warn};

use crate::constants::{
    HDLC_FORMAT_LENGTH_MASK, HDLC_FORMAT_SEGMENTATION_SHIFT, HDLC_FORMAT_TYPE_SHIFT,
    HDLC_MIN_FRAME_LEN, LLC_DST_SAP, LLC_HEADER_LEN, LLC_QUALITY, LLC_SRC_SAP,
};
use crate::error::HanError;
use crate::util::crc16_x25;

/// The decoded 16-bit frame-format word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    /// The raw big-endian word.
    pub word: u16,
    /// Total frame length excluding delimiters, including this word and the
    /// FCS (low 11 bits).
    pub length: u16,
    /// More segments follow (bit 11).
    pub segmentation: bool,
    /// HDLC frame type (bits 12..15).
    pub frame_type: u8,
}

impl FrameFormat {
    /// Extracts the format fields: mask, then shift.
    pub fn decode(word: u16) -> Self {
        Self {
            word,
            length: word & HDLC_FORMAT_LENGTH_MASK,
            segmentation: (word >> HDLC_FORMAT_SEGMENTATION_SHIFT) & 1 == 1,
            frame_type: ((word >> HDLC_FORMAT_TYPE_SHIFT) & 0xF) as u8,
        }
    }
}

/// A fully parsed HDLC frame with its COSEM payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdlcFrame {
    pub format: FrameFormat,
    /// Client address octets as received (terminating octet has LSB=1).
    pub client_addr: Vec<u8>,
    /// Server address octets as received.
    pub server_addr: Vec<u8>,
    pub control: u8,
    /// Header check sequence as transmitted.
    pub hcs: u16,
    pub llc_dst_sap: u8,
    pub llc_src_sap: u8,
    pub llc_quality: u8,
    pub apdu_tag: u8,
    pub invoke_id_and_priority: u32,
    /// APDU datetime octets; empty when the datetime length is zero.
    pub datetime: Vec<u8>,
    /// The COSEM payload between the APDU prefix and the FCS.
    pub payload: Vec<u8>,
    /// Frame check sequence as transmitted.
    pub fcs: u16,
}

impl HdlcFrame {
    /// Parses and validates `bytes` (the frame content between the flag
    /// delimiters: format word through FCS).
    ///
    /// With `ignore_checksum` a mismatching HCS or FCS is logged as a
    /// warning and decoding continues as if the frame were valid.
    pub fn parse(
        bytes: &[u8],
        format: FrameFormat,
        ignore_checksum: bool,
    ) -> Result<HdlcFrame, HanError> {
        let len = bytes.len();
        if len < HDLC_MIN_FRAME_LEN {
            return Err(HanError::MalformedFrame(format!(
                "frame of {len} octets cannot carry an HDLC header"
            )));
        }

        let fcs = u16::from_le_bytes([bytes[len - 2], bytes[len - 1]]);
        let fcs_calc = crc16_x25(&bytes[..len - 2]);
        if fcs != fcs_calc {
            if !ignore_checksum {
                return Err(HanError::FrameChecksum {
                    expected: fcs,
                    calculated: fcs_calc,
                });
            }
            warn!("ignoring FCS mismatch: expected {fcs:04X}, calculated {fcs_calc:04X}");
        }

        // The FCS is not part of any field that follows.
        let body = &bytes[..len - 2];
        let mut pos = 2usize;

        let client_addr = read_address(body, &mut pos)?;
        let server_addr = read_address(body, &mut pos)?;
        let control = *body
            .get(pos)
            .ok_or_else(|| truncated("control field"))?;
        pos += 1;

        let hcs_calc = crc16_x25(&bytes[..pos]);
        let hcs_bytes = take_bytes(body, &mut pos, 2, "header check sequence")?;
        let hcs = u16::from_le_bytes([hcs_bytes[0], hcs_bytes[1]]);
        if hcs != hcs_calc {
            if !ignore_checksum {
                return Err(HanError::HeaderChecksum {
                    expected: hcs,
                    calculated: hcs_calc,
                });
            }
            warn!("ignoring HCS mismatch: expected {hcs:04X}, calculated {hcs_calc:04X}");
        }

        let llc = take_bytes(body, &mut pos, LLC_HEADER_LEN, "LLC sub-header")?;
        let (llc_dst_sap, llc_src_sap, llc_quality) = (llc[0], llc[1], llc[2]);
        if (llc_dst_sap, llc_src_sap, llc_quality) != (LLC_DST_SAP, LLC_SRC_SAP, LLC_QUALITY) {
            debug!(
                "unexpected LLC sub-header {llc_dst_sap:02x} {llc_src_sap:02x} {llc_quality:02x}"
            );
        }

        let apdu_tag = *body.get(pos).ok_or_else(|| truncated("APDU tag"))?;
        pos += 1;
        let invoke = take_bytes(body, &mut pos, 4, "invoke-id-and-priority")?;
        let invoke_id_and_priority =
            u32::from_be_bytes([invoke[0], invoke[1], invoke[2], invoke[3]]);
        let datetime_len = *body
            .get(pos)
            .ok_or_else(|| truncated("APDU datetime length"))? as usize;
        pos += 1;
        let datetime = take_bytes(body, &mut pos, datetime_len, "APDU datetime")?.to_vec();

        let payload = body[pos..].to_vec();

        Ok(HdlcFrame {
            format,
            client_addr,
            server_addr,
            control,
            hcs,
            llc_dst_sap,
            llc_src_sap,
            llc_quality,
            apdu_tag,
            invoke_id_and_priority,
            datetime,
            payload,
            fcs,
        })
    }
}

/// Reads a variable-length HDLC address: octets accumulate until one with
/// its least-significant bit set terminates the field.
fn read_address(body: &[u8], pos: &mut usize) -> Result<Vec<u8>, HanError> {
    let start = *pos;
    loop {
        let octet = *body
            .get(*pos)
            .ok_or_else(|| truncated("address field"))?;
        *pos += 1;
        if octet & 1 == 1 {
            return Ok(body[start..*pos].to_vec());
        }
    }
}

fn take_bytes<'a>(
    body: &'a [u8],
    pos: &mut usize,
    n: usize,
    what: &str,
) -> Result<&'a [u8], HanError> {
    let end = pos
        .checked_add(n)
        .filter(|&end| end <= body.len())
        .ok_or_else(|| truncated(what))?;
    let slice = &body[*pos..end];
    *pos = end;
    Ok(slice)
}

fn truncated(what: &str) -> HanError {
    HanError::MalformedFrame(format!("frame truncated within {what}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::hex::hex_to_bytes;

    // Captured Aidon push frame (content between the 0x7E delimiters).
    const AIDON_FRAME: &str =
        "a02a410883130413e6e7000f400000000001010203090601000107 00ff0600000e9002020f00161b7724";

    #[test]
    fn test_decode_format_word() {
        let format = FrameFormat::decode(0xA02A);
        assert_eq!(format.length, 42);
        assert!(!format.segmentation);
        assert_eq!(format.frame_type, 10);
    }

    #[test]
    fn test_decode_format_word_segmented() {
        let format = FrameFormat::decode(0xA800 | 0x123);
        assert!(format.segmentation);
        assert_eq!(format.length, 0x123);
        assert_eq!(format.frame_type, 10);
    }

    #[test]
    fn test_parse_valid_frame() {
        let bytes = hex_to_bytes(AIDON_FRAME);
        let format = FrameFormat::decode(0xA02A);
        let frame = HdlcFrame::parse(&bytes, format, false).unwrap();

        assert_eq!(frame.client_addr, vec![0x41]);
        assert_eq!(frame.server_addr, vec![0x08, 0x83]);
        assert_eq!(frame.control, 0x13);
        assert_eq!(frame.hcs, 0x1304);
        assert_eq!(frame.llc_dst_sap, 0xE6);
        assert_eq!(frame.llc_src_sap, 0xE7);
        assert_eq!(frame.llc_quality, 0x00);
        assert_eq!(frame.apdu_tag, 0x0F);
        assert_eq!(frame.invoke_id_and_priority, 0x4000_0000);
        assert!(frame.datetime.is_empty());
        assert_eq!(frame.fcs, 0x2477);
        assert_eq!(frame.payload.len(), 23);
        assert_eq!(frame.payload[0], 0x01);
    }

    #[test]
    fn test_frame_checksum_mismatch() {
        let mut bytes = hex_to_bytes(AIDON_FRAME);
        let payload_offset = 15;
        bytes[payload_offset] ^= 0x01;
        let err = HdlcFrame::parse(&bytes, FrameFormat::decode(0xA02A), false).unwrap_err();
        assert!(matches!(err, HanError::FrameChecksum { .. }));
    }

    #[test]
    fn test_checksum_mismatch_ignored() {
        let mut bytes = hex_to_bytes(AIDON_FRAME);
        bytes[15] ^= 0x01;
        let frame = HdlcFrame::parse(&bytes, FrameFormat::decode(0xA02A), true).unwrap();
        assert_eq!(frame.control, 0x13);
    }

    #[test]
    fn test_too_short() {
        let err =
            HdlcFrame::parse(&[0xA0, 0x05, 0x41, 0x01, 0x13], FrameFormat::decode(0xA005), false)
                .unwrap_err();
        assert!(matches!(err, HanError::MalformedFrame(_)));
    }
}
