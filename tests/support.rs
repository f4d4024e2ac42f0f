//! Shared builders for constructing valid HAN push frames in tests.
//!
//! Frames built here use the canonical header of a captured Aidon push
//! (client 0x41, server 0x08 0x83, control 0x13, LLC E6 E7 00, APDU tag
//! 0x0F with invoke-id 0x40000000) and carry correct HCS/FCS values
//! computed over the assembled content.

use han_rs::cosem::CosemValue;
use han_rs::util::crc16_x25;

/// Assembles a complete delimited frame around the encoded payload values.
pub fn build_frame(frame_type: u8, payload_values: &[CosemValue]) -> Vec<u8> {
    build_frame_with_datetime(frame_type, &[], payload_values)
}

/// Same as [`build_frame`] with explicit APDU datetime octets.
pub fn build_frame_with_datetime(
    frame_type: u8,
    datetime: &[u8],
    payload_values: &[CosemValue],
) -> Vec<u8> {
    let mut payload = Vec::new();
    for value in payload_values {
        value.encode(&mut payload);
    }

    // format(2) + client(1) + server(2) + control(1) + HCS(2) + LLC(3)
    // + APDU prefix(6 + datetime) + payload + FCS(2)
    let length = 2 + 1 + 2 + 1 + 2 + 3 + 6 + datetime.len() + payload.len() + 2;
    let word = (u16::from(frame_type) << 12) | (length as u16);

    let mut content = Vec::with_capacity(length);
    content.extend_from_slice(&word.to_be_bytes());
    content.push(0x41);
    content.extend_from_slice(&[0x08, 0x83]);
    content.push(0x13);
    let hcs = crc16_x25(&content);
    content.extend_from_slice(&hcs.to_le_bytes());
    content.extend_from_slice(&[0xE6, 0xE7, 0x00]);
    content.push(0x0F);
    content.extend_from_slice(&0x4000_0000u32.to_be_bytes());
    content.push(datetime.len() as u8);
    content.extend_from_slice(datetime);
    content.extend_from_slice(&payload);
    let fcs = crc16_x25(&content);
    content.extend_from_slice(&fcs.to_le_bytes());

    let mut frame = Vec::with_capacity(length + 2);
    frame.push(0x7E);
    frame.extend_from_slice(&content);
    frame.push(0x7E);
    frame
}

/// A six-octet OBIS code as the octet-string the meters send.
pub fn obis(a: u8, b: u8, c: u8, d: u8, e: u8, f: u8) -> CosemValue {
    CosemValue::OctetString(vec![a, b, c, d, e, f])
}
