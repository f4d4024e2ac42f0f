//! Integration tests for the COSEM TLV decoder: the captured payload, the
//! character-counted UTF-8 variant, and the encode/decode round-trip.

mod support;

use han_rs::cosem::{decode_all, CosemValue};
use han_rs::han::{FrameScanner, HdlcFrame};
use han_rs::util::hex::hex_to_bytes;
use han_rs::HanError;

#[test]
fn test_decode_captured_payload() {
    // COSEM payload of the captured Aidon push frame.
    let payload = hex_to_bytes("0101 0203 0906 0100010700ff 06 00000e90 0202 0f00 161b");
    let values = decode_all(&payload).unwrap();
    assert_eq!(
        values,
        vec![CosemValue::Array(vec![CosemValue::Structure(vec![
            CosemValue::OctetString(vec![0x01, 0x00, 0x01, 0x07, 0x00, 0xFF]),
            CosemValue::DoubleLongUnsigned(3728),
            CosemValue::Structure(vec![CosemValue::Integer(0), CosemValue::Enum(27)]),
        ])])]
    );
}

#[test]
fn test_decode_multiple_top_level_values() {
    // timestamp octet-string followed by a structure body
    let payload = hex_to_bytes("0902 aabb 0202 0a02 4142 0600000001");
    let values = decode_all(&payload).unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0], CosemValue::OctetString(vec![0xAA, 0xBB]));
    assert_eq!(
        values[1],
        CosemValue::Structure(vec![
            CosemValue::VisibleString("AB".to_string()),
            CosemValue::DoubleLongUnsigned(1),
        ])
    );
}

#[test]
fn test_unknown_tag_is_strict_error() {
    let payload = hex_to_bytes("0101 0203 0906 0100010700ff 1700 0202 0f00 161b");
    let err = decode_all(&payload).unwrap_err();
    assert!(matches!(err, HanError::UnknownTag { tag: 0x17, .. }));
}

#[test]
fn test_truncated_structure_is_error() {
    // structure announces 3 members but only 1 follows
    let payload = hex_to_bytes("0203 0600000001");
    assert!(decode_all(&payload).is_err());
}

#[test]
fn test_utf8_multibyte_character_count() {
    // 0x0C counts characters: "Ws°C" is 4 characters across 5 bytes.
    let mut payload = vec![0x0C, 0x04];
    payload.extend_from_slice("Ws°C".as_bytes());
    let values = decode_all(&payload).unwrap();
    assert_eq!(values, vec![CosemValue::Utf8String("Ws°C".to_string())]);
}

#[test]
fn test_utf8_invalid_sequence_yields_replacement() {
    // An overlong-style invalid pair decodes to replacement characters
    // without desynchronising the following value.
    let payload = vec![0x0C, 0x02, 0xFF, b'k', 0x16, 0x21];
    let values = decode_all(&payload).unwrap();
    assert_eq!(
        values,
        vec![
            CosemValue::Utf8String("\u{FFFD}k".to_string()),
            CosemValue::Enum(33),
        ]
    );
}

#[tokio::test]
async fn test_round_trip_rebuilds_identical_frame() {
    // Decoding a frame and re-encoding the value tree with the same header
    // parameters must reproduce the original octets bit-for-bit.
    let tree = vec![CosemValue::Array(vec![
        CosemValue::Structure(vec![
            support::obis(1, 0, 1, 7, 0, 255),
            CosemValue::DoubleLongUnsigned(3728),
            CosemValue::Structure(vec![CosemValue::Integer(0), CosemValue::Enum(27)]),
        ]),
        CosemValue::Structure(vec![
            support::obis(0, 0, 96, 1, 0, 255),
            CosemValue::VisibleString("7359992890941742".to_string()),
        ]),
    ])];
    let original = support::build_frame(10, &tree);

    let mut scanner = FrameScanner::new(original.as_slice());
    let raw = scanner.next_frame().await.unwrap().unwrap();
    let frame = HdlcFrame::parse(&raw.bytes, raw.format, false).unwrap();
    let decoded = decode_all(&frame.payload).unwrap();

    let rebuilt = support::build_frame(raw.format.frame_type, &decoded);
    assert_eq!(rebuilt, original);
}
