//! # Document Emitter
//!
//! Assembles one JSON document per decoded frame and dispatches it to the
//! configured sinks. Documents carry three sections: `header` (the link and
//! APDU fields, mostly hex-rendered), `payload` (the raw COSEM value tree)
//! and `data` (the keyed measurement map from the register interpreter).
//!
//! `serde_json`'s object map is ordered, so keys come out sorted in both
//! the pretty and the compact rendering.

use std::collections::BTreeMap;
use std::io::Write;

use serde_json::{json, Value};

use crate::cosem::CosemValue;
use crate::error::HanError;
use crate::han::HdlcFrame;
use crate::registers::Measurement;
use crate::util::hex::encode_hex;

/// A destination for rendered documents. The built-in sink writes to
/// stdout; MQTT publishers and child-process pipes plug in through the same
/// trait.
pub trait FrameSink {
    fn publish(&mut self, document: &str) -> Result<(), HanError>;
}

/// Writes one rendered document per call to standard output.
pub struct StdoutSink;

impl FrameSink for StdoutSink {
    fn publish(&mut self, document: &str) -> Result<(), HanError> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        writeln!(lock, "{document}").map_err(|e| HanError::Sink(e.to_string()))
    }
}

/// Builds the document for one decoded frame.
pub fn build_document(
    frame: &HdlcFrame,
    payload: &[CosemValue],
    data: &BTreeMap<String, Measurement>,
) -> Value {
    json!({
        "header": {
            "hdlc_length": frame.format.length,
            "hdlc_segmentation": u8::from(frame.format.segmentation),
            "hdlc_type": frame.format.frame_type,
            "hdlc_frame_format": format!("{:04x}", frame.format.word),
            "hdlc_addr_client": encode_hex(&frame.client_addr),
            "hdlc_addr_server": encode_hex(&frame.server_addr),
            "hdlc_control": format!("{:02x}", frame.control),
            "hdlc_hcs": format!("{:04x}", frame.hcs),
            "llc_dst_svc_ap": format!("{:02x}", frame.llc_dst_sap),
            "llc_src_svc_ap": format!("{:02x}", frame.llc_src_sap),
            "llc_control": format!("{:02x}", frame.llc_quality),
            "apdu_tag": format!("{:02x}", frame.apdu_tag),
            "apdu_invoke_id_and_priority": format!("{:08x}", frame.invoke_id_and_priority),
            "hdlc_fcs": format!("{:04x}", frame.fcs),
        },
        "payload": payload,
        "data": data,
    })
}

/// Renders a document, one-line when `compact`, pretty-printed otherwise.
pub fn render(document: &Value, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(document)
    } else {
        serde_json::to_string_pretty(document)
    };
    rendered.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::han::frame::FrameFormat;

    fn sample_frame() -> HdlcFrame {
        HdlcFrame {
            format: FrameFormat::decode(0xA02A),
            client_addr: vec![0x41],
            server_addr: vec![0x08, 0x83],
            control: 0x13,
            hcs: 0x1304,
            llc_dst_sap: 0xE6,
            llc_src_sap: 0xE7,
            llc_quality: 0x00,
            apdu_tag: 0x0F,
            invoke_id_and_priority: 0x4000_0000,
            datetime: Vec::new(),
            payload: Vec::new(),
            fcs: 0x2477,
        }
    }

    #[test]
    fn test_header_fields() {
        let doc = build_document(&sample_frame(), &[], &BTreeMap::new());
        let header = &doc["header"];
        assert_eq!(header["hdlc_length"], 42);
        assert_eq!(header["hdlc_segmentation"], 0);
        assert_eq!(header["hdlc_type"], 10);
        assert_eq!(header["hdlc_frame_format"], "a02a");
        assert_eq!(header["hdlc_addr_client"], "41");
        assert_eq!(header["hdlc_addr_server"], "0883");
        assert_eq!(header["hdlc_hcs"], "1304");
        assert_eq!(header["apdu_invoke_id_and_priority"], "40000000");
        assert_eq!(header["hdlc_fcs"], "2477");
    }

    #[test]
    fn test_payload_octet_strings_as_hex() {
        let payload = vec![CosemValue::OctetString(vec![0x01, 0x00, 0x01, 0x07, 0x00, 0xFF])];
        let doc = build_document(&sample_frame(), &payload, &BTreeMap::new());
        assert_eq!(doc["payload"][0], "0100010700ff");
    }

    #[test]
    fn test_compact_is_one_line() {
        let doc = build_document(&sample_frame(), &[], &BTreeMap::new());
        let compact = render(&doc, true);
        assert!(!compact.contains('\n'));
        let pretty = render(&doc, false);
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_keys_sorted() {
        let doc = build_document(&sample_frame(), &[], &BTreeMap::new());
        let compact = render(&doc, true);
        let data_pos = compact.find("\"data\"").unwrap();
        let header_pos = compact.find("\"header\"").unwrap();
        let payload_pos = compact.find("\"payload\"").unwrap();
        assert!(data_pos < header_pos && header_pos < payload_pos);
    }
}
