//! # HAN Decoder Error Handling
//!
//! This module defines the HanError enum, which represents the different
//! error types that can occur while decoding the HAN telemetry stream.

use thiserror::Error;

/// Represents the different error types that can occur in the HAN decoder.
#[derive(Debug, Error)]
pub enum HanError {
    /// The byte source ended in the middle of a frame.
    #[error("byte source ended mid-frame")]
    ShortRead,

    /// A frame is structurally impossible to parse.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// The full-frame check sequence did not match.
    #[error("frame checksum mismatch: expected {expected:04X}, calculated {calculated:04X}")]
    FrameChecksum { expected: u16, calculated: u16 },

    /// The header check sequence did not match.
    #[error("header checksum mismatch: expected {expected:04X}, calculated {calculated:04X}")]
    HeaderChecksum { expected: u16, calculated: u16 },

    /// An unknown COSEM type tag was encountered in the payload.
    #[error("unknown COSEM type tag 0x{tag:02X} at payload offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    /// The configured vendor map name is not one of the supported
    /// dictionaries.
    #[error("unsupported vendor map: {0}")]
    UnsupportedVendor(String),

    /// Indicates an error related to the serial port communication.
    #[error("serial port error: {0}")]
    SerialPort(String),

    /// An error from the underlying byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A sink failed to accept a document.
    #[error("sink error: {0}")]
    Sink(String),
}

impl HanError {
    /// Checksum failures are recoverable per-frame; the stream continues.
    pub fn is_checksum(&self) -> bool {
        matches!(
            self,
            HanError::FrameChecksum { .. } | HanError::HeaderChecksum { .. }
        )
    }
}
