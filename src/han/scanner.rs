//! # HDLC Frame Scanner
//!
//! Recovers frame boundaries from a noisy byte stream. The scanner hunts
//! for the `0x7E` flag, reads the 16-bit frame-format word, and accumulates
//! the number of octets the length field announces. Anything that does not
//! look like the start of a frame is discarded and the hunt resumes at the
//! next byte, so noise between frames never desynchronises the stream for
//! longer than one frame attempt.
//!
//! End-of-stream while hunting is a clean termination; end-of-stream in the
//! middle of a committed frame is a `ShortRead`.

use bytes::{BufMut, BytesMut};
use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

use crate::constants::HDLC_FLAG;
use crate::error::HanError;
use crate::han::frame::FrameFormat;

/// Counters kept while scanning, reported when the stream ends.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScannerStats {
    /// Octets dropped while hunting for a flag.
    pub bytes_discarded: u64,
    /// Complete candidate frames handed downstream.
    pub frames_yielded: u64,
    /// Aborted frame attempts (implausible format word).
    pub resyncs: u64,
}

/// A candidate frame: the octets between the flag delimiters together with
/// the decoded frame-format word.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Frame content from the format word through the FCS.
    pub bytes: Vec<u8>,
    pub format: FrameFormat,
}

/// Extracts candidate HDLC frames from a byte source.
pub struct FrameScanner<R> {
    reader: BufReader<R>,
    stats: ScannerStats,
}

impl<R: AsyncRead + Unpin> FrameScanner<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
            stats: ScannerStats::default(),
        }
    }

    pub fn stats(&self) -> ScannerStats {
        self.stats
    }

    /// Returns the next candidate frame, `None` on a clean end of stream.
    pub async fn next_frame(&mut self) -> Result<Option<RawFrame>, HanError> {
        loop {
            // Hunt for an opening flag.
            let byte = match self.read_byte().await? {
                Some(b) => b,
                None => return Ok(None),
            };
            if byte != HDLC_FLAG {
                self.stats.bytes_discarded += 1;
                trace!("discarding non-flag octet 0x{byte:02X}");
                continue;
            }

            // The octet after the flag: either the high byte of the format
            // word, or another flag when the previous frame's stop flag was
            // just consumed.
            let mut high = match self.read_byte().await? {
                Some(b) => b,
                None => return Ok(None),
            };
            if high == HDLC_FLAG {
                high = match self.read_byte().await? {
                    Some(b) => b,
                    None => return Ok(None),
                };
            }
            let low = self.read_byte_committed().await?;

            let format = FrameFormat::decode(u16::from_be_bytes([high, low]));
            if format.length <= 2 {
                self.stats.resyncs += 1;
                debug!(
                    "implausible frame-format word {:04X} (length {}), resyncing",
                    format.word, format.length
                );
                continue;
            }

            let mut bytes = BytesMut::with_capacity(format.length as usize);
            bytes.put_u8(high);
            bytes.put_u8(low);
            let mut remainder = vec![0u8; format.length as usize - 2];
            self.reader
                .read_exact(&mut remainder)
                .await
                .map_err(map_read_error)?;
            bytes.extend_from_slice(&remainder);

            self.stats.frames_yielded += 1;
            return Ok(Some(RawFrame {
                bytes: bytes.to_vec(),
                format,
            }));
        }
    }

    /// Reads one octet; `None` on end of stream.
    async fn read_byte(&mut self) -> Result<Option<u8>, HanError> {
        match self.reader.read_u8().await {
            Ok(b) => Ok(Some(b)),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(HanError::Io(e)),
        }
    }

    /// Reads one octet after a frame start has been committed; end of
    /// stream here is a short read.
    async fn read_byte_committed(&mut self) -> Result<u8, HanError> {
        self.reader.read_u8().await.map_err(map_read_error)
    }
}

fn map_read_error(e: std::io::Error) -> HanError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        HanError::ShortRead
    } else {
        HanError::Io(e)
    }
}
