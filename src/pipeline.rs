//! # Decoder Pipeline
//!
//! Drives the whole decoder over one byte source: scanner → HDLC parser →
//! COSEM decoder → register interpreter → sinks. Frames are processed
//! strictly in arrival order and each document is published before the next
//! frame is parsed.
//!
//! Per-frame failures are contained here: a malformed or checksum-failing
//! frame is logged and dropped, and the scanner resynchronises on the next
//! flag. Only I/O failures of the byte source itself terminate the run.

use log::{debug, info, warn};
use tokio::io::AsyncRead;

use crate::cosem;
use crate::emit::{self, FrameSink};
use crate::error::HanError;
use crate::han::scanner::RawFrame;
use crate::han::{FrameScanner, HdlcFrame};
use crate::registers::{self, VendorMap};

/// Decoder behaviour switches from the configuration surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoderOptions {
    /// Continue decoding frames whose HCS or FCS does not match.
    pub ignore_checksum: bool,
    /// Render one-line documents instead of pretty-printed ones.
    pub compact: bool,
}

/// Counters reported when the stream ends.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineStats {
    pub frames_seen: u64,
    pub frames_decoded: u64,
    pub frames_dropped: u64,
    pub checksum_errors: u64,
    pub bytes_discarded: u64,
    pub resyncs: u64,
}

/// The assembled decoder for one byte source.
pub struct DecoderPipeline<R> {
    scanner: FrameScanner<R>,
    vendor: VendorMap,
    options: DecoderOptions,
    sinks: Vec<Box<dyn FrameSink>>,
    stats: PipelineStats,
}

impl<R: AsyncRead + Unpin> DecoderPipeline<R> {
    pub fn new(source: R, vendor: VendorMap, options: DecoderOptions) -> Self {
        Self {
            scanner: FrameScanner::new(source),
            vendor,
            options,
            sinks: Vec::new(),
            stats: PipelineStats::default(),
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn FrameSink>) {
        self.sinks.push(sink);
    }

    /// Runs until the byte source ends. Returns the final counters.
    pub async fn run(&mut self) -> Result<PipelineStats, HanError> {
        loop {
            match self.scanner.next_frame().await {
                Ok(Some(raw)) => {
                    self.stats.frames_seen += 1;
                    if let Err(e) = self.process(&raw) {
                        self.stats.frames_dropped += 1;
                        if e.is_checksum() {
                            self.stats.checksum_errors += 1;
                        }
                        warn!("dropping frame: {e}");
                    }
                }
                Ok(None) => {
                    info!("byte source ended");
                    break;
                }
                Err(HanError::ShortRead) => {
                    debug!("byte source ended mid-frame");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        let scanner = self.scanner.stats();
        self.stats.bytes_discarded = scanner.bytes_discarded;
        self.stats.resyncs = scanner.resyncs;
        Ok(self.stats)
    }

    /// Decodes one candidate frame and publishes its document.
    fn process(&mut self, raw: &RawFrame) -> Result<(), HanError> {
        let frame = HdlcFrame::parse(&raw.bytes, raw.format, self.options.ignore_checksum)?;
        let values = cosem::decode_all(&frame.payload)?;
        let data = registers::interpret(&values, frame.format.frame_type, self.vendor)?;
        let document = emit::build_document(&frame, &values, &data);
        let rendered = emit::render(&document, self.options.compact);
        for sink in &mut self.sinks {
            if let Err(e) = sink.publish(&rendered) {
                warn!("sink failed: {e}");
            }
        }
        self.stats.frames_decoded += 1;
        Ok(())
    }
}
