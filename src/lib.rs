//! # han-rs - A Rust Crate for Decoding Smart Meter HAN Telemetry
//!
//! The han-rs crate decodes the binary telemetry stream that Norwegian smart
//! electricity meters push over their HAN (Home Area Network) port:
//! DLMS/COSEM application data framed in HDLC frames over an M-Bus slave
//! serial link (2400 baud, 8E1).
//!
//! ## Features
//!
//! - Recover HDLC frame boundaries from a noisy byte stream and resynchronise
//!   after corruption
//! - Validate the header and full-frame CRC-16/X-25 check sequences
//! - Parse the COSEM TLV payload into a typed value tree
//! - Interpret readings through the AIDON_V0001, Kamstrup_V0001 or KFM_001
//!   register dictionary, applying scaler-unit metadata
//! - Emit one enriched JSON document per frame to pluggable sinks
//! - Read from a serial device, a regular file, or stdin
//!
//! ## Usage
//!
//! ```no_run
//! use han_rs::{DecoderOptions, DecoderPipeline, StdoutSink, VendorMap};
//!
//! # async fn run() -> Result<(), han_rs::HanError> {
//! let source = tokio::io::stdin();
//! let mut pipeline =
//!     DecoderPipeline::new(source, VendorMap::Aidon, DecoderOptions::default());
//! pipeline.add_sink(Box::new(StdoutSink));
//! let stats = pipeline.run().await?;
//! println!("decoded {} frames", stats.frames_decoded);
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod cosem;
pub mod emit;
pub mod error;
pub mod han;
pub mod logging;
pub mod pipeline;
pub mod registers;
pub mod util;

pub use cosem::{CosemDateTime, CosemValue, ObisCode};
pub use emit::{FrameSink, StdoutSink};
pub use error::HanError;
pub use han::{FrameFormat, FrameScanner, HdlcFrame};
pub use logging::{init_logger, log_info};
pub use pipeline::{DecoderOptions, DecoderPipeline, PipelineStats};
pub use registers::{Measurement, VendorMap};
