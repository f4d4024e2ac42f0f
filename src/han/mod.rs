//! HDLC link layer: frame boundary recovery, header validation, and the
//! serial byte source.

pub mod frame;
pub mod scanner;
pub mod serial;

pub use frame::{FrameFormat, HdlcFrame};
pub use scanner::{FrameScanner, RawFrame, ScannerStats};
