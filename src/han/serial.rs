//! # HAN Serial Byte Source
//!
//! Opens the M-Bus slave serial link of the meter's HAN port. The physical
//! parameters are fixed by the Norwegian deployment: 2400 baud, 8 data
//! bits, even parity, one stop bit.

use std::time::Duration;

use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};

use crate::constants::HAN_BAUD_RATE;
use crate::error::HanError;

/// Opens `port_name` with the HAN link settings and returns the stream used
/// as the scanner's byte source.
pub fn open_port(port_name: &str) -> Result<SerialStream, HanError> {
    tokio_serial::new(port_name, HAN_BAUD_RATE)
        .data_bits(DataBits::Eight)
        .parity(Parity::Even)
        .stop_bits(StopBits::One)
        .timeout(Duration::from_secs(30))
        .open_native_async()
        .map_err(|e| HanError::SerialPort(e.to_string()))
}
