//! Protocol constants for HDLC framing and the COSEM transport as used on
//! the Norwegian HAN port.

/// HDLC flag octet delimiting every frame.
pub const HDLC_FLAG: u8 = 0x7E;

/// Mask extracting the 11-bit length field from the frame-format word.
pub const HDLC_FORMAT_LENGTH_MASK: u16 = 0x07FF;

/// Bit position of the segmentation flag in the frame-format word.
pub const HDLC_FORMAT_SEGMENTATION_SHIFT: u16 = 11;

/// Bit position of the 4-bit frame type in the frame-format word.
pub const HDLC_FORMAT_TYPE_SHIFT: u16 = 12;

/// Smallest frame that can carry a header: format word (2), minimum
/// addresses (2), control (1), FCS (2).
pub const HDLC_MIN_FRAME_LEN: usize = 7;

/// LLC destination service access point expected on HAN push frames.
pub const LLC_DST_SAP: u8 = 0xE6;

/// LLC source service access point expected on HAN push frames.
pub const LLC_SRC_SAP: u8 = 0xE7;

/// LLC quality/control octet, always zero on this link.
pub const LLC_QUALITY: u8 = 0x00;

/// Number of octets in the LLC sub-header.
pub const LLC_HEADER_LEN: usize = 3;

/// OBIS code of the meter clock register.
pub const CLOCK_OBIS: &str = "0-0:1.0.0.255";

/// Kamstrup meters address the same clock register with B=1.
pub const CLOCK_OBIS_CHANNEL_1: &str = "0-1:1.0.0.255";

/// Serial parameters of the M-Bus slave HAN link: 2400 baud, 8E1.
pub const HAN_BAUD_RATE: u32 = 2400;
