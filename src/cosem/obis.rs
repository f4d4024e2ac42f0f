use core::fmt::{self, Debug, Display};

use serde::{Serialize, Serializer};

/// An OBIS code: the six-component register address A-B:C.D.E.F.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObisCode {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: u8,
}

impl ObisCode {
    pub fn new(a: u8, b: u8, c: u8, d: u8, e: u8, f: u8) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Decodes the six-octet wire form carried in a COSEM octet-string.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [a, b, c, d, e, f] => Some(Self::new(*a, *b, *c, *d, *e, *f)),
            _ => None,
        }
    }

    /// Raw six-octet wire form.
    pub fn to_bytes(self) -> [u8; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

impl Display for ObisCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}-{}:{}.{}.{}.{}",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

impl Debug for ObisCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ObisCode({})", self)
    }
}

impl Serialize for ObisCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let code = ObisCode::new(1, 0, 1, 7, 0, 255);
        assert_eq!(code.to_string(), "1-0:1.7.0.255");
    }

    #[test]
    fn test_from_bytes() {
        let code = ObisCode::from_bytes(&[1, 0, 1, 7, 0, 255]).unwrap();
        assert_eq!(code, ObisCode::new(1, 0, 1, 7, 0, 255));
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        assert!(ObisCode::from_bytes(&[1, 0, 1, 7, 0]).is_none());
        assert!(ObisCode::from_bytes(&[1, 0, 1, 7, 0, 255, 0]).is_none());
    }

    #[test]
    fn test_roundtrip() {
        let code = ObisCode::new(0, 0, 96, 1, 0, 255);
        assert_eq!(ObisCode::from_bytes(&code.to_bytes()), Some(code));
    }

    #[test]
    fn test_real_world_codes() {
        // Active power import
        let code = ObisCode::from_bytes(&[0x01, 0x00, 0x01, 0x07, 0x00, 0xFF]).unwrap();
        assert_eq!(code.to_string(), "1-0:1.7.0.255");

        // Meter clock
        let code = ObisCode::from_bytes(&[0x00, 0x00, 0x01, 0x00, 0x00, 0xFF]).unwrap();
        assert_eq!(code.to_string(), "0-0:1.0.0.255");
    }
}
