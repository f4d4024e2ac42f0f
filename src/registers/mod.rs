//! # Register Interpreter
//!
//! Converts the generic COSEM value tree of a push frame into a flat keyed
//! map of labelled measurements. The three supported meter families package
//! the same logical registers differently:
//!
//! - **AIDON_V0001** sends self-describing `[code, value, scaler-unit?]`
//!   triplets.
//! - **Kamstrup_V0001** sends a flat `[version, code, value, code, value…]`
//!   list whose version entry carries no OBIS code of its own.
//! - **KFM_001** sends bare values whose meaning is positional, selected by
//!   the HDLC frame type.
//!
//! The vendor dictionaries supply canonical keys, descriptions and default
//! scaling for registers that arrive without an attached scaler-unit.

mod aidon;
mod kamstrup;
mod kfm;

use std::collections::BTreeMap;
use std::str::FromStr;

use log::{debug, warn};
use serde::Serialize;
use serde_json::json;

use crate::constants::{CLOCK_OBIS, CLOCK_OBIS_CHANNEL_1};
use crate::cosem::datetime::{CosemDateTime, CLOCK_VALUE_LEN};
use crate::cosem::{unit_symbol, CosemValue, ObisCode};
use crate::error::HanError;

/// One register dictionary entry.
#[derive(Debug, Clone, Copy)]
pub struct RegisterDef {
    /// Canonical measurement key used in emitted documents.
    pub key: &'static str,
    pub description: &'static str,
    /// Default unit symbol; empty when the register is unitless.
    pub unit: &'static str,
    /// Default multiplier applied when no scaler-unit is attached.
    pub factor: f64,
}

/// The scaler-unit pair attached to self-describing registers:
/// `value × 10^exponent` in the given DLMS unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalerUnit {
    pub exponent: i8,
    pub unit: u8,
}

impl ScalerUnit {
    pub fn factor(&self) -> f64 {
        10f64.powi(i32::from(self.exponent))
    }
}

/// Vendor/version selector for the register dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorMap {
    Aidon,
    Kamstrup,
    Kfm,
}

impl VendorMap {
    pub fn name(&self) -> &'static str {
        match self {
            VendorMap::Aidon => "AIDON_V0001",
            VendorMap::Kamstrup => "Kamstrup_V0001",
            VendorMap::Kfm => "KFM_001",
        }
    }

    fn lookup(&self, obis: &str) -> Option<&'static RegisterDef> {
        match self {
            VendorMap::Aidon => aidon::REGISTERS.get(obis),
            VendorMap::Kamstrup => kamstrup::REGISTERS.get(obis),
            VendorMap::Kfm => kfm::REGISTERS.get(obis),
        }
    }
}

impl FromStr for VendorMap {
    type Err = HanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AIDON_V0001" => Ok(VendorMap::Aidon),
            "Kamstrup_V0001" => Ok(VendorMap::Kamstrup),
            "KFM_001" => Ok(VendorMap::Kfm),
            other => Err(HanError::UnsupportedVendor(other.to_string())),
        }
    }
}

/// One labelled measurement in the emitted `data` map.
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    pub obis_code: String,
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A register paired with its reading before dictionary lookup.
#[derive(Debug, Clone)]
struct Reading {
    obis: String,
    value: CosemValue,
    scaler: Option<ScalerUnit>,
}

/// Pairs OBIS identifiers with readings according to the vendor shape and
/// produces the keyed measurement map.
pub fn interpret(
    values: &[CosemValue],
    frame_type: u8,
    vendor: VendorMap,
) -> Result<BTreeMap<String, Measurement>, HanError> {
    // The body is the last top-level value; a preceding element, when
    // present, is the notification timestamp already exposed through the
    // APDU prefix.
    let body = match values.last() {
        Some(body) => body,
        None => return Ok(BTreeMap::new()),
    };

    let readings = match vendor {
        VendorMap::Aidon => pair_aidon(body),
        VendorMap::Kamstrup => pair_kamstrup(body),
        VendorMap::Kfm => pair_kfm(body, frame_type)?,
    };

    let mut data = BTreeMap::new();
    for reading in readings {
        let (key, measurement) = measure(reading, vendor);
        data.insert(key, measurement);
    }
    Ok(data)
}

/// AIDON_V0001: a structure of `[code, value, scaler-unit?]` triplets.
fn pair_aidon(body: &CosemValue) -> Vec<Reading> {
    let mut readings = Vec::new();
    for item in container_items(body) {
        let fields = match item {
            CosemValue::Structure(fields) if (2..=3).contains(&fields.len()) => fields,
            other => {
                warn!("skipping register entry with unexpected shape: {other:?}");
                continue;
            }
        };
        let obis = match obis_string(&fields[0]) {
            Some(obis) => obis,
            None => {
                warn!("skipping register entry without an OBIS code: {:?}", fields[0]);
                continue;
            }
        };
        readings.push(Reading {
            obis,
            value: fields[1].clone(),
            scaler: fields.get(2).and_then(scaler_unit_of),
        });
    }
    readings
}

/// Kamstrup_V0001: a flat `[version, code, value, …]` list. The version
/// entry has no OBIS code on the wire; a `1-1:0.2.129.255` pair is
/// synthesised for it.
fn pair_kamstrup(body: &CosemValue) -> Vec<Reading> {
    let items = container_items(body);
    let mut readings = Vec::new();
    let Some((version, pairs)) = items.split_first() else {
        return readings;
    };
    readings.push(Reading {
        obis: kamstrup::OBIS_VERSION.to_string(),
        value: (*version).clone(),
        scaler: None,
    });
    let mut chunks = pairs.chunks_exact(2);
    for chunk in &mut chunks {
        let obis = match obis_string(chunk[0]) {
            Some(obis) => obis,
            None => {
                warn!("skipping register pair without an OBIS code: {:?}", chunk[0]);
                continue;
            }
        };
        readings.push(Reading {
            obis,
            value: chunk[1].clone(),
            scaler: None,
        });
    }
    if !chunks.remainder().is_empty() {
        warn!("odd trailing element in flat register list, dropped");
    }
    readings
}

/// KFM_001: bare values keyed by position from the frame-type-specific key
/// sequence.
fn pair_kfm(body: &CosemValue, frame_type: u8) -> Result<Vec<Reading>, HanError> {
    let keys = kfm::key_sequence(frame_type).ok_or_else(|| {
        HanError::MalformedFrame(format!(
            "no positional key sequence for HDLC frame type {frame_type}"
        ))
    })?;
    let items = container_items(body);
    if items.len() > keys.len() {
        debug!(
            "positional list carries {} values but only {} keys are defined; extras dropped",
            items.len(),
            keys.len()
        );
    }
    Ok(keys
        .iter()
        .zip(items)
        .map(|(obis, value)| Reading {
            obis: (*obis).to_string(),
            value: value.clone(),
            scaler: None,
        })
        .collect())
}

/// Applies clock decoding, scaling and dictionary metadata to one reading.
fn measure(reading: Reading, vendor: VendorMap) -> (String, Measurement) {
    let def = vendor.lookup(&reading.obis);

    let (factor, unit) = match reading.scaler {
        Some(su) => (su.factor(), non_empty(unit_symbol(su.unit))),
        None => match def {
            Some(def) => (def.factor, non_empty(def.unit)),
            None => (1.0, None),
        },
    };

    let value = if is_clock(&reading.obis) {
        clock_value(&reading.value)
    } else {
        scaled_value(&reading.value, factor)
    };

    let key = def
        .map(|def| def.key.to_string())
        .unwrap_or_else(|| reading.obis.clone());
    let measurement = Measurement {
        obis_code: reading.obis,
        value,
        description: def.map(|def| def.description.to_string()),
        unit,
    };
    (key, measurement)
}

/// The elements of an array or structure; a bare value is its own
/// single-element list.
fn container_items(body: &CosemValue) -> Vec<&CosemValue> {
    match body {
        CosemValue::Array(items) | CosemValue::Structure(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Renders a six-octet OBIS octet-string.
fn obis_string(value: &CosemValue) -> Option<String> {
    match value {
        CosemValue::OctetString(bytes) => ObisCode::from_bytes(bytes).map(|c| c.to_string()),
        _ => None,
    }
}

/// Recognises a scaler-unit structure `{exponent: i8, unit: enum|u16}`.
fn scaler_unit_of(value: &CosemValue) -> Option<ScalerUnit> {
    let CosemValue::Structure(items) = value else {
        return None;
    };
    let [exponent, unit] = items.as_slice() else {
        return None;
    };
    let exponent = match exponent {
        CosemValue::Integer(e) => *e,
        _ => return None,
    };
    let unit = match unit {
        CosemValue::Enum(u) => *u,
        CosemValue::LongUnsigned(u) if *u <= 255 => *u as u8,
        _ => return None,
    };
    Some(ScalerUnit { exponent, unit })
}

fn is_clock(obis: &str) -> bool {
    obis == CLOCK_OBIS || obis == CLOCK_OBIS_CHANNEL_1
}

/// A clock register's raw octets re-rendered as a datetime string.
fn clock_value(value: &CosemValue) -> serde_json::Value {
    if let CosemValue::OctetString(bytes) = value {
        if bytes.len() == CLOCK_VALUE_LEN {
            if let Ok(dt) = CosemDateTime::parse(bytes) {
                return json!(dt.to_string());
            }
        }
    }
    scaled_value(value, 1.0)
}

/// Numeric readings scaled by the register factor; integral results emit as
/// integers. Non-numeric readings pass through unscaled.
fn scaled_value(value: &CosemValue, factor: f64) -> serde_json::Value {
    match numeric(value) {
        Some(n) => {
            let scaled = n * factor;
            if scaled.fract() == 0.0 && scaled.abs() < 9.0e15 {
                json!(scaled as i64)
            } else {
                json!(scaled)
            }
        }
        None => match value {
            CosemValue::VisibleString(s) | CosemValue::Utf8String(s) => json!(s),
            CosemValue::OctetString(bytes) => json!(hex::encode(bytes)),
            CosemValue::Null => serde_json::Value::Null,
            other => serde_json::to_value(other).unwrap_or(serde_json::Value::Null),
        },
    }
}

fn numeric(value: &CosemValue) -> Option<f64> {
    match value {
        CosemValue::DoubleLongUnsigned(v) => Some(f64::from(*v)),
        CosemValue::LongUnsigned(v) => Some(f64::from(*v)),
        CosemValue::Long(v) => Some(f64::from(*v)),
        CosemValue::Integer(v) => Some(f64::from(*v)),
        CosemValue::Enum(v) => Some(f64::from(*v)),
        _ => None,
    }
}

fn non_empty(symbol: &str) -> Option<String> {
    if symbol.is_empty() {
        None
    } else {
        Some(symbol.to_string())
    }
}
