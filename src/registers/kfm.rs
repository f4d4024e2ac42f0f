//! KFM_001 register dictionary (Kaifa MA10x/MA30x meters).
//!
//! Kaifa frames carry bare values; which register a value belongs to is
//! given by its position in one of the fixed key sequences below, selected
//! by the HDLC frame type. Currents arrive in milliamperes and voltages in
//! tenths of a volt.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::RegisterDef;

/// List 1 (frame type 7): the instantaneous active import power alone.
const LIST1_KEYS: &[&str] = &["1-0:1.7.0.255"];

/// List 2 (frame types 8 and 9): identification plus instantaneous power,
/// current and voltage registers.
const LIST2_KEYS: &[&str] = &[
    "1-1:0.2.129.255",
    "0-0:96.1.0.255",
    "0-0:96.1.7.255",
    "1-0:1.7.0.255",
    "1-0:2.7.0.255",
    "1-0:3.7.0.255",
    "1-0:4.7.0.255",
    "1-0:31.7.0.255",
    "1-0:51.7.0.255",
    "1-0:71.7.0.255",
    "1-0:32.7.0.255",
    "1-0:52.7.0.255",
    "1-0:72.7.0.255",
];

/// List 3 (frame types 10 and 11): List 2 followed by the meter clock and
/// the four cumulative energy registers.
const LIST3_EXTRA_KEYS: &[&str] = &[
    "0-0:1.0.0.255",
    "1-0:1.8.0.255",
    "1-0:2.8.0.255",
    "1-0:3.8.0.255",
    "1-0:4.8.0.255",
];

static LIST3_KEYS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut keys = LIST2_KEYS.to_vec();
    keys.extend_from_slice(LIST3_EXTRA_KEYS);
    keys
});

/// The positional key sequence for an HDLC frame type, or `None` when the
/// type carries no known list.
pub(super) fn key_sequence(frame_type: u8) -> Option<&'static [&'static str]> {
    match frame_type {
        7 => Some(LIST1_KEYS),
        8 | 9 => Some(LIST2_KEYS),
        10 | 11 => Some(LIST3_KEYS.as_slice()),
        _ => None,
    }
}

pub(super) static REGISTERS: Lazy<HashMap<&'static str, RegisterDef>> = Lazy::new(|| {
    HashMap::from([
        (
            "1-1:0.2.129.255",
            RegisterDef {
                key: "obis_version",
                description: "OBIS list version identifier",
                unit: "",
                factor: 1.0,
            },
        ),
        (
            "0-0:96.1.0.255",
            RegisterDef {
                key: "meter_id",
                description: "Meter ID",
                unit: "",
                factor: 1.0,
            },
        ),
        (
            "0-0:96.1.7.255",
            RegisterDef {
                key: "meter_type",
                description: "Meter type",
                unit: "",
                factor: 1.0,
            },
        ),
        (
            "1-0:1.7.0.255",
            RegisterDef {
                key: "power_active_import",
                description: "Active power import (Q1+Q4)",
                unit: "W",
                factor: 1.0,
            },
        ),
        (
            "1-0:2.7.0.255",
            RegisterDef {
                key: "power_active_export",
                description: "Active power export (Q2+Q3)",
                unit: "W",
                factor: 1.0,
            },
        ),
        (
            "1-0:3.7.0.255",
            RegisterDef {
                key: "power_reactive_import",
                description: "Reactive power import (Q1+Q2)",
                unit: "VAr",
                factor: 1.0,
            },
        ),
        (
            "1-0:4.7.0.255",
            RegisterDef {
                key: "power_reactive_export",
                description: "Reactive power export (Q3+Q4)",
                unit: "VAr",
                factor: 1.0,
            },
        ),
        (
            "1-0:31.7.0.255",
            RegisterDef {
                key: "current_l1",
                description: "Current phase L1",
                unit: "A",
                factor: 0.001,
            },
        ),
        (
            "1-0:51.7.0.255",
            RegisterDef {
                key: "current_l2",
                description: "Current phase L2",
                unit: "A",
                factor: 0.001,
            },
        ),
        (
            "1-0:71.7.0.255",
            RegisterDef {
                key: "current_l3",
                description: "Current phase L3",
                unit: "A",
                factor: 0.001,
            },
        ),
        (
            "1-0:32.7.0.255",
            RegisterDef {
                key: "voltage_l1",
                description: "Voltage phase L1",
                unit: "V",
                factor: 0.1,
            },
        ),
        (
            "1-0:52.7.0.255",
            RegisterDef {
                key: "voltage_l2",
                description: "Voltage phase L2",
                unit: "V",
                factor: 0.1,
            },
        ),
        (
            "1-0:72.7.0.255",
            RegisterDef {
                key: "voltage_l3",
                description: "Voltage phase L3",
                unit: "V",
                factor: 0.1,
            },
        ),
        (
            "0-0:1.0.0.255",
            RegisterDef {
                key: "meter_timestamp",
                description: "Meter clock",
                unit: "",
                factor: 1.0,
            },
        ),
        (
            "1-0:1.8.0.255",
            RegisterDef {
                key: "energy_active_import",
                description: "Cumulative active energy import",
                unit: "Wh",
                factor: 1.0,
            },
        ),
        (
            "1-0:2.8.0.255",
            RegisterDef {
                key: "energy_active_export",
                description: "Cumulative active energy export",
                unit: "Wh",
                factor: 1.0,
            },
        ),
        (
            "1-0:3.8.0.255",
            RegisterDef {
                key: "energy_reactive_import",
                description: "Cumulative reactive energy import",
                unit: "VArh",
                factor: 1.0,
            },
        ),
        (
            "1-0:4.8.0.255",
            RegisterDef {
                key: "energy_reactive_export",
                description: "Cumulative reactive energy export",
                unit: "VArh",
                factor: 1.0,
            },
        ),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_sequences() {
        assert_eq!(key_sequence(7).unwrap().len(), 1);
        assert_eq!(key_sequence(8).unwrap().len(), 13);
        assert_eq!(key_sequence(9).unwrap().len(), 13);
        assert_eq!(key_sequence(10).unwrap().len(), 18);
        assert_eq!(key_sequence(11).unwrap().len(), 18);
        assert!(key_sequence(3).is_none());
    }

    #[test]
    fn test_every_positional_key_is_in_the_dictionary() {
        for key in key_sequence(10).unwrap() {
            assert!(REGISTERS.contains_key(key), "missing dictionary entry for {key}");
        }
    }
}
