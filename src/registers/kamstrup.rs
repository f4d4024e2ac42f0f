//! Kamstrup_V0001 register dictionary.
//!
//! Kamstrup meters address their registers on OBIS channel B=1 and send no
//! scaler-units; currents arrive in hundredths of an ampere and energies in
//! hundredths of a kilowatt-hour, hence the default factors.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::RegisterDef;

/// OBIS code synthesised for the version entry leading the flat register
/// list.
pub(super) const OBIS_VERSION: &str = "1-1:0.2.129.255";

pub(super) static REGISTERS: Lazy<HashMap<&'static str, RegisterDef>> = Lazy::new(|| {
    HashMap::from([
        (
            OBIS_VERSION,
            RegisterDef {
                key: "obis_version",
                description: "OBIS list version identifier",
                unit: "",
                factor: 1.0,
            },
        ),
        (
            "1-1:0.0.5.255",
            RegisterDef {
                key: "meter_id",
                description: "Meter ID",
                unit: "",
                factor: 1.0,
            },
        ),
        (
            "1-1:96.1.1.255",
            RegisterDef {
                key: "meter_type",
                description: "Meter type",
                unit: "",
                factor: 1.0,
            },
        ),
        (
            "1-1:1.7.0.255",
            RegisterDef {
                key: "power_active_import",
                description: "Active power import (Q1+Q4)",
                unit: "W",
                factor: 1.0,
            },
        ),
        (
            "1-1:2.7.0.255",
            RegisterDef {
                key: "power_active_export",
                description: "Active power export (Q2+Q3)",
                unit: "W",
                factor: 1.0,
            },
        ),
        (
            "1-1:3.7.0.255",
            RegisterDef {
                key: "power_reactive_import",
                description: "Reactive power import (Q1+Q2)",
                unit: "VAr",
                factor: 1.0,
            },
        ),
        (
            "1-1:4.7.0.255",
            RegisterDef {
                key: "power_reactive_export",
                description: "Reactive power export (Q3+Q4)",
                unit: "VAr",
                factor: 1.0,
            },
        ),
        (
            "1-1:31.7.0.255",
            RegisterDef {
                key: "current_l1",
                description: "Current phase L1",
                unit: "A",
                factor: 0.01,
            },
        ),
        (
            "1-1:51.7.0.255",
            RegisterDef {
                key: "current_l2",
                description: "Current phase L2",
                unit: "A",
                factor: 0.01,
            },
        ),
        (
            "1-1:71.7.0.255",
            RegisterDef {
                key: "current_l3",
                description: "Current phase L3",
                unit: "A",
                factor: 0.01,
            },
        ),
        (
            "1-1:32.7.0.255",
            RegisterDef {
                key: "voltage_l1",
                description: "Voltage phase L1",
                unit: "V",
                factor: 1.0,
            },
        ),
        (
            "1-1:52.7.0.255",
            RegisterDef {
                key: "voltage_l2",
                description: "Voltage phase L2",
                unit: "V",
                factor: 1.0,
            },
        ),
        (
            "1-1:72.7.0.255",
            RegisterDef {
                key: "voltage_l3",
                description: "Voltage phase L3",
                unit: "V",
                factor: 1.0,
            },
        ),
        (
            "0-1:1.0.0.255",
            RegisterDef {
                key: "meter_timestamp",
                description: "Meter clock",
                unit: "",
                factor: 1.0,
            },
        ),
        (
            "1-1:1.8.0.255",
            RegisterDef {
                key: "energy_active_import",
                description: "Cumulative active energy import",
                unit: "Wh",
                factor: 10.0,
            },
        ),
        (
            "1-1:2.8.0.255",
            RegisterDef {
                key: "energy_active_export",
                description: "Cumulative active energy export",
                unit: "Wh",
                factor: 10.0,
            },
        ),
        (
            "1-1:3.8.0.255",
            RegisterDef {
                key: "energy_reactive_import",
                description: "Cumulative reactive energy import",
                unit: "VArh",
                factor: 10.0,
            },
        ),
        (
            "1-1:4.8.0.255",
            RegisterDef {
                key: "energy_reactive_export",
                description: "Cumulative reactive energy export",
                unit: "VArh",
                factor: 10.0,
            },
        ),
    ])
});
