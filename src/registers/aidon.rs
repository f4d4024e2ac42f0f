//! AIDON_V0001 register dictionary (Aidon 65xx meters).
//!
//! Aidon frames are self-describing: most registers arrive with an attached
//! scaler-unit, so the factors below are fallbacks for readings without one.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::RegisterDef;

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
                factor: 0.1,
            },
        ),
        (
            "1-0:51.7.0.255",
            RegisterDef {
                key: "current_l2",
                description: "Current phase L2",
                unit: "A",
                factor: 0.1,
            },
        ),
        (
            "1-0:71.7.0.255",
            RegisterDef {
                key: "current_l3",
                description: "Current phase L3",
                unit: "A",
                factor: 0.1,
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
                factor: 10.0,
            },
        ),
        (
            "1-0:2.8.0.255",
            RegisterDef {
                key: "energy_active_export",
                description: "Cumulative active energy export",
                unit: "Wh",
                factor: 10.0,
            },
        ),
        (
            "1-0:3.8.0.255",
            RegisterDef {
                key: "energy_reactive_import",
                description: "Cumulative reactive energy import",
                unit: "VArh",
                factor: 10.0,
            },
        ),
        (
            "1-0:4.8.0.255",
            RegisterDef {
                key: "energy_reactive_export",
                description: "Cumulative reactive energy export",
                unit: "VArh",
                factor: 10.0,
            },
        ),
    ])
});
