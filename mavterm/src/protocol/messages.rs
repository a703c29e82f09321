//! # Standard messages
//!
//! Representative subset of the MAVLink `common` dialect as transmitted by `MAVLink 1`. Layouts
//! follow the wire order of the official message definitions, fields that are not used in
//! descriptions are omitted.

use crate::errors::FrameError;
use crate::protocol::{DecodedMessage, Field, FieldType, MessageId, MessageSpec};

/// `HEARTBEAT` message `ID`.
pub const HEARTBEAT_ID: MessageId = 0;
/// `SYS_STATUS` message `ID`.
pub const SYS_STATUS_ID: MessageId = 1;
/// `ATTITUDE` message `ID`.
pub const ATTITUDE_ID: MessageId = 30;
/// `LOCAL_POSITION_NED` message `ID`.
pub const LOCAL_POSITION_NED_ID: MessageId = 32;
/// `GLOBAL_POSITION_INT` message `ID`.
pub const GLOBAL_POSITION_INT_ID: MessageId = 33;
/// `VFR_HUD` message `ID`.
pub const VFR_HUD_ID: MessageId = 74;
/// `POSITION_TARGET_GLOBAL_INT` message `ID`.
pub const POSITION_TARGET_GLOBAL_INT_ID: MessageId = 87;
/// `HIGHRES_IMU` message `ID`.
pub const HIGHRES_IMU_ID: MessageId = 105;
/// `BATTERY_STATUS` message `ID`.
pub const BATTERY_STATUS_ID: MessageId = 147;

/// Heartbeat, the only message every MAVLink component has to send.
pub const HEARTBEAT: MessageSpec = MessageSpec::new(
    HEARTBEAT_ID,
    "HEARTBEAT",
    50,
    9,
    HEARTBEAT_FIELDS,
    format_heartbeat,
);

/// General system state.
pub const SYS_STATUS: MessageSpec = MessageSpec::new(
    SYS_STATUS_ID,
    "SYS_STATUS",
    124,
    31,
    SYS_STATUS_FIELDS,
    format_sys_status,
);

/// Attitude in the aeronautical frame, radians.
pub const ATTITUDE: MessageSpec = MessageSpec::new(
    ATTITUDE_ID,
    "ATTITUDE",
    39,
    28,
    ATTITUDE_FIELDS,
    format_attitude,
);

/// Local position in the NED frame.
pub const LOCAL_POSITION_NED: MessageSpec = MessageSpec::new(
    LOCAL_POSITION_NED_ID,
    "LOCAL_POSITION_NED",
    185,
    28,
    &[],
    format_name,
);

/// Filtered global position.
pub const GLOBAL_POSITION_INT: MessageSpec = MessageSpec::new(
    GLOBAL_POSITION_INT_ID,
    "GLOBAL_POSITION_INT",
    104,
    28,
    &[],
    format_name,
);

/// Metrics typically displayed on a HUD for fixed wing aircraft.
pub const VFR_HUD: MessageSpec = MessageSpec::new(
    VFR_HUD_ID,
    "VFR_HUD",
    20,
    20,
    VFR_HUD_FIELDS,
    format_vfr_hud,
);

/// Position setpoint in the global frame.
pub const POSITION_TARGET_GLOBAL_INT: MessageSpec = MessageSpec::new(
    POSITION_TARGET_GLOBAL_INT_ID,
    "POSITION_TARGET_GLOBAL_INT",
    150,
    51,
    &[],
    format_name,
);

/// IMU readings in SI units.
pub const HIGHRES_IMU: MessageSpec = MessageSpec::new(
    HIGHRES_IMU_ID,
    "HIGHRES_IMU",
    93,
    62,
    HIGHRES_IMU_FIELDS,
    format_highres_imu,
);

/// Battery information.
pub const BATTERY_STATUS: MessageSpec = MessageSpec::new(
    BATTERY_STATUS_ID,
    "BATTERY_STATUS",
    154,
    36,
    BATTERY_STATUS_FIELDS,
    format_battery_status,
);

/// All standard messages.
pub const STANDARD: &[MessageSpec] = &[
    HEARTBEAT,
    SYS_STATUS,
    ATTITUDE,
    LOCAL_POSITION_NED,
    GLOBAL_POSITION_INT,
    VFR_HUD,
    POSITION_TARGET_GLOBAL_INT,
    HIGHRES_IMU,
    BATTERY_STATUS,
];

const HEARTBEAT_FIELDS: &[Field] = &[
    Field::new("custom_mode", FieldType::U32, 0),
    Field::new("type", FieldType::U8, 4),
    Field::new("autopilot", FieldType::U8, 5),
    Field::new("base_mode", FieldType::U8, 6),
    Field::new("system_status", FieldType::U8, 7),
    Field::new("mavlink_version", FieldType::U8, 8),
];

const SYS_STATUS_FIELDS: &[Field] = &[
    Field::new("load", FieldType::U16, 12),
    Field::new("voltage_battery", FieldType::U16, 14),
    Field::new("current_battery", FieldType::I16, 16),
    Field::new("drop_rate_comm", FieldType::U16, 18),
    Field::new("errors_comm", FieldType::U16, 20),
    Field::new("battery_remaining", FieldType::I8, 30),
];

const ATTITUDE_FIELDS: &[Field] = &[
    Field::new("time_boot_ms", FieldType::U32, 0),
    Field::new("roll", FieldType::F32, 4),
    Field::new("pitch", FieldType::F32, 8),
    Field::new("yaw", FieldType::F32, 12),
    Field::new("rollspeed", FieldType::F32, 16),
    Field::new("pitchspeed", FieldType::F32, 20),
    Field::new("yawspeed", FieldType::F32, 24),
];

const VFR_HUD_FIELDS: &[Field] = &[
    Field::new("airspeed", FieldType::F32, 0),
    Field::new("groundspeed", FieldType::F32, 4),
    Field::new("alt", FieldType::F32, 8),
    Field::new("climb", FieldType::F32, 12),
    Field::new("heading", FieldType::I16, 16),
    Field::new("throttle", FieldType::U16, 18),
];

const HIGHRES_IMU_FIELDS: &[Field] = &[
    Field::new("time_usec", FieldType::U64, 0),
    Field::new("abs_pressure", FieldType::F32, 44),
    Field::new("diff_pressure", FieldType::F32, 48),
    Field::new("pressure_alt", FieldType::F32, 52),
    Field::new("temperature", FieldType::F32, 56),
    Field::new("fields_updated", FieldType::U16, 60),
];

const BATTERY_STATUS_FIELDS: &[Field] = &[
    Field::new("current_consumed", FieldType::I32, 0),
    Field::new("energy_consumed", FieldType::I32, 4),
    Field::new("temperature", FieldType::I16, 8),
    Field::new("current_battery", FieldType::I16, 30),
    Field::new("id", FieldType::U8, 32),
    Field::new("battery_remaining", FieldType::I8, 35),
];

fn format_name(message: &DecodedMessage) -> Result<String, FrameError> {
    Ok(message.name().to_string())
}

fn format_heartbeat(message: &DecodedMessage) -> Result<String, FrameError> {
    Ok(format!(
        "HEARTBEAT mavlink_version: {}",
        message.get("mavlink_version")?
    ))
}

fn format_sys_status(message: &DecodedMessage) -> Result<String, FrameError> {
    Ok(format!(
        "SYS_STATUS comms drop rate: {}%",
        message.get("drop_rate_comm")?
    ))
}

fn format_attitude(message: &DecodedMessage) -> Result<String, FrameError> {
    Ok(format!(
        "ATTITUDE roll: {} pitch: {} yaw: {}",
        message.get("roll")?,
        message.get("pitch")?,
        message.get("yaw")?
    ))
}

fn format_vfr_hud(message: &DecodedMessage) -> Result<String, FrameError> {
    Ok(format!("VFR_HUD heading: {} degrees", message.get("heading")?))
}

fn format_highres_imu(message: &DecodedMessage) -> Result<String, FrameError> {
    Ok(format!(
        "HIGHRES_IMU Pressure: {} millibar",
        message.get("abs_pressure")?
    ))
}

fn format_battery_status(message: &DecodedMessage) -> Result<String, FrameError> {
    Ok(format!(
        "BATTERY_STATUS current consumed: {} mAh",
        message.get("current_consumed")?
    ))
}

#[cfg(test)]
mod messages_tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn fields_fit_into_payloads() {
        for spec in STANDARD {
            for field in spec.fields() {
                assert!(
                    field.end() <= spec.payload_len(),
                    "{}.{} is out of bounds",
                    spec.name(),
                    field.name
                );
            }
        }
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = STANDARD.iter().map(|spec| spec.id()).collect();
        assert_eq!(ids.len(), STANDARD.len());
    }

    #[test]
    fn heartbeat_description() {
        let payload = [0, 0, 0, 0, 2, 12, 81, 4, 3];
        let message = HEARTBEAT.decode(&payload).unwrap();

        assert_eq!(
            HEARTBEAT.format(&message).unwrap(),
            "HEARTBEAT mavlink_version: 3"
        );
    }

    #[test]
    fn sys_status_description() {
        let mut payload = [0u8; 31];
        payload[18..20].copy_from_slice(&25u16.to_le_bytes());
        let message = SYS_STATUS.decode(&payload).unwrap();

        assert_eq!(
            SYS_STATUS.format(&message).unwrap(),
            "SYS_STATUS comms drop rate: 25%"
        );
    }

    #[test]
    fn vfr_hud_description() {
        let mut payload = [0u8; 20];
        payload[16..18].copy_from_slice(&(-90i16).to_le_bytes());
        let message = VFR_HUD.decode(&payload).unwrap();

        assert_eq!(
            VFR_HUD.format(&message).unwrap(),
            "VFR_HUD heading: -90 degrees"
        );
    }

    #[test]
    fn highres_imu_description() {
        let mut payload = [0u8; 62];
        payload[44..48].copy_from_slice(&1013.25f32.to_le_bytes());
        let message = HIGHRES_IMU.decode(&payload).unwrap();

        assert_eq!(
            HIGHRES_IMU.format(&message).unwrap(),
            "HIGHRES_IMU Pressure: 1013.25 millibar"
        );
    }

    #[test]
    fn battery_status_description() {
        let mut payload = [0u8; 36];
        payload[0..4].copy_from_slice(&1250i32.to_le_bytes());
        let message = BATTERY_STATUS.decode(&payload).unwrap();

        assert_eq!(
            BATTERY_STATUS.format(&message).unwrap(),
            "BATTERY_STATUS current consumed: 1250 mAh"
        );
    }

    #[test]
    fn name_only_descriptions() {
        let message = GLOBAL_POSITION_INT.decode(&[0u8; 28]).unwrap();
        assert_eq!(
            GLOBAL_POSITION_INT.format(&message).unwrap(),
            "GLOBAL_POSITION_INT"
        );
    }
}
